//! Font loading and glyph atlas generation.

use crate::error::UiError;
use fontdue::{Font, FontSettings};
use std::collections::HashMap;

/// Monospace fonts tried in order, per platform.
#[cfg(target_os = "macos")]
const FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/SFNSMono.ttf",
    "/Library/Fonts/Courier New.ttf",
];

#[cfg(target_os = "windows")]
const FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansMono-Regular.ttf",
];

/// Check mark drawn next to active toggles in the command bar.
pub const CHECK_MARK: char = '\u{2713}';

/// Printable ASCII, printable Latin-1 and the check mark.
fn atlas_chars() -> impl Iterator<Item = char> {
    (' '..='~')
        .chain('\u{a0}'..='\u{ff}')
        .chain(std::iter::once(CHECK_MARK))
}

/// Character drawn for anything missing from the atlas.
const REPLACEMENT: char = '?';

/// Glyph cells per atlas row.
const CHARS_PER_ROW: u32 = 16;

fn atlas_rows() -> u32 {
    (atlas_chars().count() as u32).div_ceil(CHARS_PER_ROW)
}

/// Edge of one glyph cell for glyphs rasterised at `pixel_size`.
fn cell_size(pixel_size: f32) -> u32 {
    (pixel_size * 1.5).ceil() as u32 + 1
}

/// Texture dimensions of an atlas rasterised at `pixel_size`.
pub fn atlas_size(pixel_size: f32) -> (u32, u32) {
    let cell = cell_size(pixel_size);
    (CHARS_PER_ROW * cell, atlas_rows() * cell)
}

/// Caps `pixel_size` so its atlas fits in a `max_dimension` texture.
pub fn clamp_pixel_size(pixel_size: f32, max_dimension: u32) -> f32 {
    let max_cell = max_dimension / CHARS_PER_ROW.max(atlas_rows());
    let max_px = max_cell.saturating_sub(2) as f32 / 1.5;
    pixel_size.min(max_px).max(1.0)
}

/// Loads the first available system monospace font.
pub fn load_system_font() -> Result<Font, UiError> {
    for path in FONT_CANDIDATES {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match Font::from_bytes(bytes, FontSettings::default()) {
            Ok(font) => {
                log::info!("Using font {path}");
                return Ok(font);
            }
            Err(reason) => log::warn!("Skipping font {path}: {reason}"),
        }
    }
    Err(UiError::NoFont {
        tried: FONT_CANDIDATES.len(),
    })
}

/// Converts a point size to pixels at the given scale factor.
pub fn points_to_pixels(points: u32, scale_factor: f64) -> f32 {
    (points as f64 * 96.0 / 72.0 * scale_factor) as f32
}

/// Placement of one glyph inside the atlas.
#[derive(Debug, Clone, Copy)]
pub struct GlyphMetrics {
    /// X position in atlas (pixels).
    pub atlas_x: u32,
    /// Y position in atlas (pixels).
    pub atlas_y: u32,
    /// Width of glyph in atlas (pixels).
    pub width: u32,
    /// Height of glyph in atlas (pixels).
    pub height: u32,
    /// Horizontal offset when rendering.
    pub offset_x: f32,
    /// Vertical offset when rendering.
    pub offset_y: f32,
}

/// A texture atlas containing pre-rendered glyphs at one pixel size.
pub struct GlyphAtlas {
    /// Pixel size the glyphs were rasterised at.
    pixel_size: f32,
    /// Atlas texture data (single channel, grayscale).
    pub texture_data: Vec<u8>,
    /// Atlas width in pixels.
    pub width: u32,
    /// Atlas height in pixels.
    pub height: u32,
    /// Glyph metrics by character.
    glyphs: HashMap<char, GlyphMetrics>,
    /// Line height in pixels.
    pub line_height: f32,
    /// Character width (monospace).
    pub char_width: f32,
    /// Ascent (distance from baseline to top).
    pub ascent: f32,
}

impl GlyphAtlas {
    /// Rasterises the atlas character set at `pixel_size`.
    pub fn new(font: &Font, pixel_size: f32) -> Self {
        let pixel_size = pixel_size.max(1.0);
        let (ascent, line_height) = match font.horizontal_line_metrics(pixel_size) {
            Some(metrics) => (metrics.ascent, metrics.new_line_size.ceil()),
            None => (pixel_size, (pixel_size * 1.25).ceil()),
        };
        let char_width = font.metrics('M', pixel_size).advance_width;

        let cell = cell_size(pixel_size);
        let (width, height) = atlas_size(pixel_size);

        let mut texture_data = vec![0u8; (width * height) as usize];
        let mut glyphs = HashMap::new();

        for (index, ch) in atlas_chars().enumerate() {
            let (metrics, bitmap) = font.rasterize(ch, pixel_size);
            let glyph_width = (metrics.width as u32).min(cell);
            let glyph_height = (metrics.height as u32).min(cell);
            let atlas_x = (index as u32 % CHARS_PER_ROW) * cell;
            let atlas_y = (index as u32 / CHARS_PER_ROW) * cell;

            for gy in 0..glyph_height {
                let src = (gy as usize) * metrics.width;
                let dst = ((atlas_y + gy) * width + atlas_x) as usize;
                texture_data[dst..dst + glyph_width as usize]
                    .copy_from_slice(&bitmap[src..src + glyph_width as usize]);
            }

            glyphs.insert(
                ch,
                GlyphMetrics {
                    atlas_x,
                    atlas_y,
                    width: glyph_width,
                    height: glyph_height,
                    offset_x: metrics.xmin as f32,
                    offset_y: metrics.ymin as f32,
                },
            );
        }

        Self {
            pixel_size,
            texture_data,
            width,
            height,
            glyphs,
            line_height,
            char_width,
            ascent,
        }
    }

    /// Returns the metrics for a character, falling back to a replacement
    /// glyph for characters outside the atlas.
    pub fn get_glyph(&self, ch: char) -> Option<&GlyphMetrics> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.glyphs.get(&REPLACEMENT))
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_pixels() {
        assert_eq!(points_to_pixels(12, 1.0), 16.0);
        assert_eq!(points_to_pixels(12, 2.0), 32.0);
        assert_eq!(points_to_pixels(9, 1.0), 12.0);
    }

    #[test]
    fn test_atlas_fits_texture_limit_at_any_zoom() {
        let limit = wgpu::Limits::default().max_texture_dimension_2d;
        for (points, scale) in [(12, 1.0), (128, 2.0), (257, 1.0), (5000, 3.0), (u32::MAX, 1.0)] {
            let px = clamp_pixel_size(points_to_pixels(points, scale), limit);
            let (width, height) = atlas_size(px);
            assert!(
                width <= limit && height <= limit,
                "{points}pt @{scale}x -> {width}x{height}"
            );
        }
    }

    #[test]
    fn test_clamp_leaves_normal_sizes_alone() {
        let limit = wgpu::Limits::default().max_texture_dimension_2d;
        assert_eq!(clamp_pixel_size(16.0, limit), 16.0);
        assert_eq!(clamp_pixel_size(0.0, limit), 1.0);
        assert_eq!(atlas_size(16.0), (16 * 25, 12 * 25));
    }

    #[test]
    fn test_atlas_charset() {
        let chars: Vec<char> = atlas_chars().collect();
        assert_eq!(chars.first(), Some(&' '));
        assert!(chars.contains(&'~'));
        assert!(chars.contains(&'é'));
        assert!(!chars.contains(&'\u{7f}'));
        assert!(chars.contains(&CHECK_MARK));
        assert_eq!(chars.len(), 95 + 96 + 1);
    }
}
