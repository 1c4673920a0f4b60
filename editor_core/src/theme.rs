//! Built-in display themes.
//!
//! A theme is an immutable record of every color the editing surface and
//! its container use. Themes are looked up by name from a fixed table.

/// RGBA color represented as [r, g, b, a] with values 0.0-1.0.
pub type Color = [f32; 4];

/// A named set of display colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Theme name, used for lookup.
    pub name: &'static str,
    /// Text area background.
    pub background: Color,
    /// Text color.
    pub foreground: Color,
    /// Insertion caret.
    pub caret: Color,
    /// Frame around the text area.
    pub frame_background: Color,
    /// Selected text background.
    pub selection_background: Color,
    /// Selected text color.
    pub selection_foreground: Color,
    /// Scrollbar thumb.
    pub scrollbar_thumb: Color,
    /// Scrollbar trough.
    pub scrollbar_trough: Color,
}

static LIGHT: Theme = Theme {
    name: "Light",
    background: [1.0, 1.0, 1.0, 1.0],               // #FFFFFF
    foreground: [0.0, 0.0, 0.0, 1.0],               // #000000
    caret: [0.0, 0.0, 0.0, 1.0],                    // #000000
    frame_background: [1.0, 1.0, 1.0, 1.0],         // #FFFFFF
    selection_background: [0.800, 0.933, 1.0, 1.0], // #CCEEFF
    selection_foreground: [0.0, 0.0, 0.0, 1.0],     // #000000
    scrollbar_thumb: [0.941, 0.941, 0.941, 1.0],    // #F0F0F0
    scrollbar_trough: [0.878, 0.878, 0.878, 1.0],   // #E0E0E0
};

static DARK: Theme = Theme {
    name: "Dark",
    background: [0.118, 0.118, 0.118, 1.0],           // #1E1E1E
    foreground: [0.831, 0.831, 0.831, 1.0],           // #D4D4D4
    caret: [0.831, 0.831, 0.831, 1.0],                // #D4D4D4
    frame_background: [0.118, 0.118, 0.118, 1.0],     // #1E1E1E
    selection_background: [0.267, 0.278, 0.353, 1.0], // #44475A
    selection_foreground: [0.973, 0.973, 0.949, 1.0], // #F8F8F2
    scrollbar_thumb: [0.267, 0.267, 0.267, 1.0],      // #444444
    scrollbar_trough: [0.180, 0.180, 0.180, 1.0],     // #2E2E2E
};

static BUILTIN: [&Theme; 2] = [&LIGHT, &DARK];

impl Theme {
    /// Looks up a built-in theme by exact name.
    pub fn builtin(name: &str) -> Option<&'static Theme> {
        BUILTIN.iter().copied().find(|theme| theme.name == name)
    }

    pub fn light() -> &'static Theme {
        &LIGHT
    }

    pub fn dark() -> &'static Theme {
        &DARK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Theme::builtin("Light"), Some(Theme::light()));
        assert_eq!(Theme::builtin("Dark"), Some(Theme::dark()));
        assert_eq!(Theme::builtin("dark"), None);
        assert_eq!(Theme::builtin("Purple"), None);
    }

    #[test]
    fn test_dark_differs_from_light() {
        let (light, dark) = (Theme::light(), Theme::dark());
        assert_ne!(light.background, dark.background);
        assert_ne!(light.foreground, dark.foreground);
        assert_ne!(light.selection_background, dark.selection_background);
    }
}
