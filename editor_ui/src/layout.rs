//! Window layout: command bar, framed text area and scrollbar.
//!
//! All measurements are physical pixels. Logical paddings are multiplied
//! by the window scale factor once, when the layout is computed.

use notepad_core::{Command, Menu};

/// Padding inside the command bar, in logical pixels.
const BAR_PADDING: f32 = 4.0;
/// Horizontal padding inside each command bar entry.
const ITEM_PADDING: f32 = 8.0;
/// Extra space between menu groups.
const GROUP_GAP: f32 = 12.0;
/// Width of the frame around the text area.
const FRAME_WIDTH: f32 = 5.0;
/// Inner margin between the frame and the text.
const TEXT_MARGIN: f32 = 4.0;
/// Width of the vertical scrollbar.
const SCROLLBAR_WIDTH: f32 = 14.0;
/// Smallest scrollbar thumb.
const MIN_THUMB: f32 = 16.0;
/// Padding around hover hint text.
const HINT_PADDING: f32 = 4.0;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Short label shown in the command bar.
pub fn bar_label(command: Command) -> &'static str {
    match command {
        Command::LightMode => "Light",
        Command::DarkMode => "Dark",
        Command::ToggleReadOnly => "Read-Only",
        Command::ResetZoom => "Reset",
        other => other.label(),
    }
}

/// Tooltip for a command bar entry: the full label plus its shortcut.
pub fn hint_text(command: Command) -> String {
    match command.accelerator() {
        Some(accelerator) => format!("{} ({accelerator})", command.label()),
        None => command.label().to_string(),
    }
}

/// Whether the entry reserves a slot for a check mark.
pub fn is_toggle(command: Command) -> bool {
    command == Command::ToggleReadOnly
}

/// One clickable command bar entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarItem {
    pub command: Command,
    pub rect: Rect,
    /// Where the label text starts.
    pub text_x: f32,
}

/// Placement of every part of the window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub bar: Rect,
    pub items: Vec<BarItem>,
    /// The frame around text area and scrollbar.
    pub frame: Rect,
    /// Where text is drawn.
    pub text: Rect,
    pub scrollbar: Rect,
}

impl Layout {
    /// Lays out a window of the given size.
    ///
    /// `ui_char_width` and `ui_line_height` come from the command bar atlas.
    pub fn compute(
        width: f32,
        height: f32,
        scale: f32,
        ui_char_width: f32,
        ui_line_height: f32,
    ) -> Self {
        let row_height = ui_line_height + 2.0 * BAR_PADDING * scale;
        let (items, rows) = layout_items(width, row_height, scale, ui_char_width);
        let bar = Rect::new(0.0, 0.0, width, rows as f32 * row_height);

        let frame_top = bar.bottom();
        let frame = Rect::new(0.0, frame_top, width, (height - frame_top).max(0.0));

        let border = FRAME_WIDTH * scale;
        let inner = Rect::new(
            frame.x + border,
            frame.y + border,
            (frame.width - 2.0 * border).max(0.0),
            (frame.height - 2.0 * border).max(0.0),
        );

        let scrollbar_width = (SCROLLBAR_WIDTH * scale).min(inner.width);
        let scrollbar = Rect::new(
            inner.right() - scrollbar_width,
            inner.y,
            scrollbar_width,
            inner.height,
        );

        let margin = TEXT_MARGIN * scale;
        let text = Rect::new(
            inner.x + margin,
            inner.y + margin,
            (inner.width - scrollbar_width - 2.0 * margin).max(0.0),
            (inner.height - 2.0 * margin).max(0.0),
        );

        Self {
            bar,
            items,
            frame,
            text,
            scrollbar,
        }
    }

    /// Returns the command bar entry under the point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<Command> {
        self.items
            .iter()
            .find(|item| item.rect.contains(x, y))
            .map(|item| item.command)
    }

    /// Where the hover hint for `command` goes: just below its entry, kept
    /// inside the window horizontally.
    pub fn hint_rect(
        &self,
        command: Command,
        text_chars: usize,
        char_width: f32,
        line_height: f32,
        scale: f32,
    ) -> Option<Rect> {
        let item = self.items.iter().find(|item| item.command == command)?;
        let padding = HINT_PADDING * scale;
        let width = text_chars as f32 * char_width + 2.0 * padding;
        let height = line_height + 2.0 * padding;
        let x = item.rect.x.min(self.bar.right() - width).max(0.0);
        Some(Rect::new(x, item.rect.bottom(), width, height))
    }

    /// Number of whole lines that fit in the text area, at least one.
    pub fn visible_lines(&self, line_height: f32) -> usize {
        if line_height <= 0.0 {
            return 1;
        }
        ((self.text.height / line_height).floor() as usize).max(1)
    }

    /// Number of whole columns that fit in the text area, at least one.
    pub fn visible_cols(&self, char_width: f32) -> usize {
        if char_width <= 0.0 {
            return 1;
        }
        ((self.text.width / char_width).floor() as usize).max(1)
    }

    /// The scrollbar thumb for a view showing `visible` of `total` lines
    /// starting at `first`.
    pub fn scrollbar_thumb(&self, first: usize, visible: usize, total: usize) -> Rect {
        let track = self.scrollbar;
        let total = total.max(1) as f32;
        let fraction = (visible as f32 / total).min(1.0);
        let height = (track.height * fraction).max(MIN_THUMB.min(track.height));
        let travel = track.height - height;
        let max_first = (total - visible as f32).max(1.0);
        let offset = travel * (first as f32 / max_first).min(1.0);
        Rect::new(track.x, track.y + offset, track.width, height)
    }
}

/// Places the entries left to right, starting a new row when the next one
/// would cross the right edge. Returns the entries and the row count.
fn layout_items(
    bar_width: f32,
    row_height: f32,
    scale: f32,
    char_width: f32,
) -> (Vec<BarItem>, usize) {
    let padding = ITEM_PADDING * scale;
    let row_start = BAR_PADDING * scale;
    let row_end = bar_width - BAR_PADDING * scale;
    let mut x = row_start;
    let mut row = 0;
    let mut previous_menu: Option<Menu> = None;
    let mut items = Vec::with_capacity(Command::ALL.len());

    for command in Command::ALL {
        let mut chars = bar_label(command).chars().count();
        if is_toggle(command) {
            chars += 2;
        }
        let width = chars as f32 * char_width + 2.0 * padding;

        let gap = if previous_menu.is_some_and(|menu| menu != command.menu()) {
            GROUP_GAP * scale
        } else {
            0.0
        };
        previous_menu = Some(command.menu());

        if x > row_start && x + gap + width > row_end {
            row += 1;
            x = row_start;
        } else {
            x += gap;
        }

        items.push(BarItem {
            command,
            rect: Rect::new(x, row as f32 * row_height, width, row_height),
            text_x: x + padding,
        });
        x += width;
    }
    (items, row + 1)
}
