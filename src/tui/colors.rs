// Palette for the terminal UI
use ratatui::style::Color;

pub const BG_DARK: Color = Color::Rgb(40, 42, 54);
pub const SELECTION_BG: Color = Color::Rgb(68, 71, 90);
pub const BORDER_COLOR: Color = Color::Rgb(98, 114, 164);

pub const TEXT_PRIMARY: Color = Color::Rgb(248, 248, 242);
pub const TEXT_SECONDARY: Color = Color::Rgb(98, 114, 164);

/// Destructive actions, deleted rows, large sizes
pub const ACCENT_PRIMARY: Color = Color::Rgb(255, 85, 85);
/// Checked boxes, small sizes, spinner
pub const ACCENT_SECONDARY: Color = Color::Rgb(80, 250, 123);
/// Titles and the cursor
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(189, 147, 249);
/// Partial selection, medium sizes, the path box
pub const ACCENT_WARNING: Color = Color::Rgb(255, 184, 108);
pub const CURSOR_COLOR: Color = Color::Rgb(255, 121, 198);
