use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const COMPLETED: Color = Color::Green;
pub const SKIPPED: Color = Color::Yellow;
pub const ABORTED: Color = Color::Red;
