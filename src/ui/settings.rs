//! Centralized terminal UI settings: labels, glyphs, colors, indentation.

use crossterm::style::Color;

pub const INDENT_1: &str = "  ";

pub const MENU_TITLE_PREFIX: &str = "===";
pub const PROMPT_CONTINUE: &str = "Press Enter to continue...";

pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";
pub const LABEL_PRIVATE: &str = "[PRIVATE]";

pub const GLYPH_SECTION_BULLET: &str = "•";

pub const COLOR_MENU_TITLE: Color = Color::Cyan;
pub const COLOR_MENU_NUMBER: Color = Color::DarkGrey;
pub const COLOR_PROMPT: Color = Color::Green;
pub const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
pub const COLOR_SECTION_TITLE: Color = Color::White;
pub const COLOR_ACTIVITY: Color = Color::Grey;
pub const COLOR_FIELD_KEY: Color = Color::DarkGrey;
pub const COLOR_FIELD_VALUE: Color = Color::White;
pub const COLOR_PROGRESS: Color = Color::Yellow;
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_CHAT_SENDER: Color = Color::Cyan;
pub const COLOR_CHAT_PRIVATE: Color = Color::Magenta;
