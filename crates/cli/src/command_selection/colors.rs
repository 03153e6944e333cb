use crossterm::style::Color;

use super::types::StatusLevel;

/// Foreground, background and weight of one terminal cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: u8) -> Self {
        self.fg = Some(Color::AnsiValue(color));
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: u8) -> Self {
        self.bg = Some(Color::AnsiValue(color));
        self
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Keeps this style's colors but falls back to `base` for unset ones.
    #[must_use]
    pub fn over(self, base: Style) -> Self {
        Self {
            fg: self.fg.or(base.fg),
            bg: self.bg.or(base.bg),
            bold: self.bold || base.bold,
        }
    }
}

pub const HEADER: Style = Style::new().fg(230).bg(24).bold();
pub const HEADER_INFO: Style = Style::new().fg(117).bg(24);
pub const PANE_BORDER: Style = Style::new().fg(238);
pub const FOCUS_BORDER: Style = Style::new().fg(39);
pub const PANE_TITLE: Style = Style::new().fg(81).bold();
pub const SELECTED: Style = Style::new().fg(231).bg(31).bold();
pub const NORMAL: Style = Style::new().fg(252);
pub const DIM: Style = Style::new().fg(244);
pub const OK: Style = Style::new().fg(42).bold();
pub const WARN: Style = Style::new().fg(214).bold();
pub const ERROR: Style = Style::new().fg(196).bold();
pub const HOTKEY: Style = Style::new().fg(121).bold();
pub const COMMAND_LINE: Style = Style::new().fg(230).bg(236);
pub const STATUS_BAR: Style = Style::new().fg(252).bg(236);
pub const SPINNER: Style = Style::new().fg(39);

pub fn status_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Ok => OK,
        StatusLevel::Warn => WARN,
        StatusLevel::Error => ERROR,
    }
}
