use console::{Color, Style};
use serde::{Deserialize, Serialize};

/// Terminal color names accepted in the `[theme]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl ThemeColor {
    fn to_console(self) -> Color {
        match self {
            ThemeColor::Black => Color::Black,
            ThemeColor::Red => Color::Red,
            ThemeColor::Green => Color::Green,
            ThemeColor::Yellow => Color::Yellow,
            ThemeColor::Blue => Color::Blue,
            ThemeColor::Magenta => Color::Magenta,
            ThemeColor::Cyan => Color::Cyan,
            ThemeColor::White => Color::White,
        }
    }
}

/// All styling knobs in one place, handed to the renderer explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary: ThemeColor,
    pub secondary: ThemeColor,
    pub background: ThemeColor,
    /// Carried for completeness; a terminal picks its own font.
    pub font_family: Vec<String>,
    pub corner_radius: u16,
    /// Below this many columns the header switches to its compact form.
    pub compact_below: u16,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: ThemeColor::Blue,
            secondary: ThemeColor::Magenta,
            background: ThemeColor::White,
            font_family: [
                "-apple-system",
                "BlinkMacSystemFont",
                "Segoe UI",
                "Roboto",
                "Helvetica Neue",
                "Arial",
                "sans-serif",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            corner_radius: 12,
            compact_below: 60,
        }
    }
}

pub struct Border {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl Theme {
    pub fn primary(&self) -> Style {
        Style::new().fg(self.primary.to_console())
    }

    /// Highlight used for the selected chip: primary background.
    pub fn chip_active(&self) -> Style {
        Style::new().bg(self.primary.to_console()).fg(self.background.to_console()).bold()
    }

    pub fn chip_idle(&self) -> Style {
        Style::new().dim()
    }

    pub fn error(&self) -> Style {
        Style::new().fg(Color::Red).bold()
    }

    pub fn accent(&self) -> Style {
        Style::new().fg(self.secondary.to_console())
    }

    pub fn border(&self) -> Border {
        if self.corner_radius > 0 {
            Border {
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
                horizontal: '─',
                vertical: '│',
            }
        } else {
            Border {
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
                horizontal: '─',
                vertical: '│',
            }
        }
    }
}
