//! Colors and styles for the navigator, built once at startup.

use ratatui::style::{Color, Modifier, Style};

pub const BUF_BLUE: Color = Color::Rgb(0x15, 0x1f, 0xd5);
pub const BUF_TEAL: Color = Color::Rgb(0x91, 0xdf, 0xfb);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub highlight: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: BUF_BLUE,
            highlight: BUF_TEAL,
            error: Color::Red,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn header(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn column_header(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn selected_row(&self) -> Style {
        Style::default().fg(self.accent).bg(self.highlight)
    }

    pub fn input(&self) -> Style {
        Style::default().fg(self.accent).bg(self.highlight)
    }

    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn help(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }
}
