use ratatui::style::{Color, Modifier, Style};

use crate::vim::VimMode;
use crate::wizard::MarkerState;

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub foreground: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Yellow,
            secondary: Color::Cyan,
            background: Color::Reset,
            foreground: Color::White,
            error: Color::Red,
            success: Color::Green,
            border: Color::DarkGray,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn mode_style(&self, mode: VimMode) -> Style {
        let color = match mode {
            VimMode::Normal => self.secondary,
            VimMode::Insert => self.success,
            VimMode::Command => self.primary,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Marker glyph and its style in the step indicator strip.
    pub fn marker(&self, state: MarkerState) -> (&'static str, Style) {
        match state {
            MarkerState::Completed => ("●", Style::default().fg(self.success)),
            MarkerState::Active => (
                "◉",
                Style::default().fg(self.primary).add_modifier(Modifier::BOLD),
            ),
            MarkerState::Pending => ("○", self.muted_style()),
        }
    }

    /// Divider segments already passed are drawn in the success color.
    pub fn divider_style(&self, reached: bool) -> Style {
        if reached {
            Style::default().fg(self.success)
        } else {
            self.border_style()
        }
    }

    /// Label under a marker.
    pub fn marker_label_style(&self, state: MarkerState) -> Style {
        match state {
            MarkerState::Active => self.primary_style().add_modifier(Modifier::BOLD),
            MarkerState::Completed => self.style(),
            MarkerState::Pending => self.muted_style(),
        }
    }
}
