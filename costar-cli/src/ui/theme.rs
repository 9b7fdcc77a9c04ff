//! Color palette and style helpers for the costar TUI

use ratatui::style::{Color, Modifier, Style};

use costar_core::submission::{ErrorKind, SubmissionPhase};

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Panel border color
    pub panel_border: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed text (secondary info)
    pub text_dim: Color,
    /// Muted text (tertiary info, disabled)
    pub text_muted: Color,
    /// Accent color (highlights, focus)
    pub accent: Color,
    pub success: Color,
    pub warn: Color,
    pub error: Color,
    /// Background of the active (selected) row
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Background of the cursor row when it is not the active row
    pub cursor_bg: Color,
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            panel_border: Color::Rgb(60, 60, 60),
            text: Color::Rgb(212, 212, 212),
            text_dim: Color::Rgb(150, 150, 150),
            text_muted: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(79, 193, 255),
            success: Color::Rgb(78, 201, 176),
            warn: Color::Rgb(220, 180, 100),
            error: Color::Rgb(244, 135, 113),
            selection_bg: Color::Rgb(38, 79, 120),
            selection_fg: Color::White,
            cursor_bg: Color::Rgb(45, 45, 45),
            key_hint: Color::Rgb(206, 145, 120),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn phase_style(&self, phase: SubmissionPhase) -> Style {
        let color = match phase {
            SubmissionPhase::Idle => self.palette.text_muted,
            SubmissionPhase::Validating | SubmissionPhase::Requesting => self.palette.warn,
            SubmissionPhase::Succeeded => self.palette.success,
            SubmissionPhase::Failed => self.palette.error,
        };
        Style::default().fg(color)
    }

    pub fn error_kind_icon(&self, kind: ErrorKind) -> &'static str {
        match kind {
            ErrorKind::ValidationError => "!",
            ErrorKind::Timeout => "⏱",
            ErrorKind::SameActor => "=",
            ErrorKind::TransportError => "✗",
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.palette.accent)
        } else {
            Style::default().fg(self.palette.panel_border)
        }
    }

    /// The active row of a picker table
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cursor_style(&self) -> Style {
        Style::default().bg(self.palette.cursor_bg)
    }

    /// A row locked for the rest of this render pass
    pub fn locked_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn accent_bold_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }

    pub fn warn_style(&self) -> Style {
        Style::default().fg(self.palette.warn)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }
}

static DEFAULT_THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

pub fn theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(Theme::default)
}

/// Shorthands over the default theme
pub mod styles {
    use super::*;

    pub fn phase(phase: SubmissionPhase) -> Style {
        theme().phase_style(phase)
    }

    pub fn error_icon(kind: ErrorKind) -> &'static str {
        theme().error_kind_icon(kind)
    }

    pub fn border(focused: bool) -> Style {
        theme().border_style(focused)
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn cursor() -> Style {
        theme().cursor_style()
    }

    pub fn locked() -> Style {
        theme().locked_style()
    }

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn text_muted() -> Style {
        theme().text_muted_style()
    }

    pub fn accent_bold() -> Style {
        theme().accent_bold_style()
    }

    pub fn error() -> Style {
        theme().error_style()
    }

    pub fn warn() -> Style {
        theme().warn_style()
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn header() -> Style {
        theme().header_style()
    }
}
