//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::model::HostState;

/// Dashboard color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;
    pub const TITLE_FG: Color = Color::Cyan;

    // Status colors
    pub const UP: Color = Color::Green;
    pub const DOWN: Color = Color::Red;
    pub const ERROR: Color = Color::Yellow;
    pub const WAITING: Color = Color::DarkGray;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Theme::TITLE_FG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of a status cell; `None` is a host still waiting for its first probe.
    pub fn status(state: Option<HostState>) -> Style {
        match state {
            Some(HostState::Up) => Style::default().fg(Theme::UP),
            Some(HostState::Down) => Style::default()
                .fg(Theme::DOWN)
                .add_modifier(Modifier::BOLD),
            Some(HostState::Error) => Style::default().fg(Theme::ERROR),
            Some(HostState::Unknown) => Self::default(),
            None => Style::default().fg(Theme::WAITING),
        }
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Help text style.
    pub fn help() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Help key style (highlighted keys in help line).
    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }
}
