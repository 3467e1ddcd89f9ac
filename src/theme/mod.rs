//! Theming system for kanji-stroke

mod sumi;

pub use sumi::SUMI;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A color theme for the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Stroke canvas
    pub stroke_ghost: Color,
    pub stroke_active: Color,
    pub stroke_done: Color,
    pub stroke_highlight: Color,
    pub stroke_label: Color,
    pub canvas_guide: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::sumi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_sumi() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Sumi");
    }

    #[test]
    fn theme_round_trips_through_json() {
        let theme = Theme::sumi();
        let json = serde_json::to_string(&theme).unwrap();
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, theme);
    }
}
