//! Sumi theme: ink on washi, with a vermilion highlight

use ratatui::style::Color;

use super::Theme;

/// Sumi color palette
pub const SUMI: Theme = Theme {
    name: String::new(),

    // Background colors
    bg_primary: Color::Rgb(28, 27, 25),   // #1c1b19
    bg_secondary: Color::Rgb(42, 40, 36), // #2a2824

    // Foreground colors
    fg_primary: Color::Rgb(231, 224, 209),   // #e7e0d1
    fg_secondary: Color::Rgb(247, 242, 231), // #f7f2e7
    fg_muted: Color::Rgb(128, 120, 106),     // #80786a

    // Accent colors
    accent_primary: Color::Rgb(86, 160, 211),   // #56a0d3
    accent_secondary: Color::Rgb(214, 170, 94), // #d6aa5e

    // Semantic colors
    success: Color::Rgb(39, 174, 96),   // #27ae60
    warning: Color::Rgb(243, 156, 18),  // #f39c12
    error: Color::Rgb(231, 76, 60),     // #e74c3c
    info: Color::Rgb(93, 173, 226),     // #5dade2

    // Stroke canvas
    stroke_ghost: Color::Rgb(70, 66, 60),         // #46423c
    stroke_active: Color::Rgb(86, 160, 211),      // #56a0d3
    stroke_done: Color::Rgb(247, 242, 231),       // #f7f2e7
    stroke_highlight: Color::Rgb(227, 66, 52),    // #e34234
    stroke_label: Color::Rgb(214, 170, 94),       // #d6aa5e
    canvas_guide: Color::Rgb(52, 49, 45),         // #34312d

    // UI elements
    border: Color::Rgb(70, 66, 60),           // #46423c
    border_focused: Color::Rgb(86, 160, 211), // #56a0d3
    selection: Color::Rgb(58, 54, 48),        // #3a3630
};

impl Theme {
    pub fn sumi() -> Self {
        Theme { name: "Sumi".to_string(), ..SUMI }
    }
}
