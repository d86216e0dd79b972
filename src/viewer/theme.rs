//! Theme configuration for the viewer
//!
//! Two layers:
//!
//! **Presentation layer:** [`PresentationStyles`] holds the concrete styles,
//! grouped by semantic role (`active`, `normal`, `error`, ...). Colors are
//! tweaked here.
//!
//! **Application layer:** [`Theme`] methods are named after the UI element
//! they style (`editor_cursor()`, `tree_selected()`, `gutter_error()`). Elements
//! that should look alike return the same presentation style, so changing one
//! role updates every element that shares it.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct PresentationStyles {
    /// Cursors and selected rows
    pub active: Style,
    pub normal: Style,
    /// Secondary text: line numbers, collapsed rows, token values
    pub muted: Style,
    /// Field names and token types
    pub label: Style,
    pub error: Style,
    /// Text covered by a diagnostic marker
    pub marker: Style,
    pub title: Style,
    /// The selected dialect in the title bar
    pub title_selected: Style,
    pub panel_bg: Style,
    pub border: Style,
    pub border_focused: Style,
}

#[derive(Debug, Clone)]
pub struct Theme {
    presentation: PresentationStyles,
}

impl Theme {
    pub fn editor_cursor(&self) -> Style {
        self.presentation.active
    }

    pub fn editor_text(&self) -> Style {
        self.presentation.normal
    }

    /// Same role as the editor cursor.
    pub fn tree_selected(&self) -> Style {
        self.presentation.active
    }

    pub fn tree_normal(&self) -> Style {
        self.presentation.normal
    }

    pub fn tree_collapsed(&self) -> Style {
        self.presentation.muted
    }

    pub fn tree_error(&self) -> Style {
        self.presentation.error
    }

    pub fn gutter(&self) -> Style {
        self.presentation.muted
    }

    /// Line number of the line carrying the located error.
    pub fn gutter_error(&self) -> Style {
        self.presentation.error
    }

    pub fn diagnostic_marker(&self) -> Style {
        self.presentation.marker
    }

    pub fn token_type(&self) -> Style {
        self.presentation.label
    }

    pub fn token_value(&self) -> Style {
        self.presentation.muted
    }

    pub fn title_bar(&self) -> Style {
        self.presentation.title
    }

    pub fn title_dialect_selected(&self) -> Style {
        self.presentation.title_selected
    }

    pub fn status_bar(&self) -> Style {
        self.presentation.panel_bg
    }

    pub fn status_label(&self) -> Style {
        self.presentation.label
    }

    pub fn status_error(&self) -> Style {
        self.presentation.error
    }

    pub fn pane_border(&self, focused: bool) -> Style {
        if focused {
            self.presentation.border_focused
        } else {
            self.presentation.border
        }
    }

    pub fn with_presentation(presentation: PresentationStyles) -> Self {
        Theme { presentation }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            presentation: PresentationStyles {
                active: Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
                normal: Style::default(),
                muted: Style::default().fg(Color::DarkGray),
                label: Style::default().fg(Color::Yellow),
                error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                marker: Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::UNDERLINED),
                title: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                title_selected: Style::default()
                    .fg(Color::White)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
                panel_bg: Style::default().bg(Color::Black).fg(Color::White),
                border: Style::default(),
                border_focused: Style::default().fg(Color::Cyan),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_semantic_grouping() {
        let theme = Theme::default();
        assert_eq!(
            theme.editor_cursor(),
            theme.tree_selected(),
            "Active elements should share the same style"
        );
        assert_eq!(theme.gutter_error(), theme.tree_error());
        assert_eq!(theme.editor_text(), theme.tree_normal());
    }

    #[test]
    fn test_marker_is_red_underline() {
        let marker = Theme::default().diagnostic_marker();
        assert_eq!(marker.fg, Some(Color::Red));
        assert!(marker.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_custom_presentation() {
        let mut presentation = Theme::default().presentation;
        presentation.active = Style::default().bg(Color::Green);
        let theme = Theme::with_presentation(presentation);
        assert_eq!(theme.tree_selected().bg, Some(Color::Green));
    }
}
