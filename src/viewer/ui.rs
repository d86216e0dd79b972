//! UI rendering logic
//!
//! Layout:
//! - Title bar (1 line): program name, dialect toggle, file name
//! - Middle section:
//!   - Left: editor above a token strip
//!   - Right: tree pane
//! - Status line (1 line): focus, cursor, located error or notice, key hints

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::app::App;
use super::model::Focus;
use super::viewer::Viewer;
use crate::dialect::Dialect;

/// Minimum terminal width required for the UI
pub const MIN_TERMINAL_WIDTH: u16 = 60;
/// Rows given to the token strip, borders included
const TOKEN_STRIP_HEIGHT: u16 = 5;
/// Share of the width given to the left column
const EDITOR_PERCENT: u16 = 55;

const KEY_HINTS: &str = "Tab focus · F2 dialect · ^R analyze · ^S save · ^Q quit";

pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    if size.width < MIN_TERMINAL_WIDTH {
        render_error_too_narrow(frame, size, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    render_title_bar(frame, chunks[0], app);
    render_middle_section(frame, chunks[1], app);
    render_status_line(frame, chunks[2], app);
}

fn render_error_too_narrow(frame: &mut Frame, area: Rect, app: &App) {
    let msg = format!(
        "Terminal too narrow: {} < {} chars",
        area.width, MIN_TERMINAL_WIDTH
    );
    let paragraph = Paragraph::new(msg).style(app.theme.status_error());
    frame.render_widget(paragraph, area);
}

fn render_title_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let current = app.model.workbench().dialect();
    let mut spans = vec![Span::styled(" structura ", theme.title_bar())];
    for dialect in [Dialect::Flex, Dialect::Bison] {
        let style = if dialect == current {
            theme.title_dialect_selected()
        } else {
            theme.title_bar()
        };
        spans.push(Span::styled(" ", theme.title_bar()));
        spans.push(Span::styled(format!(" {} ", dialect.label()), style));
    }
    spans.push(Span::styled(
        format!("  {}", app.model.file_name()),
        theme.title_bar(),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme.title_bar());
    frame.render_widget(paragraph, area);
}

fn render_middle_section(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_PERCENT),
            Constraint::Percentage(100 - EDITOR_PERCENT),
        ])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(TOKEN_STRIP_HEIGHT)])
        .split(columns[0]);

    render_editor(frame, left[0], app);
    render_token_strip(frame, left[1], app);
    render_tree(frame, columns[1], app);
}

fn pane_block(title: String, focused: bool, app: &App) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.pane_border(focused))
        .title(title)
}

fn render_editor(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Editor;
    let title = format!("Source ({})", app.model.workbench().dialect().label());
    let block = pane_block(title, focused, app);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.editor.render(frame, inner, &app.model, &app.theme);
}

fn render_token_strip(frame: &mut Frame, area: Rect, app: &App) {
    let tokens = app.model.workbench().analysis().tokens();
    let block = pane_block(format!("Tokens ({})", tokens.len()), false, app);

    let mut spans = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("{}:", token.token_type),
            app.theme.token_type(),
        ));
        spans.push(Span::styled(
            format!(" {}", token.value),
            app.theme.token_value(),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_tree(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Tree;
    let pending = app.model.workbench().in_flight() > 0;
    let title = if pending {
        "AST (analyzing…)".to_string()
    } else {
        "AST".to_string()
    };
    let block = pane_block(title, focused, app);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.tree_viewer.render(frame, inner, &app.model, &app.theme);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let (row, col) = app.editor.cursor_position();
    let mut spans = vec![
        Span::styled(format!(" {} ", app.focus.label()), theme.status_label()),
        Span::raw(format!("Ln {}, Col {} │ ", row + 1, col + 1)),
    ];

    if let Some(notice) = app.model.notice() {
        spans.push(Span::raw(format!("{notice} │ ")));
    }
    match app.model.workbench().current_error() {
        Some(error) => spans.push(Span::styled(
            format!("{}:{} {} │ ", error.line, error.column, error.message),
            theme.status_error(),
        )),
        None => spans.push(Span::raw("no errors │ ")),
    }
    spans.push(Span::raw(KEY_HINTS));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme.status_bar());
    frame.render_widget(paragraph, area);
}
