//! UI rendering for the dashboard
//!
//! Rendering is a pure function of [`App`]; nothing here mutates state.

mod containers;
mod header_footer;
mod overlays;
mod pager;

use crate::app::{App, ViewMode};
use crate::layout;
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
};

use containers::*;
use header_footer::*;
use overlays::*;
use pager::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();

    match app.mode {
        ViewMode::List => draw_list_screen(frame, app, area),
        ViewMode::Inspect | ViewMode::Logs => draw_pager(frame, app, area),
        ViewMode::Shell => {
            draw_list_screen(frame, app, area);
            draw_shell(frame, app, area);
        }
        ViewMode::Search => {
            draw_list_screen(frame, app, area);
            draw_search(frame, app, area);
        }
    }
}

/// Title, table, scroll indicator, status line and controls box
fn draw_list_screen(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(0),    // Table
            Constraint::Length(2), // Scroll indicator
            Constraint::Length(2), // Status
            Constraint::Length(8), // Controls
        ])
        .split(area);

    let capacity = layout::row_capacity(area.height, chunks[1].height);
    let window = layout::scroll_window(app.containers.len(), app.selected, capacity);

    draw_title(frame, app, chunks[0]);
    draw_containers(frame, app, chunks[1], window);
    draw_scroll_indicator(frame, app, chunks[2], window);
    draw_status(frame, app, chunks[3]);
    draw_controls(frame, app, chunks[4]);
}

/// Bordered popup block shared by the overlays
fn overlay_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(color).bold())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .padding(Padding::new(2, 2, 1, 1))
}

/// Text input with a block cursor; newlines from pastes are shown as `↵`
fn input_spans(before: &str, after: &str) -> Vec<Span<'static>> {
    let visible = |s: &str| s.replace('\n', "↵");
    vec![
        Span::raw(visible(before)),
        Span::styled("█", Style::default().fg(Color::White)),
        Span::raw(visible(after)),
    ]
}
