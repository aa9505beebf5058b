use super::*;
use ansi_to_tui::IntoText;
use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

/// Log lines keep their ANSI colors; anything unparsable falls back to raw text
fn log_line(line: &str) -> Line<'static> {
    match line.into_text() {
        Ok(text) => text.lines.into_iter().next().unwrap_or_default(),
        Err(_) => Line::raw(line.to_string()),
    }
}

/// Draw the Inspect or Logs view over the whole screen
pub(super) fn draw_pager(frame: &mut Frame, app: &App, area: Rect) {
    let Some(pager) = &app.pager else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let pane = chunks[0];

    let viewport = (pane.height.saturating_sub(2) as usize).max(1);
    let total = pager.lines.len();
    let scroll = pager.scroll.min(pager.max_scroll(viewport));
    let (first, last) = pager.position(viewport);
    let ansi = app.mode == ViewMode::Logs;

    let text: Vec<Line> = pager
        .lines
        .iter()
        .skip(scroll)
        .take(viewport)
        .map(|line| {
            if ansi {
                log_line(line)
            } else {
                Line::raw(line.as_str())
            }
        })
        .collect();

    let title = format!(" {} [{}-{}/{}] ", pager.title, first, last, total);
    let output = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(output, pane);

    // Render scrollbar if content exceeds visible area
    if total > viewport {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(viewport)).position(scroll);
        let scrollbar_area = Rect {
            x: pane.x + pane.width.saturating_sub(1),
            y: pane.y + 1,
            width: 1,
            height: pane.height.saturating_sub(2),
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }

    let footer = Paragraph::new(
        " Esc/q: back  j/k: scroll  PgUp/PgDn: page  g/G: top/bottom",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[1]);
}
