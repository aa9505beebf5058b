use super::*;
use crate::search::SearchResult;
use crate::shell_session::SessionState;
use crate::widgets::overlay_rect;

/// Rows of a popup not available to shell output
const SHELL_CHROME: u16 = 8;
/// Rows of a popup not available to search results
const SEARCH_CHROME: u16 = 10;
const MIN_LIST_ROWS: u16 = 5;

/// Draw the shell popup over the list screen
pub(super) fn draw_shell(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = &app.shell else {
        return;
    };

    let popup = overlay_rect(80, 80, 60, 20, area);
    frame.render_widget(Clear, popup);

    let block = overlay_block(format!(" Shell: {} ", session.container_name), Color::Green);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let output_rows = popup.height.saturating_sub(SHELL_CHROME).max(MIN_LIST_ROWS);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(output_rows), // Scrollback
            Constraint::Length(1),           // Truncation notice
            Constraint::Length(1),           // Divider
            Constraint::Length(1),           // Prompt
            Constraint::Length(1),           // Help
        ])
        .split(inner);

    let width = inner.width as usize;
    let total = session.scrollback.len();
    let start = total.saturating_sub(output_rows as usize);
    let output: Vec<Line> = session.scrollback[start..]
        .iter()
        .map(|line| Line::raw(layout::truncate(line, width)))
        .collect();
    frame.render_widget(Paragraph::new(output), chunks[0]);

    if start > 0 {
        let notice = format!("showing {}-{} of {} lines", start + 1, total, total);
        frame.render_widget(
            Paragraph::new(notice).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
    }

    frame.render_widget(
        Paragraph::new("─".repeat(width)).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );

    let mut prompt = vec![Span::styled("$ ", Style::default().fg(Color::Green).bold())];
    prompt.extend(input_spans(
        session.input.before_cursor(),
        session.input.after_cursor(),
    ));
    if session.state == SessionState::AwaitingResult {
        prompt.push(Span::styled(
            "  (running)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(prompt)), chunks[3]);

    frame.render_widget(
        Paragraph::new("ESC exit shell  |  ENTER send command")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );
}

fn result_line(result: &SearchResult, selected: bool, width: usize) -> Line<'static> {
    let marker = if selected { "▶ " } else { "  " };
    let kind = if result.is_container() { "[container] " } else { "[command]   " };
    let label = layout::truncate(&result.label, width.saturating_sub(2 + kind.len()));

    let line = Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(kind, Style::default().fg(Color::DarkGray)),
        Span::raw(label),
    ]);
    if selected {
        line.style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    } else {
        line
    }
}

/// Draw the search popup over the list screen
pub(super) fn draw_search(frame: &mut Frame, app: &App, area: Rect) {
    let Some(search) = &app.search else {
        return;
    };

    let popup = overlay_rect(70, 60, 50, 15, area);
    frame.render_widget(Clear, popup);

    let block = overlay_block(" Search ".to_string(), Color::Cyan);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let result_rows = popup.height.saturating_sub(SEARCH_CHROME).max(MIN_LIST_ROWS);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // Query
            Constraint::Length(1),           // Spacer
            Constraint::Length(result_rows), // Results
            Constraint::Length(1),           // Detail of the selected result
            Constraint::Length(1),           // Position
            Constraint::Length(1),           // Help
        ])
        .split(inner);

    let mut query = vec![Span::styled("> ", Style::default().fg(Color::Cyan).bold())];
    query.extend(input_spans(
        search.query.before_cursor(),
        search.query.after_cursor(),
    ));
    frame.render_widget(Paragraph::new(Line::from(query)), chunks[0]);

    let width = inner.width as usize;
    let total = search.results.len();
    if total == 0 {
        frame.render_widget(
            Paragraph::new("  No results found").style(Style::default().fg(Color::DarkGray)),
            chunks[2],
        );
    } else {
        let rows = result_rows as usize;
        let start = (search.selected + 1).saturating_sub(rows);
        let end = (start + rows).min(total);
        let lines: Vec<Line> = search.results[start..end]
            .iter()
            .enumerate()
            .map(|(offset, result)| result_line(result, start + offset == search.selected, width))
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[2]);

        if total > rows {
            let position = format!("Showing {}-{} of {} results", start + 1, end, total);
            frame.render_widget(
                Paragraph::new(position).style(Style::default().fg(Color::DarkGray)),
                chunks[4],
            );
        }
    }

    if let Some(result) = search.selected_result() {
        let detail = layout::truncate(&result.detail, width.saturating_sub(4));
        frame.render_widget(
            Paragraph::new(format!("    {}", detail))
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)),
            chunks[3],
        );
    }

    frame.render_widget(
        Paragraph::new("↑↓ navigate  ENTER select  ESC cancel")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[5],
    );
}
