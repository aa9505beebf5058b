use super::*;
use crate::layout::{CURSOR_COL, STATE_WIDTH};
use crate::snapshot::ContainerRecord;
use lcm_provider::ContainerStatus;

const HEADERS: [&str; 4] = ["ID", "NAME", "IMAGE", "OPENPORTS"];

fn state_color(state: ContainerStatus) -> Color {
    match state {
        ContainerStatus::Running => Color::Green,
        ContainerStatus::Paused | ContainerStatus::Restarting => Color::Yellow,
        ContainerStatus::Created => Color::Cyan,
        ContainerStatus::Dead | ContainerStatus::Removing => Color::Red,
        ContainerStatus::Exited | ContainerStatus::Unknown => Color::DarkGray,
    }
}

/// Draw the container table for the rows in `window`
pub(super) fn draw_containers(frame: &mut Frame, app: &App, area: Rect, window: (usize, usize)) {
    if app.loading || app.containers.is_empty() {
        let text = if app.loading {
            "Loading containers..."
        } else {
            "No containers found."
        };
        let empty = Paragraph::new(format!(" {}", text)).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width as usize;
    let visible = &app.containers[window.0..window.1];
    let widths = layout::column_widths(visible, width);

    // Header row, aligned with the cursor column of the data rows
    let left = layout::left_section(HEADERS, &widths);
    let gap = layout::right_gap(&left, &widths, width);
    let header = format!(
        "{}{}{}{}  {}",
        " ".repeat(CURSOR_COL),
        left,
        " ".repeat(gap),
        layout::fit("STATE", STATE_WIDTH),
        layout::fit("STATUS", widths.status)
    );

    let mut lines = vec![
        Line::styled(
            header,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Line::styled("─".repeat(width), Style::default().fg(Color::DarkGray)),
    ];

    lines.extend(visible.iter().enumerate().map(|(offset, container)| {
        let selected = window.0 + offset == app.selected;
        container_row(container, selected, &widths, width)
    }));

    frame.render_widget(Paragraph::new(lines), area);
}

fn container_row(
    container: &ContainerRecord,
    selected: bool,
    widths: &layout::ColumnWidths,
    width: usize,
) -> Line<'static> {
    let ports = layout::ports_cell(container);
    let left = layout::left_section(
        [container.id.0.as_str(), &container.name, &container.image, &ports],
        widths,
    );
    let gap = layout::right_gap(&left, widths, width);
    let cursor = if selected { "▶ " } else { "  " };

    let line = Line::from(vec![
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
        Span::raw(left),
        Span::raw(" ".repeat(gap)),
        Span::styled(
            layout::fit(&container.state.to_string(), STATE_WIDTH),
            Style::default().fg(state_color(container.state)),
        ),
        Span::raw("  "),
        Span::raw(layout::fit(&container.status, widths.status)),
    ]);

    if selected {
        line.style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    } else {
        line
    }
}
