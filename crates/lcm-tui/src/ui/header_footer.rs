use super::*;

pub(super) fn draw_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "Local Container Manager (lcm)",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!(" [Connected to: {}]", app.connection_label),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

/// Shown only when the list is longer than the visible window
pub(super) fn draw_scroll_indicator(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    window: (usize, usize),
) {
    let total = app.containers.len();
    if window.0 == window.1 || window.1 - window.0 >= total {
        return;
    }
    let text = format!(
        " Showing {}-{} of {} containers (scroll with ↑/↓)",
        window.0 + 1,
        window.1,
        total
    );
    let indicator = Paragraph::new(vec![
        Line::default(),
        Line::styled(text, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(indicator, area);
}

/// A pending destroy prompt outranks whatever the status line last said
pub(super) fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match &app.destroy {
        Some(confirm) => (confirm.prompt(), Color::Red),
        None if app.status.is_empty() => return,
        None => (app.status.text().to_string(), Color::Yellow),
    };
    let status = Line::from(vec![
        Span::styled(" ● ", Style::default().fg(color)),
        Span::styled(text, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

/// One row of the controls box: a label then `key: action` pairs
fn key_line(label: &str, keys: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<12}", label),
        Style::default().fg(Color::Gray).bold(),
    )];
    for (key, action) in keys {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::Cyan).bold(),
        ));
        spans.push(Span::raw(format!(": {}  ", action)));
    }
    Line::from(spans)
}

pub(super) fn draw_controls(frame: &mut Frame, app: &App, area: Rect) {
    let shown = |hidden: bool| if hidden { "show" } else { "hide" };
    let k8s = format!("{} K8s", shown(app.filters.hide_system));
    let exited = format!("{} exited", shown(app.filters.hide_exited));

    let lines = vec![
        key_line(
            "Navigation:",
            &[("↑/k", "Up"), ("↓/j", "Down"), ("g/G", "Top/Bottom"), ("/", "Search")],
        ),
        key_line(
            "Actions:",
            &[("s", "Start"), ("t", "Stop"), ("R", "Restart"), ("d", "Destroy")],
        ),
        key_line(
            "Views:",
            &[("i", "Inspect"), ("l", "Logs"), ("e/x", "Shell"), ("o", "Browser")],
        ),
        key_line("Filters:", &[("h", k8s.as_str()), ("a", exited.as_str())]),
        key_line("Other:", &[("r/F5", "Refresh"), ("q", "Quit")]),
    ];

    let controls = Paragraph::new(lines).block(
        Block::default()
            .title(" Controls ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(controls, area);
}
