use crossterm::event::{KeyCode, KeyModifiers};
use lcm_provider::ContainerStatus;
use lcm_tui::snapshot::ContainerRecord;
use lcm_tui::App;
use ratatui::{backend::TestBackend, Terminal};

/// Render the app to a TestBackend and capture output as a string
#[allow(dead_code)]
pub fn render_app(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| lcm_tui::ui::draw(frame, app)).unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer_to_string(&buffer)
}

/// Convert a ratatui buffer to a string representation
#[allow(dead_code)]
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            let cell = buffer.get(x, y);
            output.push_str(cell.symbol());
        }
        output.push('\n');
    }
    output
}

/// App whose snapshot holds three running containers: web, db, cache
#[allow(dead_code)]
pub fn app_with_containers() -> App {
    let mut app = App::new_for_testing();
    app.set_snapshot(vec![
        App::create_test_container("aaaaaaaaaaaa", "web", ContainerStatus::Running),
        App::create_test_container("bbbbbbbbbbbb", "db", ContainerStatus::Running),
        App::create_test_container("cccccccccccc", "cache", ContainerStatus::Running),
    ]);
    app
}

/// Container record with explicit ports
#[allow(dead_code)]
pub fn with_ports(mut record: ContainerRecord, ports: &[&str]) -> ContainerRecord {
    record.ports = ports.iter().map(|p| p.to_string()).collect();
    record
}

/// Press a plain key
#[allow(dead_code)]
pub fn press(app: &mut App, code: KeyCode) -> Vec<lcm_tui::Command> {
    app.send_key(code, KeyModifiers::NONE)
}

/// Type every character of `text`
#[allow(dead_code)]
pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.send_key(KeyCode::Char(c), KeyModifiers::NONE);
    }
}
