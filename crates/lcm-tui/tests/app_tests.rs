//! Integration tests for how the App reacts to background completions

mod helpers;

use crossterm::event::KeyCode;
use lcm_provider::{ContainerId, ContainerStatus};
use lcm_tui::message::Scroll;
use lcm_tui::{App, AppConfig, Command, ContainerAction, Message, ViewMode};
use std::time::Duration;

use helpers::{app_with_containers, press, type_text};

fn records(names: &[&str]) -> Vec<lcm_tui::snapshot::ContainerRecord> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            App::create_test_container(&format!("{:012}", i), name, ContainerStatus::Running)
        })
        .collect()
}

fn loaded(seq: u64, names: &[&str]) -> Message {
    Message::SnapshotLoaded {
        seq,
        manual: false,
        result: Ok(records(names)),
    }
}

/// Issue an inspect or logs request and return its id
fn request_id(commands: &[Command]) -> u64 {
    match commands {
        [Command::Inspect { request, .. }] | [Command::Logs { request, .. }] => *request,
        other => panic!("expected a single inspect/logs request, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Startup and refresh
// ---------------------------------------------------------------------------

/// init() loads once and starts the refresh timer
#[test]
fn test_init_schedules_load_and_tick() {
    let mut app = App::new("Docker", AppConfig::default());
    assert!(app.loading);

    let commands = app.init();
    assert_eq!(
        commands,
        vec![
            Command::LoadSnapshot {
                seq: 1,
                manual: false,
            },
            Command::ScheduleTick {
                after: Duration::from_secs(1),
            },
        ]
    );
}

/// The first snapshot ends loading and reports the count
#[test]
fn test_first_snapshot_sets_summary() {
    let mut app = App::new("Docker", AppConfig::default());
    let commands = app.init();
    let Command::LoadSnapshot { seq, .. } = commands[0] else {
        panic!("expected a snapshot load first");
    };

    app.update(loaded(seq, &["web", "db"]));

    assert!(!app.loading);
    assert_eq!(app.containers.len(), 2);
    assert_eq!(app.status.text(), "2 containers");
}

/// Each tick reloads and re-arms the timer
#[test]
fn test_tick_rearms() {
    let mut app = App::new("Docker", AppConfig::default());
    let commands = app.update(Message::Tick);
    assert!(matches!(
        commands.as_slice(),
        [
            Command::LoadSnapshot { manual: false, .. },
            Command::ScheduleTick { .. }
        ]
    ));
}

/// A snapshot older than the one already applied is ignored
#[test]
fn test_stale_snapshot_ignored() {
    let mut app = App::new_for_testing();
    app.update(loaded(2, &["new"]));
    app.update(loaded(1, &["old-a", "old-b"]));

    assert_eq!(app.containers.len(), 1);
    assert_eq!(app.containers[0].name, "new");
}

/// A failed refresh keeps the previous list and says why
#[test]
fn test_snapshot_error_keeps_list() {
    let mut app = App::new_for_testing();
    app.update(loaded(1, &["web"]));
    app.update(Message::SnapshotLoaded {
        seq: 2,
        manual: false,
        result: Err("connection refused".to_string()),
    });

    assert_eq!(app.containers.len(), 1);
    assert_eq!(
        app.status.text(),
        "Failed to refresh containers: connection refused"
    );
}

/// The cursor survives a refresh that removes rows below it
#[test]
fn test_refresh_clamps_cursor() {
    let mut app = App::new_for_testing();
    app.update(loaded(1, &["a", "b", "c"]));
    press(&mut app, KeyCode::Char('G'));
    app.update(loaded(2, &["a"]));
    assert_eq!(app.selected, 0);
}

/// A manual refresh confirms itself and schedules the revert
#[test]
fn test_manual_refresh_status() {
    let mut app = app_with_containers();
    let commands = press(&mut app, KeyCode::Char('r'));
    let Command::LoadSnapshot { seq, .. } = commands[0] else {
        panic!("expected a snapshot load");
    };

    let commands = app.update(Message::SnapshotLoaded {
        seq,
        manual: true,
        result: Ok(records(&["web"])),
    });

    assert_eq!(app.status.text(), "Containers refreshed");
    assert_eq!(
        commands,
        vec![Command::ScheduleStatusClear {
            generation: app.status.generation(),
            after: Duration::from_secs(2),
        }]
    );
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// A revert only fires if nothing replaced the message in between
#[test]
fn test_status_revert_respects_generation() {
    let mut app = app_with_containers();
    let commands = press(&mut app, KeyCode::Char('h'));
    let Command::ScheduleStatusClear { generation, .. } = commands[0] else {
        panic!("expected a status revert");
    };

    app.status.set("Started container aaaaaaaaaaaa");
    app.update(Message::ClearStatus { generation });
    assert_eq!(app.status.text(), "Started container aaaaaaaaaaaa");

    let commands = press(&mut app, KeyCode::Char('h'));
    let Command::ScheduleStatusClear { generation, .. } = commands[0] else {
        panic!("expected a status revert");
    };
    app.update(Message::ClearStatus { generation });
    assert_eq!(app.status.text(), "3 containers");
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Success reports the outcome and triggers a refresh
#[test]
fn test_action_success_refreshes() {
    let mut app = app_with_containers();
    let commands = app.update(Message::ActionFinished {
        action: ContainerAction::Stop,
        id: ContainerId::new("aaaaaaaaaaaa"),
        result: Ok(()),
    });

    assert_eq!(app.status.text(), "Stopped container aaaaaaaaaaaa");
    assert!(matches!(
        commands.as_slice(),
        [Command::LoadSnapshot { manual: false, .. }]
    ));
}

/// Failure reports the daemon's reason and does not refresh
#[test]
fn test_action_failure() {
    let mut app = app_with_containers();
    let commands = app.update(Message::ActionFinished {
        action: ContainerAction::Start,
        id: ContainerId::new("aaaaaaaaaaaa"),
        result: Err("port is already allocated".to_string()),
    });

    assert!(commands.is_empty());
    assert_eq!(app.status.text(), "Failed to start: port is already allocated");
}

/// A completion landing while the destroy prompt is up leaves the guard armed
#[test]
fn test_completion_during_destroy_prompt() {
    let mut app = app_with_containers();
    press(&mut app, KeyCode::Char('s'));
    press(&mut app, KeyCode::Char('d'));

    app.update(Message::ActionFinished {
        action: ContainerAction::Start,
        id: ContainerId::new("aaaaaaaaaaaa"),
        result: Ok(()),
    });

    let confirm = app.destroy.as_ref().unwrap();
    assert_eq!(confirm.prompt(), "Destroy container web? (y/n)");

    press(&mut app, KeyCode::Char('n'));
    assert!(app.destroy.is_none());
    assert_eq!(app.status.text(), "Destroy cancelled");
}

// ---------------------------------------------------------------------------
// Inspect / Logs results
// ---------------------------------------------------------------------------

/// An inspect result never opens a pager over a pending destroy prompt
#[test]
fn test_payload_dropped_behind_destroy_prompt() {
    let mut app = app_with_containers();
    let request = request_id(&press(&mut app, KeyCode::Char('i')));
    press(&mut app, KeyCode::Char('d'));

    app.update(Message::InspectLoaded {
        request,
        name: "web".to_string(),
        result: Ok("{}".to_string()),
    });

    assert_eq!(app.mode, ViewMode::List);
    assert!(app.pager.is_none());
    assert!(app.destroy.is_some());
    assert_eq!(app.status.text(), "Destroy container web? (y/n)");

    // The request is spent; a late duplicate is ignored too
    press(&mut app, KeyCode::Esc);
    app.update(Message::InspectLoaded {
        request,
        name: "web".to_string(),
        result: Ok("{}".to_string()),
    });
    assert_eq!(app.mode, ViewMode::List);
    assert!(app.destroy.is_none());
}

/// Inspect output opens at the top
#[test]
fn test_inspect_opens_pager() {
    let mut app = app_with_containers();
    let request = request_id(&press(&mut app, KeyCode::Char('i')));

    app.update(Message::InspectLoaded {
        request,
        name: "web".to_string(),
        result: Ok("{\n  \"Id\": \"aaaaaaaaaaaa\"\n}".to_string()),
    });

    assert_eq!(app.mode, ViewMode::Inspect);
    let pager = app.pager.as_ref().unwrap();
    assert_eq!(pager.lines.len(), 3);
    assert_eq!(pager.scroll, 0);
    assert!(app.status.is_empty());
}

/// Logs open scrolled to the newest line
#[test]
fn test_logs_open_at_end() {
    let mut app = app_with_containers();
    let request = request_id(&press(&mut app, KeyCode::Char('l')));
    let text: String = (1..=100).map(|i| format!("line {}\n", i)).collect();

    app.update(Message::LogsLoaded {
        request,
        name: "web".to_string(),
        result: Ok(text),
    });

    assert_eq!(app.mode, ViewMode::Logs);
    // 40 rows leave 37 for text
    assert_eq!(app.pager.as_ref().unwrap().scroll, 63);
}

/// Only the most recent request may open a pager
#[test]
fn test_superseded_request_discarded() {
    let mut app = app_with_containers();
    let first = request_id(&press(&mut app, KeyCode::Char('i')));
    let second = request_id(&press(&mut app, KeyCode::Char('l')));

    app.update(Message::InspectLoaded {
        request: first,
        name: "web".to_string(),
        result: Ok("{}".to_string()),
    });
    assert_eq!(app.mode, ViewMode::List);

    app.update(Message::LogsLoaded {
        request: second,
        name: "web".to_string(),
        result: Ok("hello".to_string()),
    });
    assert_eq!(app.mode, ViewMode::Logs);
}

/// Results arriving after the user moved to another view are dropped
#[test]
fn test_result_outside_list_discarded() {
    let mut app = app_with_containers();
    let request = request_id(&press(&mut app, KeyCode::Char('i')));
    press(&mut app, KeyCode::Char('e'));

    app.update(Message::InspectLoaded {
        request,
        name: "web".to_string(),
        result: Ok("{}".to_string()),
    });

    assert_eq!(app.mode, ViewMode::Shell);
    assert!(app.pager.is_none());
}

/// Errors surface in the status line and keep the list
#[test]
fn test_inspect_error() {
    let mut app = app_with_containers();
    let request = request_id(&press(&mut app, KeyCode::Char('i')));

    app.update(Message::InspectLoaded {
        request,
        name: "web".to_string(),
        result: Err("No such container".to_string()),
    });

    assert_eq!(app.mode, ViewMode::List);
    assert_eq!(app.status.text(), "Error: No such container");
}

// ---------------------------------------------------------------------------
// Shell results
// ---------------------------------------------------------------------------

/// Output lands in the scrollback followed by a blank line
#[test]
fn test_exec_output_appended() {
    let mut app = app_with_containers();
    press(&mut app, KeyCode::Char('e'));
    type_text(&mut app, "echo hi");
    press(&mut app, KeyCode::Enter);
    let session = app.shell.as_ref().unwrap().id;

    app.update(Message::ExecFinished {
        session,
        result: Ok("hi\n".to_string()),
    });

    let scrollback = &app.shell.as_ref().unwrap().scrollback;
    let tail: Vec<&str> = scrollback.iter().rev().take(3).rev().map(String::as_str).collect();
    assert_eq!(tail, vec!["$ echo hi", "hi", ""]);
}

/// A result for a session that was closed is dropped
#[test]
fn test_exec_result_for_closed_session() {
    let mut app = app_with_containers();
    press(&mut app, KeyCode::Char('e'));
    type_text(&mut app, "sleep 1");
    press(&mut app, KeyCode::Enter);
    let old_session = app.shell.as_ref().unwrap().id;

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('e'));
    let before = app.shell.as_ref().unwrap().scrollback.clone();

    app.update(Message::ExecFinished {
        session: old_session,
        result: Ok("late output".to_string()),
    });

    assert_eq!(app.shell.as_ref().unwrap().scrollback, before);
}

// ---------------------------------------------------------------------------
// Terminal size
// ---------------------------------------------------------------------------

/// Resize records the new size and keeps the current view
#[test]
fn test_resize_keeps_mode() {
    let mut app = app_with_containers();
    let request = request_id(&press(&mut app, KeyCode::Char('l')));
    let text: String = (1..=100).map(|i| format!("line {}\n", i)).collect();
    app.update(Message::LogsLoaded {
        request,
        name: "web".to_string(),
        result: Ok(text),
    });

    let commands = app.update(Message::Resize {
        width: 80,
        height: 24,
    });

    assert!(commands.is_empty());
    assert_eq!((app.width, app.height), (80, 24));
    assert_eq!(app.mode, ViewMode::Logs);

    // Paging now uses the smaller viewport: 24 rows leave 21 for text
    press(&mut app, KeyCode::Char('g'));
    press(&mut app, KeyCode::PageDown);
    assert_eq!(app.pager.as_ref().unwrap().scroll, 21);
}

// ---------------------------------------------------------------------------
// Paste and mouse
// ---------------------------------------------------------------------------

/// Pasted text is inserted whole into the shell prompt
#[test]
fn test_paste_into_shell() {
    let mut app = app_with_containers();
    press(&mut app, KeyCode::Char('e'));
    app.update(Message::Paste("ls -la /tmp".to_string()));

    assert_eq!(app.shell.as_ref().unwrap().input.value(), "ls -la /tmp");
}

/// Pasting into search re-runs the query
#[test]
fn test_paste_into_search() {
    let mut app = app_with_containers();
    press(&mut app, KeyCode::Char('/'));
    app.update(Message::Paste("db".to_string()));

    let search = app.search.as_ref().unwrap();
    assert_eq!(search.query.value(), "db");
    assert_eq!(search.results[0].label, "db");
}

/// Paste in the list is ignored
#[test]
fn test_paste_in_list_ignored() {
    let mut app = app_with_containers();
    let commands = app.update(Message::Paste("q".to_string()));
    assert!(commands.is_empty());
    assert!(!app.should_quit);
}

/// The wheel moves the list cursor
#[test]
fn test_wheel_moves_cursor() {
    let mut app = app_with_containers();
    app.update(Message::Wheel(Scroll::Down));
    app.update(Message::Wheel(Scroll::Down));
    assert_eq!(app.selected, 2);
    app.update(Message::Wheel(Scroll::Up));
    assert_eq!(app.selected, 1);
}

/// In the pager the wheel scrolls three lines at a time
#[test]
fn test_wheel_scrolls_pager() {
    let mut app = app_with_containers();
    let request = request_id(&press(&mut app, KeyCode::Char('i')));
    let text: String = (1..=100).map(|i| format!("{}\n", i)).collect();
    app.update(Message::InspectLoaded {
        request,
        name: "web".to_string(),
        result: Ok(text),
    });

    app.update(Message::Wheel(Scroll::Down));
    app.update(Message::Wheel(Scroll::Down));
    assert_eq!(app.pager.as_ref().unwrap().scroll, 6);
    app.update(Message::Wheel(Scroll::Up));
    assert_eq!(app.pager.as_ref().unwrap().scroll, 3);
    assert_eq!(app.selected, 0);
}

// ---------------------------------------------------------------------------
// Browser
// ---------------------------------------------------------------------------

/// The launcher outcome is reported
#[test]
fn test_browser_result_status() {
    let mut app = app_with_containers();
    app.update(Message::BrowserOpened {
        url: "http://localhost:8080".to_string(),
        result: Ok(()),
    });
    assert_eq!(app.status.text(), "Opened http://localhost:8080 in browser");

    app.update(Message::BrowserOpened {
        url: "http://localhost:8080".to_string(),
        result: Err("No such file or directory".to_string()),
    });
    assert_eq!(
        app.status.text(),
        "Failed to open browser: No such file or directory"
    );
}
