//! Main TUI application state and logic
//!
//! [`App`] owns every piece of dashboard state. [`App::update`] consumes one
//! [`Message`] at a time and returns the [`Command`]s that should run in the
//! background; their completions come back as further messages.

use crate::browser;
use crate::event::EventHandler;
use crate::filter::{self, FilterToggles};
use crate::message::{Command, ContainerAction, Message, Scroll};
use crate::pager::{self, Pager};
use crate::search::{ResultTarget, SearchState};
use crate::shell_session::{self, Commit, ShellSession};
use crate::snapshot::ContainerRecord;
use crate::ui;
use crate::worker::Worker;
use crossterm::event::{KeyCode, KeyModifiers};
use lcm_provider::{ContainerId, ContainerStatus, ProviderError};
use ratatui::prelude::*;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

pub type AppResult<T> = Result<T, AppError>;

/// How long terminal polling blocks before checking for shutdown
const EVENT_POLL: Duration = Duration::from_millis(250);
const REFRESHED_REVERT: Duration = Duration::from_secs(2);
const FILTER_REVERT: Duration = Duration::from_secs(3);
/// Pager lines moved per wheel notch
const WHEEL_STEP: usize = 3;

const NO_SELECTION: &str = "No container selected";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Period of the silent background refresh
    pub refresh_interval: Duration,
    /// Number of log lines fetched for the Logs view
    pub log_tail: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(1),
            log_tail: 100,
        }
    }
}

/// Active view; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Inspect,
    Logs,
    Shell,
    Search,
}

/// Status line text plus a counter that invalidates delayed reverts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    generation: u64,
}

impl StatusLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the text; returns the new generation
    pub fn set(&mut self, text: impl Into<String>) -> u64 {
        self.generation += 1;
        self.text = text.into();
        self.generation
    }

    pub fn clear(&mut self) {
        self.set(String::new());
    }
}

/// Container waiting for a y/n answer before it is removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyConfirmation {
    pub id: ContainerId,
    pub name: String,
}

impl DestroyConfirmation {
    pub fn prompt(&self) -> String {
        format!("Destroy container {}? (y/n)", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Inspect,
    Logs,
}

/// The one inspect/logs request whose result may still open a pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRequest {
    id: u64,
    kind: PendingKind,
}

/// Application state
pub struct App {
    pub config: AppConfig,
    /// Runtime label shown in the title bar
    pub connection_label: String,
    pub mode: ViewMode,
    /// Every container from the last successful refresh
    pub snapshot: Vec<ContainerRecord>,
    /// Visible containers (snapshot after filtering)
    pub containers: Vec<ContainerRecord>,
    /// Cursor into `containers`
    pub selected: usize,
    pub filters: FilterToggles,
    /// True until the first snapshot arrives
    pub loading: bool,
    pub status: StatusLine,
    pub destroy: Option<DestroyConfirmation>,
    /// Inspect/Logs content
    pub pager: Option<Pager>,
    pub shell: Option<ShellSession>,
    pub search: Option<SearchState>,
    /// Terminal size
    pub width: u16,
    pub height: u16,
    pub should_quit: bool,
    requested_seq: u64,
    applied_seq: u64,
    next_request: u64,
    pending: Option<PendingRequest>,
    next_session: u64,
}

impl App {
    /// Create a new application
    pub fn new(connection_label: impl Into<String>, config: AppConfig) -> Self {
        Self {
            config,
            connection_label: connection_label.into(),
            mode: ViewMode::List,
            snapshot: Vec::new(),
            containers: Vec::new(),
            selected: 0,
            filters: FilterToggles::default(),
            loading: true,
            status: StatusLine::default(),
            destroy: None,
            pager: None,
            shell: None,
            search: None,
            width: 80,
            height: 24,
            should_quit: false,
            requested_seq: 0,
            applied_seq: 0,
            next_request: 0,
            pending: None,
            next_session: 0,
        }
    }

    /// App with no daemon behind it, sized 120x40 and already loaded
    pub fn new_for_testing() -> Self {
        let mut app = Self::new("Test Runtime", AppConfig::default());
        app.width = 120;
        app.height = 40;
        app.loading = false;
        app
    }

    /// Build a container record for tests
    pub fn create_test_container(id: &str, name: &str, state: ContainerStatus) -> ContainerRecord {
        let status = match state {
            ContainerStatus::Running => "Up 2 hours".to_string(),
            ContainerStatus::Exited => "Exited (0) 3 minutes ago".to_string(),
            other => other.to_string(),
        };
        ContainerRecord {
            id: ContainerId::new(id),
            name: name.to_string(),
            image: format!("{}:latest", name),
            status,
            state,
            ports: Vec::new(),
        }
    }

    /// Requests issued at startup: first load and the refresh timer
    pub fn init(&mut self) -> Vec<Command> {
        vec![
            self.load_snapshot(false),
            Command::ScheduleTick {
                after: self.config.refresh_interval,
            },
        ]
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        worker: &Worker,
        messages: &mut mpsc::UnboundedReceiver<Message>,
    ) -> AppResult<()> {
        let mut events = EventHandler::new(EVENT_POLL);
        worker.dispatch(self.init());

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let message = tokio::select! {
                event = events.next() => match event {
                    Some(event) => event.into_message(),
                    None => break,
                },
                message = messages.recv() => message,
            };

            if let Some(message) = message {
                let commands = self.update(message);
                worker.dispatch(commands);
            }
        }

        Ok(())
    }

    /// Currently selected container
    pub fn selected_container(&self) -> Option<&ContainerRecord> {
        self.containers.get(self.selected)
    }

    /// Replace the snapshot and recompute the visible list
    pub fn set_snapshot(&mut self, records: Vec<ContainerRecord>) {
        self.snapshot = records;
        self.refilter();
    }

    /// `1 container` / `N containers` for the visible list
    pub fn count_summary(&self) -> String {
        match self.containers.len() {
            1 => "1 container".to_string(),
            n => format!("{} containers", n),
        }
    }

    /// Convenience for feeding a key press through [`App::update`]
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
        self.update(Message::Key { code, modifiers })
    }

    /// Apply one message; returns the requests to run in the background
    pub fn update(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::Key { code, modifiers } => self.handle_key(code, modifiers),
            Message::Paste(text) => {
                self.handle_paste(&text);
                Vec::new()
            }
            Message::Wheel(direction) => {
                self.handle_wheel(direction);
                Vec::new()
            }
            Message::Resize { width, height } => {
                self.width = width;
                self.height = height;
                Vec::new()
            }
            Message::SnapshotLoaded {
                seq,
                manual,
                result,
            } => self.on_snapshot(seq, manual, result),
            Message::ActionFinished { action, id, result } => {
                self.on_action_finished(action, &id, result)
            }
            Message::InspectLoaded {
                request,
                name,
                result,
            } => {
                self.on_payload(PendingKind::Inspect, request, &name, result);
                Vec::new()
            }
            Message::LogsLoaded {
                request,
                name,
                result,
            } => {
                self.on_payload(PendingKind::Logs, request, &name, result);
                Vec::new()
            }
            Message::ExecFinished { session, result } => {
                match self.shell.as_mut() {
                    Some(shell) if shell.id == session => shell.apply_result(result),
                    _ => tracing::debug!("Discarding exec result for closed session {}", session),
                }
                Vec::new()
            }
            Message::BrowserOpened { url, result } => {
                match result {
                    Ok(()) => self.status.set(format!("Opened {} in browser", url)),
                    Err(e) => self.status.set(format!("Failed to open browser: {}", e)),
                };
                Vec::new()
            }
            Message::Tick => vec![
                self.load_snapshot(false),
                Command::ScheduleTick {
                    after: self.config.refresh_interval,
                },
            ],
            Message::ClearStatus { generation } => {
                if generation == self.status.generation() {
                    let summary = self.count_summary();
                    self.status.set(summary);
                }
                Vec::new()
            }
        }
    }

    fn load_snapshot(&mut self, manual: bool) -> Command {
        self.requested_seq += 1;
        Command::LoadSnapshot {
            seq: self.requested_seq,
            manual,
        }
    }

    fn refilter(&mut self) {
        self.containers = filter::filter(&self.snapshot, self.filters);
        self.selected = filter::clamp_cursor(self.selected, self.containers.len());
    }

    fn on_snapshot(
        &mut self,
        seq: u64,
        manual: bool,
        result: Result<Vec<ContainerRecord>, String>,
    ) -> Vec<Command> {
        if seq <= self.applied_seq {
            tracing::debug!("Ignoring snapshot {} (have {})", seq, self.applied_seq);
            return Vec::new();
        }
        self.applied_seq = seq;
        self.loading = false;

        match result {
            Ok(records) => {
                self.set_snapshot(records);
                if manual {
                    let generation = self.status.set("Containers refreshed");
                    return vec![Command::ScheduleStatusClear {
                        generation,
                        after: REFRESHED_REVERT,
                    }];
                }
                if self.status.is_empty() {
                    let summary = self.count_summary();
                    self.status.set(summary);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to refresh containers: {}", e);
                self.status.set(format!("Failed to refresh containers: {}", e));
            }
        }
        Vec::new()
    }

    fn on_action_finished(
        &mut self,
        action: ContainerAction,
        id: &ContainerId,
        result: Result<(), String>,
    ) -> Vec<Command> {
        match result {
            Ok(()) => {
                self.status.set(action.done(id));
                vec![self.load_snapshot(false)]
            }
            Err(e) => {
                self.status
                    .set(format!("Failed to {}: {}", action.verb(), e));
                Vec::new()
            }
        }
    }

    fn on_payload(
        &mut self,
        kind: PendingKind,
        request: u64,
        name: &str,
        result: Result<String, String>,
    ) {
        let current = self.pending == Some(PendingRequest { id: request, kind });
        if self.mode != ViewMode::List || !current {
            tracing::debug!("Discarding stale {:?} result for {}", kind, name);
            return;
        }
        self.pending = None;

        // Switching views would hide the pending y/n prompt
        if self.destroy.is_some() {
            tracing::debug!("Dropping {:?} result for {} behind destroy prompt", kind, name);
            return;
        }

        match result {
            Ok(text) => {
                match kind {
                    PendingKind::Inspect => {
                        self.pager = Some(Pager::new(format!("Inspect: {}", name), &text));
                        self.mode = ViewMode::Inspect;
                    }
                    PendingKind::Logs => {
                        let title = format!("Logs: {} (last {} lines)", name, self.config.log_tail);
                        let mut pager = Pager::new(title, &text);
                        pager.scroll_to_end(pager::viewport_rows(self.height));
                        self.pager = Some(pager);
                        self.mode = ViewMode::Logs;
                    }
                }
                self.status.clear();
            }
            Err(e) => {
                self.status.set(format!("Error: {}", e));
            }
        }
    }

    /// Handle key press
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        match self.mode {
            ViewMode::List => self.handle_list_key(code),
            ViewMode::Inspect | ViewMode::Logs => {
                self.handle_pager_key(code);
                Vec::new()
            }
            ViewMode::Shell => self.handle_shell_key(code, modifiers),
            ViewMode::Search => self.handle_search_key(code, modifiers),
        }
    }

    /// Handle List view keys
    fn handle_list_key(&mut self, code: KeyCode) -> Vec<Command> {
        if self.destroy.is_some() {
            return self.handle_destroy_key(code);
        }

        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }

            // Navigation
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = filter::clamp_cursor(self.selected + 1, self.containers.len());
                Vec::new()
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected = 0;
                Vec::new()
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.containers.len().saturating_sub(1);
                Vec::new()
            }

            // Lifecycle
            KeyCode::Char('s') => self.container_action(ContainerAction::Start),
            KeyCode::Char('t') => self.container_action(ContainerAction::Stop),
            KeyCode::Char('R') => self.container_action(ContainerAction::Restart),
            KeyCode::Char('d') => {
                self.confirm_destroy();
                Vec::new()
            }

            // Views
            KeyCode::Char('i') => self.request_payload(PendingKind::Inspect),
            KeyCode::Char('l') => self.request_payload(PendingKind::Logs),
            KeyCode::Char('e') | KeyCode::Char('x') => {
                self.open_shell();
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.search = Some(SearchState::new(&self.containers));
                self.mode = ViewMode::Search;
                Vec::new()
            }
            KeyCode::Char('o') => self.open_browser(),

            // Filters
            KeyCode::Char('h') => {
                self.filters.hide_system = !self.filters.hide_system;
                let text = if self.filters.hide_system {
                    "Hiding Kubernetes containers"
                } else {
                    "Showing Kubernetes containers"
                };
                self.filter_changed(text)
            }
            KeyCode::Char('a') => {
                self.filters.hide_exited = !self.filters.hide_exited;
                let text = if self.filters.hide_exited {
                    "Hiding exited containers"
                } else {
                    "Showing all containers (including exited)"
                };
                self.filter_changed(text)
            }

            KeyCode::Char('r') | KeyCode::F(5) => {
                self.status.clear();
                vec![self.load_snapshot(true)]
            }

            _ => Vec::new(),
        }
    }

    /// Keys while a destroy confirmation is pending
    fn handle_destroy_key(&mut self, code: KeyCode) -> Vec<Command> {
        match code {
            KeyCode::Char('y') => match self.destroy.take() {
                Some(target) => {
                    self.status
                        .set(format!("Destroying container {}...", target.name));
                    vec![Command::Action {
                        action: ContainerAction::Destroy,
                        id: target.id,
                    }]
                }
                None => Vec::new(),
            },
            KeyCode::Char('n') | KeyCode::Esc => {
                self.destroy = None;
                self.status.set("Destroy cancelled");
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn container_action(&mut self, action: ContainerAction) -> Vec<Command> {
        let Some(id) = self.selected_container().map(|c| c.id.clone()) else {
            self.status.set(NO_SELECTION);
            return Vec::new();
        };
        self.status.set(action.progress());
        vec![Command::Action { action, id }]
    }

    fn confirm_destroy(&mut self) {
        let Some(container) = self.selected_container() else {
            self.status.set(NO_SELECTION);
            return;
        };
        let target = DestroyConfirmation {
            id: container.id.clone(),
            name: container.name.clone(),
        };
        self.status.set(target.prompt());
        self.destroy = Some(target);
    }

    fn request_payload(&mut self, kind: PendingKind) -> Vec<Command> {
        let Some(container) = self.selected_container().cloned() else {
            self.status.set(NO_SELECTION);
            return Vec::new();
        };

        self.next_request += 1;
        let request = self.next_request;
        self.pending = Some(PendingRequest { id: request, kind });

        match kind {
            PendingKind::Inspect => {
                self.status.set("Loading inspection data...");
                vec![Command::Inspect {
                    request,
                    id: container.id,
                    name: container.name,
                }]
            }
            PendingKind::Logs => {
                self.status.set("Loading logs...");
                vec![Command::Logs {
                    request,
                    id: container.id,
                    name: container.name,
                    tail: self.config.log_tail,
                }]
            }
        }
    }

    fn open_shell(&mut self) {
        let Some(container) = self.selected_container().cloned() else {
            self.status.set(NO_SELECTION);
            return;
        };
        self.next_session += 1;
        self.status
            .set(format!("Opening shell in {}...", container.name));
        let session = ShellSession::new(self.next_session, container.id, &container.name);
        self.shell = Some(session);
        self.mode = ViewMode::Shell;
    }

    fn open_browser(&mut self) -> Vec<Command> {
        let Some(container) = self.selected_container().cloned() else {
            self.status.set(NO_SELECTION);
            return Vec::new();
        };

        match container.first_host_port() {
            Some(port) => {
                let url = browser::local_url(port);
                self.status.set("Opening browser...");
                vec![Command::OpenBrowser { url }]
            }
            None if container.ports.is_empty() => {
                self.status.set("Container has no exposed ports");
                Vec::new()
            }
            None => {
                let have = container.ports.join(", ");
                self.status.set(format!("No mapped ports (have: {})", have));
                Vec::new()
            }
        }
    }

    fn filter_changed(&mut self, text: &str) -> Vec<Command> {
        self.refilter();
        let generation = self.status.set(text);
        vec![Command::ScheduleStatusClear {
            generation,
            after: FILTER_REVERT,
        }]
    }

    /// Handle Inspect/Logs keys
    fn handle_pager_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
            self.pager = None;
            self.mode = ViewMode::List;
            return;
        }

        let viewport = pager::viewport_rows(self.height);
        let Some(pager) = self.pager.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char('k') | KeyCode::Up => pager.scroll_up(1),
            KeyCode::Char('j') | KeyCode::Down => pager.scroll_down(1, viewport),
            KeyCode::PageUp => pager.scroll_up(viewport),
            KeyCode::PageDown => pager.scroll_down(viewport, viewport),
            KeyCode::Char('g') | KeyCode::Home => pager.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => pager.scroll_to_end(viewport),
            _ => {}
        }
    }

    /// Handle Shell overlay keys
    fn handle_shell_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
        let Some(session) = self.shell.as_mut() else {
            self.mode = ViewMode::List;
            return Vec::new();
        };

        match code {
            KeyCode::Esc => {
                self.shell = None;
                self.mode = ViewMode::List;
            }
            KeyCode::Enter => match session.commit() {
                Commit::Run(line) => {
                    return vec![Command::Exec {
                        session: session.id,
                        container: session.container_id.clone(),
                        argv: shell_session::exec_argv(&line),
                    }];
                }
                Commit::Busy => {
                    let text = format!("Command still running in {}", session.container_name);
                    self.status.set(text);
                }
                Commit::Empty => {}
            },
            KeyCode::Backspace => session.input.backspace(),
            KeyCode::Left => session.input.move_left(),
            KeyCode::Right => session.input.move_right(),
            KeyCode::Home => session.input.home(),
            KeyCode::End => session.input.end(),
            KeyCode::Char(c) if is_text(modifiers) => session.input.insert(c),
            _ => {}
        }
        Vec::new()
    }

    /// Handle Search overlay keys
    fn handle_search_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
        let Some(search) = self.search.as_mut() else {
            self.mode = ViewMode::List;
            return Vec::new();
        };

        match code {
            KeyCode::Esc => {
                self.search = None;
                self.mode = ViewMode::List;
            }
            KeyCode::Enter => return self.apply_search(),
            KeyCode::Up => search.move_up(),
            KeyCode::Down => search.move_down(),
            KeyCode::Backspace => {
                search.query.backspace();
                search.recompute(&self.containers);
            }
            KeyCode::Char(c) if is_text(modifiers) => {
                search.query.insert(c);
                search.recompute(&self.containers);
            }
            _ => {}
        }
        Vec::new()
    }

    /// Act on the selected search result
    fn apply_search(&mut self) -> Vec<Command> {
        let Some(result) = self
            .search
            .as_ref()
            .and_then(|s| s.selected_result())
            .cloned()
        else {
            self.status.set("No matching results");
            return Vec::new();
        };

        self.search = None;
        self.mode = ViewMode::List;

        match result.target {
            ResultTarget::Container(id) => {
                if let Some(index) = self.containers.iter().position(|c| c.id == id) {
                    self.selected = index;
                }
                Vec::new()
            }
            ResultTarget::Command(key) => self.handle_list_key(KeyCode::Char(key)),
        }
    }

    /// Insert pasted text into whichever text field is active
    fn handle_paste(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.mode {
            ViewMode::Shell => {
                if let Some(session) = self.shell.as_mut() {
                    session.input.insert_str(text);
                }
            }
            ViewMode::Search => {
                if let Some(search) = self.search.as_mut() {
                    search.query.insert_str(text);
                    search.recompute(&self.containers);
                }
            }
            ViewMode::List | ViewMode::Inspect | ViewMode::Logs => {
                tracing::debug!("Ignoring paste in {:?} view", self.mode);
            }
        }
    }

    fn handle_wheel(&mut self, direction: Scroll) {
        match self.mode {
            ViewMode::List => match direction {
                Scroll::Up => self.selected = self.selected.saturating_sub(1),
                Scroll::Down => {
                    self.selected = filter::clamp_cursor(self.selected + 1, self.containers.len())
                }
            },
            ViewMode::Inspect | ViewMode::Logs => {
                let viewport = pager::viewport_rows(self.height);
                if let Some(pager) = self.pager.as_mut() {
                    match direction {
                        Scroll::Up => pager.scroll_up(WHEEL_STEP),
                        Scroll::Down => pager.scroll_down(WHEEL_STEP, viewport),
                    }
                }
            }
            ViewMode::Search => {
                if let Some(search) = self.search.as_mut() {
                    match direction {
                        Scroll::Up => search.move_up(),
                        Scroll::Down => search.move_down(),
                    }
                }
            }
            ViewMode::Shell => {}
        }
    }
}

/// Plain typing (Shift allowed, no Ctrl/Alt chords)
fn is_text(modifiers: KeyModifiers) -> bool {
    !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
