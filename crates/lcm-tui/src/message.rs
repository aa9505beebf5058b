//! Messages into the state machine and the requests it emits

use crate::snapshot::ContainerRecord;
use crossterm::event::{KeyCode, KeyModifiers};
use lcm_provider::ContainerId;
use std::time::Duration;

/// Grace period handed to the daemon on stop/restart
pub const STOP_TIMEOUT_SECS: u32 = 10;

/// Lifecycle operations on a single container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
    Destroy,
}

impl ContainerAction {
    /// Verb used in failure messages
    pub fn verb(&self) -> &'static str {
        match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Restart => "restart",
            ContainerAction::Destroy => "destroy",
        }
    }

    /// Status shown while the request is in flight
    pub fn progress(&self) -> &'static str {
        match self {
            ContainerAction::Start => "Starting container...",
            ContainerAction::Stop => "Stopping container...",
            ContainerAction::Restart => "Restarting container...",
            ContainerAction::Destroy => "Destroying container...",
        }
    }

    /// Status shown once the daemon accepted the request
    pub fn done(&self, id: &ContainerId) -> String {
        match self {
            ContainerAction::Start => format!("Started container {}", id),
            ContainerAction::Stop => format!("Stopped container {}", id),
            ContainerAction::Restart => format!("Restarted container {}", id),
            ContainerAction::Destroy => format!("Destroyed container {}", id),
        }
    }
}

/// Mouse wheel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up,
    Down,
}

/// Everything the state machine reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Bracketed paste
    Paste(String),
    Wheel(Scroll),
    Resize {
        width: u16,
        height: u16,
    },
    SnapshotLoaded {
        seq: u64,
        manual: bool,
        result: Result<Vec<ContainerRecord>, String>,
    },
    ActionFinished {
        action: ContainerAction,
        id: ContainerId,
        result: Result<(), String>,
    },
    /// Pretty-printed inspect record
    InspectLoaded {
        request: u64,
        name: String,
        result: Result<String, String>,
    },
    LogsLoaded {
        request: u64,
        name: String,
        result: Result<String, String>,
    },
    ExecFinished {
        session: u64,
        result: Result<String, String>,
    },
    BrowserOpened {
        url: String,
        result: Result<(), String>,
    },
    /// Periodic refresh timer fired
    Tick,
    /// Delayed revert of the status line to the count summary
    ClearStatus {
        generation: u64,
    },
}

/// Request descriptors executed off the UI task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadSnapshot {
        seq: u64,
        manual: bool,
    },
    Action {
        action: ContainerAction,
        id: ContainerId,
    },
    Inspect {
        request: u64,
        id: ContainerId,
        name: String,
    },
    Logs {
        request: u64,
        id: ContainerId,
        name: String,
        tail: usize,
    },
    Exec {
        session: u64,
        container: ContainerId,
        argv: Vec<String>,
    },
    OpenBrowser {
        url: String,
    },
    ScheduleTick {
        after: Duration,
    },
    ScheduleStatusClear {
        generation: u64,
        after: Duration,
    },
}
