//! Search over visible containers and the dashboard's own commands

use crate::snapshot::ContainerRecord;
use crate::widgets::TextInputState;
use lcm_provider::ContainerId;

/// An action reachable from the search box, mirrored by its list-mode key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub key: char,
    pub name: &'static str,
    pub description: &'static str,
}

/// Commands offered by search, in display order
pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry { key: 's', name: "Start", description: "Start the selected container" },
    CommandEntry { key: 't', name: "Stop", description: "Stop the selected container" },
    CommandEntry { key: 'R', name: "Restart", description: "Restart the selected container" },
    CommandEntry { key: 'i', name: "Inspect", description: "View container details" },
    CommandEntry { key: 'l', name: "Logs", description: "View container logs" },
    CommandEntry { key: 'e', name: "Shell", description: "Open shell in container" },
    CommandEntry { key: 'o', name: "Browser", description: "Open container port in browser" },
    CommandEntry { key: 'h', name: "Toggle K8s", description: "Show/hide Kubernetes containers" },
    CommandEntry { key: 'a', name: "Toggle Exited", description: "Show/hide exited containers" },
    CommandEntry { key: 'r', name: "Refresh", description: "Refresh container list" },
    CommandEntry { key: 'd', name: "Destroy", description: "Remove the selected container" },
];

/// What a search result points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultTarget {
    Container(ContainerId),
    Command(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub label: String,
    pub detail: String,
    pub target: ResultTarget,
}

impl SearchResult {
    pub fn is_container(&self) -> bool {
        matches!(self.target, ResultTarget::Container(_))
    }
}

/// Rank containers (in list order) then commands (in table order) against `query`
///
/// Matching is a case-insensitive substring test; an empty query matches everything.
pub fn search(query: &str, containers: &[ContainerRecord]) -> Vec<SearchResult> {
    let query = query.to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&query);

    let container_hits = containers
        .iter()
        .filter(|c| {
            let ports = c.ports.join(" ");
            hit(&c.name) || hit(&c.image) || hit(&c.id.0) || hit(&ports)
        })
        .map(|c| SearchResult {
            label: c.name.clone(),
            detail: format!(
                "{} | {} | {} | {}",
                c.id,
                c.image,
                c.ports_joined(", ").unwrap_or_else(|| "no ports".to_string()),
                c.state
            ),
            target: ResultTarget::Container(c.id.clone()),
        });

    let command_hits = COMMANDS
        .iter()
        .filter(|cmd| hit(cmd.name) || hit(cmd.description))
        .map(|cmd| SearchResult {
            label: format!("[{}] {}", cmd.key, cmd.name),
            detail: cmd.description.to_string(),
            target: ResultTarget::Command(cmd.key),
        });

    container_hits.chain(command_hits).collect()
}

/// Search overlay state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: TextInputState,
    pub results: Vec<SearchResult>,
    pub selected: usize,
}

impl SearchState {
    /// Open with an empty query
    pub fn new(containers: &[ContainerRecord]) -> Self {
        let mut state = Self::default();
        state.recompute(containers);
        state
    }

    /// Re-run the query; the selection goes back to the top
    pub fn recompute(&mut self, containers: &[ContainerRecord]) {
        self.results = search(self.query.value(), containers);
        self.selected = 0;
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.selected)
    }
}
