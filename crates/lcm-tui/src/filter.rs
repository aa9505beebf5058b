//! Filtered view over the container snapshot

use crate::snapshot::ContainerRecord;
use lcm_provider::ContainerStatus;

/// Name prefix of containers managed by Kubernetes
pub const SYSTEM_PREFIX: &str = "k8s_";

/// Visibility toggles; both start on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterToggles {
    pub hide_system: bool,
    pub hide_exited: bool,
}

impl Default for FilterToggles {
    fn default() -> Self {
        Self {
            hide_system: true,
            hide_exited: true,
        }
    }
}

/// Compute the visible list from the full snapshot, preserving order
pub fn filter(snapshot: &[ContainerRecord], toggles: FilterToggles) -> Vec<ContainerRecord> {
    snapshot
        .iter()
        .filter(|c| !(toggles.hide_system && c.name.starts_with(SYSTEM_PREFIX)))
        .filter(|c| !(toggles.hide_exited && c.state == ContainerStatus::Exited))
        .cloned()
        .collect()
}

/// Clamp a cursor into `[0, len - 1]` (0 for an empty list)
pub fn clamp_cursor(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        cursor.min(len - 1)
    }
}
