use serde::{Deserialize, Serialize};

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PassReport {
    pub cycle_id: String,
    pub ran: bool,
    pub fetched: usize,
    pub changed: usize,
    pub unknown: usize,
    pub posted: usize,
    pub purged: usize,
}
