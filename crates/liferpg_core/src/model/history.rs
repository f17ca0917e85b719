use crate::model::DailyTask;
use serde::{Deserialize, Serialize};

/// Per-day summary ledger entry. Once `finalized` is set the entry is
/// write-once; only the in-progress entry for today may be replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    #[serde(default)]
    pub tasks: Vec<DailyTask>,
    #[serde(default)]
    pub xp_gained: u64,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub finalized: bool,
}
