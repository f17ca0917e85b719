use crate::model::{DailyTask, HistoryEntry, Quest, Task};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Consecutive qualifying days (a day qualifies when it had at least
/// one completed task). Invariant: `count == 0` iff
/// `last_completed_date` is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub last_completed_date: Option<String>,
}

/// Today's drawn task set plus the running completion counter. The
/// counter resets at rollover and feeds the provisional streak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyState {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tasks: Vec<DailyTask>,
    #[serde(default)]
    pub completed_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub unlocked_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareState {
    #[serde(default)]
    pub last_generated_at: Option<String>,
}

/// The whole persisted game state. Owned by the caller and threaded
/// through every operation; loaded at operation start and flushed back
/// after each mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub total_xp: u64,
    #[serde(default)]
    pub daily: DailyState,
    #[serde(default)]
    pub streak: StreakRecord,
    #[serde(default)]
    pub quest_pool: Vec<Quest>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub achievements: BTreeMap<String, AchievementRecord>,
    #[serde(default)]
    pub share: ShareState,
}

impl AppState {
    /// Restores internal invariants after loading possibly hand-edited
    /// or partially-shaped data. Never fails; bad shapes are repaired.
    pub fn repair(&mut self) {
        if self.streak.count == 0 || self.streak.last_completed_date.is_none() {
            self.streak.count = 0;
            self.streak.last_completed_date = None;
        }
        for task in &mut self.tasks {
            if task.xp == 0 {
                task.xp = 1;
            }
            if !task.completed {
                task.earned_xp = 0;
                task.completed_on = None;
            }
        }
        for quest in &mut self.quest_pool {
            if quest.xp == 0 {
                quest.xp = 1;
            }
        }
    }

    /// Whether any task, daily or free-form, past or present, was ever
    /// completed.
    pub fn any_completion(&self) -> bool {
        self.tasks.iter().any(|task| task.completed)
            || self.daily.tasks.iter().any(|task| task.completed)
            || self
                .history
                .iter()
                .any(|entry| entry.tasks.iter().any(|task| task.completed))
    }
}
