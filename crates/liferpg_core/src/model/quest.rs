use crate::model::Task;
use serde::{Deserialize, Serialize};

/// A quest template in the pool. Survives across days; daily tasks are
/// drawn from it by value copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub xp: u32,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyTaskStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// One day's drawn instance of a quest. Superseded at rollover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: String,
    pub title: String,
    pub xp: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub status: DailyTaskStatus,
    #[serde(default)]
    pub earned_xp: u32,
}

impl DailyTask {
    pub fn from_quest(quest: &Quest) -> Self {
        Self {
            id: quest.id.clone(),
            title: quest.title.clone(),
            xp: quest.xp,
            completed: false,
            status: DailyTaskStatus::Pending,
            earned_xp: 0,
        }
    }

    /// Day-summary record for a free-form task completed that day, so
    /// journal entries carry both kinds of outcome.
    pub fn from_completed_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            xp: task.xp,
            completed: true,
            status: DailyTaskStatus::Completed,
            earned_xp: task.earned_xp,
        }
    }
}
