mod history;
mod quest;
mod state;
mod task;

pub use history::HistoryEntry;
pub use quest::{DailyTask, DailyTaskStatus, Quest};
pub use state::{AchievementRecord, AppState, DailyState, ShareState, StreakRecord};
pub use task::Task;
