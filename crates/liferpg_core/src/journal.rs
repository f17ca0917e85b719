use crate::level;
use crate::model::{AppState, DailyTask, HistoryEntry};
use crate::streak;

/// XP credited across a day's task outcomes.
pub fn xp_gained(tasks: &[DailyTask]) -> u64 {
    tasks
        .iter()
        .filter(|task| task.completed)
        .map(|task| u64::from(task.earned_xp))
        .sum()
}

/// Inserts or replaces the entry for its date. A finalized entry is
/// write-once: later upserts for the same date are ignored.
pub fn upsert(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    match history.iter().position(|existing| existing.date == entry.date) {
        Some(index) => {
            if !history[index].finalized {
                history[index] = entry;
            }
        }
        None => history.push(entry),
    }
}

/// A day's full outcome list: the drawn quest set plus any free-form
/// completions credited under that day key.
pub fn day_outcomes(state: &AppState, day_key: &str) -> Vec<DailyTask> {
    let mut tasks = state.daily.tasks.clone();
    tasks.extend(
        state
            .tasks
            .iter()
            .filter(|task| task.completed_on.as_deref() == Some(day_key))
            .map(DailyTask::from_completed_task),
    );
    tasks
}

/// The provisional, non-finalized summary of the in-progress day.
/// Recomputed on every pass; replaced for real at rollover.
pub fn today_entry(state: &AppState, today_key: &str) -> HistoryEntry {
    let tasks = day_outcomes(state, today_key);
    let xp_gained = xp_gained(&tasks);
    HistoryEntry {
        date: today_key.to_string(),
        tasks,
        xp_gained,
        streak: streak::effective(&state.streak, today_key, state.daily.completed_count),
        level: level::level_info(state.total_xp).level,
        finalized: false,
    }
}

/// All journal entries, newest first, with a synthesized entry for
/// today when none is stored yet.
pub fn entries_sorted(state: &AppState, today_key: &str) -> Vec<HistoryEntry> {
    let mut entries = state.history.clone();
    if !entries.iter().any(|entry| entry.date == today_key) {
        entries.push(today_entry(state, today_key));
    }
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}
