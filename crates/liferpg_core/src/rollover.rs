use crate::dates;
use crate::error::AppError;
use crate::journal;
use crate::level;
use crate::model::{AppState, DailyTask, DailyTaskStatus, HistoryEntry, StreakRecord};
use crate::roller;
use rand::Rng;
use time::Date;

/// Reconciles the stored day with the wall-clock day. Called at the
/// start of every operation; returns whether a new day was rolled.
///
/// On a day change the previous day is finalized (pending tasks fail,
/// the streak delta is committed, a write-once journal entry lands),
/// skipped days are back-filled, and a fresh quest set is drawn.
pub fn ensure_current_day<R: Rng + ?Sized>(
    state: &mut AppState,
    today: Date,
    rng: &mut R,
) -> Result<bool, AppError> {
    let today_key = dates::day_key(today);

    // A malformed stored date is repaired by starting a fresh day
    // rather than refusing to load.
    let stored_day = state
        .daily
        .date
        .as_deref()
        .and_then(|key| dates::parse_day_key(key).ok());

    match stored_day {
        Some(day) if day == today => Ok(false),
        Some(day) => {
            finalize_day(state, day);
            backfill_gap(state, day, today, rng)?;
            roll_fresh_day(state, &today_key, rng);
            Ok(true)
        }
        None => {
            roll_fresh_day(state, &today_key, rng);
            Ok(true)
        }
    }
}

/// Closes out the stored day: fails what was not completed, commits the
/// streak contribution anchored to that date, and writes the finalized
/// journal entry.
fn finalize_day(state: &mut AppState, day: Date) {
    let day_key = dates::day_key(day);

    for task in &mut state.daily.tasks {
        if !task.completed {
            task.status = DailyTaskStatus::Failed;
        }
    }

    let had_completion = state.daily.completed_count > 0;
    if had_completion {
        commit_qualifying_day(&mut state.streak, day, &day_key);
    } else {
        state.streak.count = 0;
        state.streak.last_completed_date = None;
    }

    let mut tasks = std::mem::take(&mut state.daily.tasks);
    tasks.extend(
        state
            .tasks
            .iter()
            .filter(|task| task.completed_on.as_deref() == Some(day_key.as_str()))
            .map(DailyTask::from_completed_task),
    );
    let xp_gained = journal::xp_gained(&tasks);
    let entry = HistoryEntry {
        date: day_key,
        tasks,
        xp_gained,
        streak: state.streak.count,
        level: level::level_info(state.total_xp).level,
        finalized: true,
    };
    journal::upsert(&mut state.history, entry);
}

/// Streak update for a day that had at least one completion. Anchored
/// to that specific date, not "today": consecutive with the previous
/// qualifying date extends the run, anything else restarts at 1. A
/// repeated commit for the same date is a no-op.
fn commit_qualifying_day(streak: &mut StreakRecord, day: Date, day_key: &str) {
    if streak.last_completed_date.as_deref() == Some(day_key) {
        return;
    }

    let consecutive = streak
        .last_completed_date
        .as_deref()
        .and_then(|key| dates::parse_day_key(key).ok())
        .is_some_and(|last| dates::gap_days(last, day) == 1);

    streak.count = if consecutive { streak.count + 1 } else { 1 };
    streak.last_completed_date = Some(day_key.to_string());
}

/// Synthesizes an all-failed quest roll and a zero-streak finalized
/// entry for every skipped date, so the journal has no silent gaps. Any
/// gap of more than one day breaks the streak outright.
fn backfill_gap<R: Rng + ?Sized>(
    state: &mut AppState,
    day: Date,
    today: Date,
    rng: &mut R,
) -> Result<(), AppError> {
    if dates::gap_days(day, today) <= 1 {
        return Ok(());
    }

    state.streak.count = 0;
    state.streak.last_completed_date = None;

    for julian in (day.to_julian_day() + 1)..today.to_julian_day() {
        let missed = dates::date_from_julian(julian)?;
        let mut tasks = roller::roll(&state.quest_pool, rng);
        for task in &mut tasks {
            task.status = DailyTaskStatus::Failed;
        }
        let entry = HistoryEntry {
            date: dates::day_key(missed),
            tasks,
            xp_gained: 0,
            streak: 0,
            level: level::level_info(state.total_xp).level,
            finalized: true,
        };
        journal::upsert(&mut state.history, entry);
    }

    Ok(())
}

fn roll_fresh_day<R: Rng + ?Sized>(state: &mut AppState, today_key: &str, rng: &mut R) {
    state.daily.tasks = roller::roll(&state.quest_pool, rng);
    state.daily.date = Some(today_key.to_string());
    state.daily.completed_count = 0;
}
