use crate::achievements::{self, AchievementDef};
use crate::dates;
use crate::error::AppError;
use crate::journal;
use crate::level::{self, LevelInfo};
use crate::model::{AppState, DailyTask, DailyTaskStatus, HistoryEntry, Quest, Task};
use crate::roller;
use crate::rollover;
use crate::storage::json_store;
use crate::streak;
use rand::Rng;
use std::path::Path;
use time::{Date, OffsetDateTime};

/// Result of toggling an item complete or incomplete.
#[derive(Debug, Clone)]
pub struct Completion {
    pub id: String,
    pub title: String,
    pub earned_xp: u32,
    pub total_xp: u64,
    pub unlocked: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct StatusReport {
    pub date: String,
    pub total_xp: u64,
    pub level: LevelInfo,
    pub streak: u32,
    pub multiplier: f64,
    pub daily_done: usize,
    pub daily_total: usize,
    pub open_tasks: usize,
}

#[derive(Debug, Clone)]
pub struct AchievementStatus {
    pub def: &'static AchievementDef,
    pub unlocked_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ShareCard {
    pub level: u32,
    pub total_xp: u64,
    pub streak: u32,
    pub daily_done: usize,
    pub daily_total: usize,
    pub generated_at: String,
}

pub fn add_task(title: &str, xp: u32) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, title, xp, dates::local_today(), &mut rand::rng())
}

pub fn delete_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    delete_task_with_path(&path, id, dates::local_today(), &mut rand::rng())
}

pub fn complete(id: &str) -> Result<Completion, AppError> {
    let path = json_store::store_path()?;
    complete_with_path(&path, id, dates::local_today(), &mut rand::rng())
}

pub fn uncomplete(id: &str) -> Result<Completion, AppError> {
    let path = json_store::store_path()?;
    uncomplete_with_path(&path, id, dates::local_today(), &mut rand::rng())
}

pub fn add_quest(title: &str, xp: u32) -> Result<Quest, AppError> {
    let path = json_store::store_path()?;
    add_quest_with_path(&path, title, xp, dates::local_today(), &mut rand::rng())
}

pub fn delete_quest(id: &str) -> Result<Quest, AppError> {
    let path = json_store::store_path()?;
    delete_quest_with_path(&path, id, dates::local_today(), &mut rand::rng())
}

pub fn set_quest_enabled(id: &str, enabled: bool) -> Result<Quest, AppError> {
    let path = json_store::store_path()?;
    set_quest_enabled_with_path(&path, id, enabled, dates::local_today(), &mut rand::rng())
}

pub fn reroll_today() -> Result<Vec<DailyTask>, AppError> {
    let path = json_store::store_path()?;
    reroll_with_path(&path, dates::local_today(), &mut rand::rng())
}

/// Rollover check without any other mutation; the CLI analog of the
/// original app's periodic midnight timer.
pub fn sync_day() -> Result<bool, AppError> {
    let path = json_store::store_path()?;
    sync_with_path(&path, dates::local_today(), &mut rand::rng())
}

pub fn status() -> Result<StatusReport, AppError> {
    let path = json_store::store_path()?;
    status_with_path(&path, dates::local_today(), &mut rand::rng())
}

pub fn list_tasks() -> Result<Vec<Task>, AppError> {
    let path = json_store::store_path()?;
    list_tasks_with_path(&path, dates::local_today(), &mut rand::rng())
}

pub fn list_daily() -> Result<(String, Vec<DailyTask>), AppError> {
    let path = json_store::store_path()?;
    list_daily_with_path(&path, dates::local_today(), &mut rand::rng())
}

pub fn list_quests() -> Result<Vec<Quest>, AppError> {
    let path = json_store::store_path()?;
    list_quests_with_path(&path, dates::local_today(), &mut rand::rng())
}

pub fn history_entries() -> Result<Vec<HistoryEntry>, AppError> {
    let path = json_store::store_path()?;
    history_with_path(&path, dates::local_today(), &mut rand::rng())
}

pub fn achievement_status() -> Result<Vec<AchievementStatus>, AppError> {
    let path = json_store::store_path()?;
    achievement_status_with_path(&path, dates::local_today(), &mut rand::rng())
}

pub fn generate_share() -> Result<ShareCard, AppError> {
    let path = json_store::store_path()?;
    generate_share_with_path(&path, dates::local_today(), &mut rand::rng())
}

/// Post-mutation pass: achievement thresholds, then the provisional
/// journal entry for today. Runs in this order on every operation.
fn recompute(state: &mut AppState, today_key: &str) -> Result<Vec<&'static str>, AppError> {
    let now = dates::now_rfc3339()?;
    let unlocked = achievements::evaluate(state, today_key, &now);
    let entry = journal::today_entry(state, today_key);
    journal::upsert(&mut state.history, entry);
    Ok(unlocked)
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", OffsetDateTime::now_utc().unix_timestamp_nanos())
}

fn add_task_with_path<R: Rng + ?Sized>(
    path: &Path,
    title: &str,
    xp: u32,
    today: Date,
    rng: &mut R,
) -> Result<Task, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }

    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;

    let task = Task {
        id: new_id("task"),
        title: trimmed.to_string(),
        xp: xp.max(1),
        completed: false,
        earned_xp: 0,
        completed_on: None,
    };
    // Newest first, as the original list behaved.
    state.tasks.insert(0, task.clone());

    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;

    Ok(task)
}

fn delete_task_with_path<R: Rng + ?Sized>(
    path: &Path,
    id: &str,
    today: Date,
    rng: &mut R,
) -> Result<Task, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    let today_key = dates::day_key(today);

    let index = state
        .tasks
        .iter()
        .position(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::not_found("task", trimmed_id))?;

    let removed = state.tasks.remove(index);
    if removed.completed {
        state.total_xp = state.total_xp.saturating_sub(u64::from(removed.earned_xp));
        // Completions from earlier days never counted toward today's
        // qualification, so removing one must not consume it.
        if removed.completed_on.as_deref() == Some(today_key.as_str()) {
            state.daily.completed_count = state.daily.completed_count.saturating_sub(1);
        }
    }

    recompute(&mut state, &today_key)?;
    json_store::save_state(path, &state)?;

    Ok(removed)
}

fn complete_with_path<R: Rng + ?Sized>(
    path: &Path,
    id: &str,
    today: Date,
    rng: &mut R,
) -> Result<Completion, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    let today_key = dates::day_key(today);

    // Today's quests shadow the free-form list; ids never collide
    // (quest- vs task- prefixes).
    let (id, title, earned) = if let Some(index) = state
        .daily
        .tasks
        .iter()
        .position(|task| task.id == trimmed_id)
    {
        if state.daily.tasks[index].completed {
            return Err(AppError::invalid_input("task already completed"));
        }
        state.daily.completed_count += 1;
        let run = streak::effective(&state.streak, &today_key, state.daily.completed_count);
        let earned = streak::boosted_xp(state.daily.tasks[index].xp, run);
        let task = &mut state.daily.tasks[index];
        task.completed = true;
        task.status = DailyTaskStatus::Completed;
        task.earned_xp = earned;
        (task.id.clone(), task.title.clone(), earned)
    } else if let Some(index) = state.tasks.iter().position(|task| task.id == trimmed_id) {
        if state.tasks[index].completed {
            return Err(AppError::invalid_input("task already completed"));
        }
        state.daily.completed_count += 1;
        let run = streak::effective(&state.streak, &today_key, state.daily.completed_count);
        let earned = streak::boosted_xp(state.tasks[index].xp, run);
        let task = &mut state.tasks[index];
        task.completed = true;
        task.earned_xp = earned;
        task.completed_on = Some(today_key.clone());
        (task.id.clone(), task.title.clone(), earned)
    } else {
        return Err(AppError::not_found("task", trimmed_id));
    };

    state.total_xp += u64::from(earned);

    let unlocked = recompute(&mut state, &today_key)?;
    json_store::save_state(path, &state)?;

    Ok(Completion {
        id,
        title,
        earned_xp: earned,
        total_xp: state.total_xp,
        unlocked,
    })
}

fn uncomplete_with_path<R: Rng + ?Sized>(
    path: &Path,
    id: &str,
    today: Date,
    rng: &mut R,
) -> Result<Completion, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    let today_key = dates::day_key(today);

    let (id, title, refunded, counted_today) = if let Some(task) = state
        .daily
        .tasks
        .iter_mut()
        .find(|task| task.id == trimmed_id)
    {
        if !task.completed {
            return Err(AppError::invalid_input("task is not completed"));
        }
        let refunded = task.earned_xp;
        task.completed = false;
        task.status = DailyTaskStatus::Pending;
        task.earned_xp = 0;
        (task.id.clone(), task.title.clone(), refunded, true)
    } else if let Some(task) = state.tasks.iter_mut().find(|task| task.id == trimmed_id) {
        if !task.completed {
            return Err(AppError::invalid_input("task is not completed"));
        }
        let refunded = task.earned_xp;
        // A completion credited on an earlier day never fed today's
        // counter; undoing it only refunds the XP.
        let counted_today = task.completed_on.as_deref() == Some(today_key.as_str());
        task.completed = false;
        task.earned_xp = 0;
        task.completed_on = None;
        (task.id.clone(), task.title.clone(), refunded, counted_today)
    } else {
        return Err(AppError::not_found("task", trimmed_id));
    };

    // Refund exactly the recorded credit, never a recomputed value.
    state.total_xp = state.total_xp.saturating_sub(u64::from(refunded));
    if counted_today {
        state.daily.completed_count = state.daily.completed_count.saturating_sub(1);
    }

    let unlocked = recompute(&mut state, &today_key)?;
    json_store::save_state(path, &state)?;

    Ok(Completion {
        id,
        title,
        earned_xp: refunded,
        total_xp: state.total_xp,
        unlocked,
    })
}

fn add_quest_with_path<R: Rng + ?Sized>(
    path: &Path,
    title: &str,
    xp: u32,
    today: Date,
    rng: &mut R,
) -> Result<Quest, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }

    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;

    let quest = Quest {
        id: new_id("quest"),
        title: trimmed.to_string(),
        xp: xp.max(1),
        enabled: true,
    };
    state.quest_pool.push(quest.clone());

    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;

    Ok(quest)
}

fn delete_quest_with_path<R: Rng + ?Sized>(
    path: &Path,
    id: &str,
    today: Date,
    rng: &mut R,
) -> Result<Quest, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;

    let index = state
        .quest_pool
        .iter()
        .position(|quest| quest.id == trimmed_id)
        .ok_or_else(|| AppError::not_found("quest", trimmed_id))?;

    // Today's drawn copy, if any, is left alone; it is a value copy and
    // will be superseded at the next rollover.
    let removed = state.quest_pool.remove(index);

    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;

    Ok(removed)
}

fn set_quest_enabled_with_path<R: Rng + ?Sized>(
    path: &Path,
    id: &str,
    enabled: bool,
    today: Date,
    rng: &mut R,
) -> Result<Quest, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;

    let quest = state
        .quest_pool
        .iter_mut()
        .find(|quest| quest.id == trimmed_id)
        .ok_or_else(|| AppError::not_found("quest", trimmed_id))?;
    quest.enabled = enabled;
    let updated = quest.clone();

    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn reroll_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<Vec<DailyTask>, AppError> {
    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;

    if state.daily.tasks.iter().any(|task| task.completed) {
        return Err(AppError::invalid_input(
            "cannot reroll after completing a task today",
        ));
    }
    if !state.quest_pool.iter().any(|quest| quest.enabled) {
        return Err(AppError::invalid_input("no enabled quests to roll"));
    }

    state.daily.tasks = roller::roll(&state.quest_pool, rng);

    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;

    Ok(state.daily.tasks.clone())
}

fn sync_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<bool, AppError> {
    let mut state = json_store::load_state(path)?;
    let rolled = rollover::ensure_current_day(&mut state, today, rng)?;
    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;
    Ok(rolled)
}

fn status_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<StatusReport, AppError> {
    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    let today_key = dates::day_key(today);
    recompute(&mut state, &today_key)?;
    json_store::save_state(path, &state)?;

    let run = streak::effective(&state.streak, &today_key, state.daily.completed_count);
    Ok(StatusReport {
        date: today_key,
        total_xp: state.total_xp,
        level: level::level_info(state.total_xp),
        streak: run,
        multiplier: streak::multiplier(run),
        daily_done: state.daily.tasks.iter().filter(|task| task.completed).count(),
        daily_total: state.daily.tasks.len(),
        open_tasks: state.tasks.iter().filter(|task| !task.completed).count(),
    })
}

fn list_tasks_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<Vec<Task>, AppError> {
    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;
    Ok(state.tasks)
}

fn list_daily_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<(String, Vec<DailyTask>), AppError> {
    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    let today_key = dates::day_key(today);
    recompute(&mut state, &today_key)?;
    json_store::save_state(path, &state)?;
    Ok((today_key, state.daily.tasks))
}

fn list_quests_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<Vec<Quest>, AppError> {
    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;
    Ok(state.quest_pool)
}

fn history_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<Vec<HistoryEntry>, AppError> {
    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    let today_key = dates::day_key(today);
    recompute(&mut state, &today_key)?;
    json_store::save_state(path, &state)?;
    Ok(journal::entries_sorted(&state, &today_key))
}

fn achievement_status_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<Vec<AchievementStatus>, AppError> {
    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    recompute(&mut state, &dates::day_key(today))?;
    json_store::save_state(path, &state)?;

    Ok(achievements::ACHIEVEMENTS
        .iter()
        .map(|def| AchievementStatus {
            def,
            unlocked_at: state
                .achievements
                .get(def.id)
                .map(|record| record.unlocked_at.clone()),
        })
        .collect())
}

fn generate_share_with_path<R: Rng + ?Sized>(
    path: &Path,
    today: Date,
    rng: &mut R,
) -> Result<ShareCard, AppError> {
    let mut state = json_store::load_state(path)?;
    rollover::ensure_current_day(&mut state, today, rng)?;
    let today_key = dates::day_key(today);

    let generated_at = dates::now_rfc3339()?;
    state.share.last_generated_at = Some(generated_at.clone());

    recompute(&mut state, &today_key)?;
    json_store::save_state(path, &state)?;

    let run = streak::effective(&state.streak, &today_key, state.daily.completed_count);
    Ok(ShareCard {
        level: level::level_info(state.total_xp).level,
        total_xp: state.total_xp,
        streak: run,
        daily_done: state.daily.tasks.iter().filter(|task| task.completed).count(),
        daily_total: state.daily.tasks.len(),
        generated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        add_quest_with_path, add_task_with_path, complete_with_path, delete_quest_with_path,
        delete_task_with_path, generate_share_with_path, history_with_path, list_daily_with_path,
        reroll_with_path, set_quest_enabled_with_path, status_with_path, sync_with_path,
        uncomplete_with_path,
    };
    use crate::model::{AppState, Quest, StreakRecord, Task};
    use crate::storage::json_store;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use time::{Date, Month};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("liferpg-{nanos}-{file_name}"))
    }

    fn day(year: i32, month: Month, day_of_month: u8) -> Date {
        Date::from_calendar_date(year, month, day_of_month).unwrap()
    }

    fn quest(id: &str, xp: u32) -> Quest {
        Quest {
            id: id.to_string(),
            title: format!("quest {id}"),
            xp,
            enabled: true,
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn add_task_rejects_blank_title() {
        let path = temp_path("blank-title.json");
        let err =
            add_task_with_path(&path, "  ", 10, day(2026, Month::February, 10), &mut rng())
                .unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn add_task_clamps_xp_and_inserts_first() {
        let path = temp_path("add-task.json");
        let today = day(2026, Month::February, 10);

        add_task_with_path(&path, "older", 10, today, &mut rng()).unwrap();
        let task = add_task_with_path(&path, "newer", 0, today, &mut rng()).unwrap();
        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(task.xp, 1);
        assert_eq!(state.tasks.len(), 2);
        assert_eq!(state.tasks[0].title, "newer");
        assert_eq!(state.tasks[1].title, "older");
    }

    #[test]
    fn complete_then_uncomplete_restores_total_xp_exactly() {
        let path = temp_path("toggle-refund.json");
        let today = day(2026, Month::February, 10);

        // Streak of 2 ending yesterday: completing today runs at 1.2x.
        let mut state = AppState::default();
        state.total_xp = 50;
        state.quest_pool = vec![quest("quest-a", 30)];
        state.streak = StreakRecord {
            count: 2,
            last_completed_date: Some("2026-02-09".to_string()),
        };
        json_store::save_state(&path, &state).unwrap();

        let done = complete_with_path(&path, "quest-a", today, &mut rng()).unwrap();
        assert_eq!(done.earned_xp, 36);
        assert_eq!(done.total_xp, 86);

        let undone = uncomplete_with_path(&path, "quest-a", today, &mut rng()).unwrap();
        assert_eq!(undone.earned_xp, 36);
        assert_eq!(undone.total_xp, 50);

        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(state.total_xp, 50);
        assert_eq!(state.daily.completed_count, 0);
        assert!(!state.daily.tasks[0].completed);
        assert_eq!(state.daily.tasks[0].earned_xp, 0);
    }

    #[test]
    fn first_completion_counts_itself_toward_the_streak() {
        let path = temp_path("self-streak.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.quest_pool = vec![quest("quest-a", 30)];
        state.streak = StreakRecord {
            count: 2,
            last_completed_date: Some("2026-02-09".to_string()),
        };
        json_store::save_state(&path, &state).unwrap();

        // Effective streak becomes 3 with this very completion, so the
        // 1.2x rate applies to it.
        let done = complete_with_path(&path, "quest-a", today, &mut rng()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(done.earned_xp, 36);
    }

    #[test]
    fn complete_rejects_unknown_and_repeated_ids() {
        let path = temp_path("complete-errors.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.quest_pool = vec![quest("quest-a", 10)];
        json_store::save_state(&path, &state).unwrap();

        let err = complete_with_path(&path, "quest-z", today, &mut rng()).unwrap_err();
        assert_eq!(err.code(), "not_found");

        complete_with_path(&path, "quest-a", today, &mut rng()).unwrap();
        let err = complete_with_path(&path, "quest-a", today, &mut rng()).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn completing_a_free_form_task_credits_and_unlocks() {
        let path = temp_path("free-form.json");
        let today = day(2026, Month::February, 10);

        let task = add_task_with_path(&path, "write report", 40, today, &mut rng()).unwrap();
        let done = complete_with_path(&path, &task.id, today, &mut rng()).unwrap();
        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(done.earned_xp, 40);
        assert_eq!(state.total_xp, 40);
        assert_eq!(state.daily.completed_count, 1);
        assert!(done.unlocked.contains(&"first_task"));
    }

    #[test]
    fn delete_completed_task_refunds_recorded_xp() {
        let path = temp_path("delete-refund.json");
        let today = day(2026, Month::February, 10);

        let task = add_task_with_path(&path, "chore", 25, today, &mut rng()).unwrap();
        complete_with_path(&path, &task.id, today, &mut rng()).unwrap();
        let removed = delete_task_with_path(&path, &task.id, today, &mut rng()).unwrap();
        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(removed.earned_xp, 25);
        assert_eq!(state.total_xp, 0);
        assert!(state.tasks.is_empty());
        assert_eq!(state.daily.completed_count, 0);
    }

    fn stale_completed_task(id: &str, earned_xp: u32, day: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            xp: earned_xp,
            completed: true,
            earned_xp,
            completed_on: Some(day.to_string()),
        }
    }

    #[test]
    fn deleting_a_stale_completion_keeps_todays_streak() {
        let path = temp_path("delete-stale.json");
        let today = day(2026, Month::February, 10);

        // Two-day streak, a task completed yesterday still in the list.
        let mut state = AppState::default();
        state.total_xp = 70;
        state.tasks = vec![stale_completed_task("task-old", 20, "2026-02-09")];
        state.quest_pool = vec![quest("quest-a", 30)];
        state.streak = StreakRecord {
            count: 2,
            last_completed_date: Some("2026-02-09".to_string()),
        };
        json_store::save_state(&path, &state).unwrap();

        complete_with_path(&path, "quest-a", today, &mut rng()).unwrap();
        let before = status_with_path(&path, today, &mut rng()).unwrap();
        assert_eq!(before.streak, 3);

        delete_task_with_path(&path, "task-old", today, &mut rng()).unwrap();
        let after = status_with_path(&path, today, &mut rng()).unwrap();
        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // Yesterday's completion never fed today's counter, so today's
        // qualification survives the cleanup.
        assert_eq!(after.streak, 3);
        assert_eq!(state.daily.completed_count, 1);
        assert_eq!(state.total_xp, 70 + 36 - 20);
    }

    #[test]
    fn undoing_a_stale_completion_refunds_without_consuming_today() {
        let path = temp_path("undo-stale.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.total_xp = 70;
        state.tasks = vec![stale_completed_task("task-old", 20, "2026-02-09")];
        state.quest_pool = vec![quest("quest-a", 30)];
        state.streak = StreakRecord {
            count: 2,
            last_completed_date: Some("2026-02-09".to_string()),
        };
        json_store::save_state(&path, &state).unwrap();

        complete_with_path(&path, "quest-a", today, &mut rng()).unwrap();
        let undone = uncomplete_with_path(&path, "task-old", today, &mut rng()).unwrap();
        assert_eq!(undone.earned_xp, 20);

        let after = status_with_path(&path, today, &mut rng()).unwrap();
        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(after.streak, 3);
        assert_eq!(state.daily.completed_count, 1);
        assert_eq!(state.tasks[0].completed_on, None);
        assert!(!state.tasks[0].completed);
    }

    #[test]
    fn free_form_completions_appear_in_todays_journal_entry() {
        let path = temp_path("free-form-journal.json");
        let today = day(2026, Month::February, 10);

        let task = add_task_with_path(&path, "write report", 40, today, &mut rng()).unwrap();
        complete_with_path(&path, &task.id, today, &mut rng()).unwrap();

        let entries = history_with_path(&path, today, &mut rng()).unwrap();
        std::fs::remove_file(&path).ok();

        let outcome = entries[0]
            .tasks
            .iter()
            .find(|entry_task| entry_task.id == task.id)
            .expect("free-form outcome in today's entry");
        assert!(outcome.completed);
        assert_eq!(outcome.earned_xp, 40);
        assert_eq!(entries[0].xp_gained, 40);
    }

    #[test]
    fn reroll_replaces_the_daily_set() {
        let path = temp_path("reroll.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.quest_pool = (0..6).map(|i| quest(&format!("quest-{i}"), 10)).collect();
        json_store::save_state(&path, &state).unwrap();

        let rolled = reroll_with_path(&path, today, &mut rng()).unwrap();
        assert_eq!(rolled.len(), 3);

        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(state.daily.tasks, rolled);
    }

    #[test]
    fn reroll_is_blocked_after_a_completion() {
        let path = temp_path("reroll-blocked.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.quest_pool = vec![quest("quest-a", 10), quest("quest-b", 10)];
        json_store::save_state(&path, &state).unwrap();

        complete_with_path(&path, "quest-a", today, &mut rng()).unwrap();
        let err = reroll_with_path(&path, today, &mut rng()).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn reroll_requires_enabled_quests() {
        let path = temp_path("reroll-empty.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.quest_pool = vec![Quest {
            enabled: false,
            ..quest("quest-a", 10)
        }];
        json_store::save_state(&path, &state).unwrap();

        let err = reroll_with_path(&path, today, &mut rng()).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn quest_pool_management() {
        let path = temp_path("quest-pool.json");
        let today = day(2026, Month::February, 10);

        let added = add_quest_with_path(&path, "stretch", 0, today, &mut rng()).unwrap();
        assert_eq!(added.xp, 1);
        assert!(added.enabled);

        let disabled =
            set_quest_enabled_with_path(&path, &added.id, false, today, &mut rng()).unwrap();
        assert!(!disabled.enabled);

        let removed = delete_quest_with_path(&path, &added.id, today, &mut rng()).unwrap();
        assert_eq!(removed.id, added.id);

        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(state.quest_pool.is_empty());
    }

    #[test]
    fn sync_rolls_the_day_and_finalizes_yesterday() {
        let path = temp_path("sync.json");

        let mut state = AppState::default();
        state.quest_pool = vec![quest("quest-a", 10)];
        state.daily.date = Some("2026-02-09".to_string());
        state.daily.tasks = crate::roller::roll(&state.quest_pool, &mut rng());
        json_store::save_state(&path, &state).unwrap();

        let rolled = sync_with_path(&path, day(2026, Month::February, 10), &mut rng()).unwrap();
        assert!(rolled);

        let again = sync_with_path(&path, day(2026, Month::February, 10), &mut rng()).unwrap();
        assert!(!again);

        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(state.daily.date.as_deref(), Some("2026-02-10"));
        let yesterday = state
            .history
            .iter()
            .find(|entry| entry.date == "2026-02-09")
            .unwrap();
        assert!(yesterday.finalized);
    }

    #[test]
    fn status_reports_effective_streak_and_multiplier() {
        let path = temp_path("status.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.total_xp = 95;
        state.quest_pool = vec![quest("quest-a", 10)];
        state.streak = StreakRecord {
            count: 2,
            last_completed_date: Some("2026-02-09".to_string()),
        };
        json_store::save_state(&path, &state).unwrap();

        let before = status_with_path(&path, today, &mut rng()).unwrap();
        assert_eq!(before.level.level, 1);
        assert_eq!(before.level.xp_to_next, 5);
        assert_eq!(before.streak, 2);
        assert_eq!(before.multiplier, 1.0);

        complete_with_path(&path, "quest-a", today, &mut rng()).unwrap();
        let after = status_with_path(&path, today, &mut rng()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(after.streak, 3);
        assert_eq!(after.multiplier, 1.2);
        assert_eq!(after.daily_done, 1);
        assert_eq!(after.daily_total, 1);
        // 95 + round(10 * 1.2) crosses the level boundary.
        assert_eq!(after.level.level, 2);
        assert_eq!(after.level.progress, 7);
    }

    #[test]
    fn history_includes_provisional_today_first() {
        let path = temp_path("history.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.quest_pool = vec![quest("quest-a", 10)];
        state.daily.date = Some("2026-02-08".to_string());
        json_store::save_state(&path, &state).unwrap();

        let entries = history_with_path(&path, today, &mut rng()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(entries[0].date, "2026-02-10");
        assert!(!entries[0].finalized);
        assert!(entries.iter().any(|entry| entry.date == "2026-02-09" && entry.finalized));
        assert!(entries.iter().any(|entry| entry.date == "2026-02-08" && entry.finalized));
    }

    #[test]
    fn list_daily_rolls_todays_tasks_on_first_touch() {
        let path = temp_path("list-daily.json");
        let today = day(2026, Month::February, 10);

        let mut state = AppState::default();
        state.quest_pool = vec![quest("quest-a", 10), quest("quest-b", 10)];
        json_store::save_state(&path, &state).unwrap();

        let (date, tasks) = list_daily_with_path(&path, today, &mut rng()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(date, "2026-02-10");
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn generate_share_records_timestamp() {
        let path = temp_path("share.json");
        let today = day(2026, Month::February, 10);

        let card = generate_share_with_path(&path, today, &mut rng()).unwrap();
        let state = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(card.level, 1);
        assert_eq!(state.share.last_generated_at, Some(card.generated_at));
    }
}
