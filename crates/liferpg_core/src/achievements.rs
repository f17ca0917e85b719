use crate::level;
use crate::model::{AchievementRecord, AppState};
use crate::streak;

#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_task",
        name: "First Steps",
        description: "Complete your first task",
    },
    AchievementDef {
        id: "streak_3",
        name: "On a Roll",
        description: "Reach a 3-day streak",
    },
    AchievementDef {
        id: "streak_7",
        name: "Week Warrior",
        description: "Reach a 7-day streak",
    },
    AchievementDef {
        id: "level_5",
        name: "Seasoned Adventurer",
        description: "Reach level 5",
    },
    AchievementDef {
        id: "level_10",
        name: "Living Legend",
        description: "Reach level 10",
    },
];

pub fn get(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|def| def.id == id)
}

/// Runs the threshold checks and stamps any newly crossed ones.
/// Idempotent and monotonic: an unlocked achievement keeps its original
/// timestamp and is never revoked. Returns the ids unlocked by this
/// pass so the caller can announce them.
pub fn evaluate(state: &mut AppState, today_key: &str, now: &str) -> Vec<&'static str> {
    let level = level::level_info(state.total_xp).level;
    let streak = streak::effective(&state.streak, today_key, state.daily.completed_count);
    let any_completion = state.any_completion();

    let mut unlocked = Vec::new();
    for def in ACHIEVEMENTS {
        let earned = match def.id {
            "first_task" => any_completion,
            "streak_3" => streak >= 3,
            "streak_7" => streak >= 7,
            "level_5" => level >= 5,
            "level_10" => level >= 10,
            _ => false,
        };

        if earned && !state.achievements.contains_key(def.id) {
            state.achievements.insert(
                def.id.to_string(),
                AchievementRecord {
                    unlocked_at: now.to_string(),
                },
            );
            unlocked.push(def.id);
        }
    }

    unlocked
}
