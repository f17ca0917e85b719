use crate::model::{DailyTask, Quest};
use rand::Rng;

/// At most this many quests are drawn into a day.
pub const DAILY_QUEST_LIMIT: usize = 3;

/// Draws today's task set: a uniform sample without replacement from
/// the enabled quests, `min(3, enabled)` entries, all pending. The RNG
/// is injected so tests can seed it.
pub fn roll<R: Rng + ?Sized>(pool: &[Quest], rng: &mut R) -> Vec<DailyTask> {
    let mut enabled: Vec<&Quest> = pool.iter().filter(|quest| quest.enabled).collect();

    // Fisher-Yates; the prefix is then an unbiased sample.
    for i in (1..enabled.len()).rev() {
        let j = rng.random_range(0..=i);
        enabled.swap(i, j);
    }

    enabled
        .iter()
        .take(DAILY_QUEST_LIMIT)
        .map(|quest| DailyTask::from_quest(quest))
        .collect()
}
