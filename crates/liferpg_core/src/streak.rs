use crate::model::StreakRecord;

/// The streak length the player is currently sitting on, including the
/// provisional +1 for a day that has a completion but has not been
/// finalized yet. The stored count only moves at day rollover.
pub fn effective(record: &StreakRecord, today_key: &str, completed_today: u32) -> u32 {
    if record.last_completed_date.as_deref() == Some(today_key) {
        return record.count;
    }
    if completed_today > 0 {
        return record.count + 1;
    }
    record.count
}

/// XP multiplier implied by a streak length.
pub fn multiplier(streak: u32) -> f64 {
    if streak >= 14 {
        2.0
    } else if streak >= 7 {
        1.5
    } else if streak >= 3 {
        1.2
    } else {
        1.0
    }
}

/// XP actually credited for completing a task at the given streak,
/// rounded to the nearest whole point. The caller snapshots the result
/// so a later un-complete refunds exactly what was credited.
pub fn boosted_xp(xp: u32, streak: u32) -> u32 {
    (f64::from(xp) * multiplier(streak)).round() as u32
}
