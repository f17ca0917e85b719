pub const XP_PER_LEVEL: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: u32,
    pub progress: u32,
    pub xp_to_next: u32,
}

/// Maps cumulative XP to the current level and progress inside it.
/// `progress + xp_to_next == XP_PER_LEVEL` always holds.
pub fn level_info(total_xp: u64) -> LevelInfo {
    let level = (total_xp / XP_PER_LEVEL) as u32 + 1;
    let progress = (total_xp % XP_PER_LEVEL) as u32;
    LevelInfo {
        level,
        progress,
        xp_to_next: XP_PER_LEVEL as u32 - progress,
    }
}
