use serde::{Deserialize, Serialize};

/// A free-form task added by the user. `earned_xp` records the XP that
/// was actually credited at completion time (multiplier applied), so
/// un-completing refunds exactly that amount. `completed_on` is the
/// day key the completion was credited under; tasks stay completed
/// across rollovers, and the date decides which day they count toward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub xp: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub earned_xp: u32,
    #[serde(default)]
    pub completed_on: Option<String>,
}
