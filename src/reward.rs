//! Reward lines: the typed components of a quest's virtual reward.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// A quest's virtual reward, as handed to registration: reward kind to
/// amount. Kinds are opaque strings; `xp` and `gold` map onto first-class
/// user counters, everything else onto the generic counter map.
pub type VirtualReward = BTreeMap<String, i64>;

/// Unique identifier for a reward line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RewardLineId(Uuid);

impl RewardLineId {
    /// Create a new unique reward line ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RewardLineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RewardLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One typed, amount-bearing component of a quest's virtual reward.
///
/// Created atomically with the owning quest, attached by a `pays` edge,
/// immutable thereafter, and never shared between quests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardLine {
    /// Unique identifier.
    pub id: RewardLineId,
    /// Reward kind key, e.g. `xp` or `gold`.
    pub kind: String,
    /// Amount added to the completer's counter at payout.
    pub amount: i64,
}

impl RewardLine {
    /// Create a new reward line.
    pub fn new(kind: impl Into<String>, amount: i64) -> Self {
        Self {
            id: RewardLineId::new(),
            kind: kind.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_line_creation() {
        let line = RewardLine::new("xp", 100);
        assert_eq!(line.kind, "xp");
        assert_eq!(line.amount, 100);
    }

    #[test]
    fn test_reward_line_ids_are_unique() {
        let a = RewardLine::new("gold", 5);
        let b = RewardLine::new("gold", 5);
        assert_ne!(a.id, b.id);
    }
}
