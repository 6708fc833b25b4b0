//! Progression state and the XP curve.
//!
//! Levels are always recomputed from the cumulative XP total, never
//! incremented independently, so the state cannot drift from the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

// ============================================================================
// Constants
// ============================================================================

/// XP step used by the level curve. The cumulative XP required to reach
/// level `n` is `XP_CURVE_STEP / 2 * n * (n - 1)`.
pub const XP_CURVE_STEP: i64 = 100;

/// XP granted for a battle victory.
pub const BATTLE_VICTORY_XP: i64 = 50;

/// Coins granted for a battle victory.
pub const BATTLE_VICTORY_COINS: i64 = 25;

/// XP granted per awarded card.
pub const CARD_AWARD_XP: i64 = 10;

/// XP granted for claiming a Codex Trials league pack.
pub const PACK_CLAIM_XP: i64 = 100;

/// Coins granted for claiming a Codex Trials league pack.
pub const PACK_CLAIM_COINS: i64 = 50;

/// Diamonds granted for claiming a Codex Trials league pack.
pub const PACK_CLAIM_DIAMONDS: i64 = 5;

/// Cumulative XP required to reach a level.
///
/// Level 1 is the floor at 0 XP; level 2 requires 100 XP, level 3 requires
/// 300, level 4 requires 600, growing by one `XP_CURVE_STEP` per level.
#[must_use]
pub fn xp_threshold(level: u32) -> i64 {
    let n = i64::from(level);
    XP_CURVE_STEP / 2 * n * (n - 1)
}

/// Derive the level for a cumulative XP total.
#[must_use]
pub fn level_for_xp(xp_total: i64) -> u32 {
    let mut level = 1;
    while xp_total >= xp_threshold(level + 1) {
        level += 1;
    }
    level
}

/// Per-user progression aggregate.
///
/// Holds the cumulative experience total, the derived level, and the XP
/// thresholds bounding the current level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionState {
    /// The owning user.
    pub user_id: UserId,

    /// Cumulative experience total.
    pub xp_total: i64,

    /// Current level derived from `xp_total`.
    pub level: u32,

    /// Cumulative XP at which the current level begins.
    pub level_floor_xp: i64,

    /// Cumulative XP at which the next level begins.
    pub next_level_xp: i64,

    /// When the state was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ProgressionState {
    /// Create a fresh level-1 state with zero XP.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self::with_total(user_id, 0)
    }

    /// Build a state from a cumulative XP total, deriving level and
    /// thresholds from the curve.
    #[must_use]
    pub fn with_total(user_id: UserId, xp_total: i64) -> Self {
        let level = level_for_xp(xp_total);
        Self {
            user_id,
            xp_total,
            level,
            level_floor_xp: xp_threshold(level),
            next_level_xp: xp_threshold(level + 1),
            updated_at: Utc::now(),
        }
    }

    /// Apply an XP delta and recompute the derived fields from the new total.
    pub fn apply_xp(&mut self, xp_delta: i64) {
        self.xp_total += xp_delta;
        self.level = level_for_xp(self.xp_total);
        self.level_floor_xp = xp_threshold(self.level);
        self.next_level_xp = xp_threshold(self.level + 1);
        self.updated_at = Utc::now();
    }

    /// XP still needed to reach the next level.
    #[must_use]
    pub fn xp_to_next_level(&self) -> i64 {
        self.next_level_xp - self.xp_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_thresholds() {
        assert_eq!(xp_threshold(1), 0);
        assert_eq!(xp_threshold(2), 100);
        assert_eq!(xp_threshold(3), 300);
        assert_eq!(xp_threshold(4), 600);
        assert_eq!(xp_threshold(5), 1000);
    }

    #[test]
    fn level_derivation() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(299), 2);
        assert_eq!(level_for_xp(300), 3);
        assert_eq!(level_for_xp(1000), 5);
    }

    #[test]
    fn new_state_is_level_one() {
        let state = ProgressionState::new(UserId::generate());
        assert_eq!(state.level, 1);
        assert_eq!(state.level_floor_xp, 0);
        assert_eq!(state.next_level_xp, 100);
    }

    #[test]
    fn apply_xp_recomputes_level() {
        let mut state = ProgressionState::new(UserId::generate());
        state.apply_xp(250);
        assert_eq!(state.xp_total, 250);
        assert_eq!(state.level, 2);
        assert_eq!(state.level_floor_xp, 100);
        assert_eq!(state.next_level_xp, 300);
        assert_eq!(state.xp_to_next_level(), 50);
    }

    #[test]
    fn repeated_victories_level_up() {
        let mut state = ProgressionState::new(UserId::generate());
        for _ in 0..6 {
            state.apply_xp(BATTLE_VICTORY_XP);
        }
        assert_eq!(state.xp_total, 300);
        assert_eq!(state.level, 3);
    }
}
