//! The progression service: ledger-backed reward application and claim
//! detection.
//!
//! Delta computation lives in the event constructors in `codex-core`; the
//! store applies each event atomically. This module carries the pieces the
//! HTTP layer shares: the response aggregates returned by every mutation,
//! and the claim-detection scan over the event ledger.

use serde::Serialize;

use codex_core::{pack_claim_reference, ProgressionState, UserId, Wallet};
use codex_store::{RocksStore, Store};

/// How many of the most recent events the claim scan inspects.
///
/// A claim older than this window is not detected. The bound is carried
/// over from the original behavior; widening it is a data-migration
/// question, not a code change.
pub const CLAIM_SCAN_WINDOW: usize = 200;

/// Prefix shared by all league claim reference ids.
const CLAIM_REFERENCE_PREFIX: &str = "codex-pack:";

/// Progression aggregate returned by mutation and read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionDto {
    /// Cumulative experience total.
    pub xp_total: i64,
    /// Current level.
    pub level: u32,
    /// Cumulative XP at which the current level begins.
    pub level_floor_xp: i64,
    /// Cumulative XP at which the next level begins.
    pub next_level_xp: i64,
}

impl From<ProgressionState> for ProgressionDto {
    fn from(state: ProgressionState) -> Self {
        Self {
            xp_total: state.xp_total,
            level: state.level,
            level_floor_xp: state.level_floor_xp,
            next_level_xp: state.next_level_xp,
        }
    }
}

/// Wallet balances returned by mutation and read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct WalletDto {
    /// Coin balance.
    pub coins: i64,
    /// Diamond balance.
    pub diamonds: i64,
}

impl From<Wallet> for WalletDto {
    fn from(wallet: Wallet) -> Self {
        Self {
            coins: wallet.coins,
            diamonds: wallet.diamonds,
        }
    }
}

/// Response envelope shared by every progression mutation.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    /// Whether the mutation was applied.
    pub success: bool,
    /// Id of the ledger row the mutation appended.
    pub event_id: String,
    /// Updated progression aggregate.
    pub progression: ProgressionDto,
    /// Updated wallet.
    pub wallet: WalletDto,
}

impl MutationResponse {
    /// Build the envelope for an applied event.
    #[must_use]
    pub fn applied(event_id: String, progression: ProgressionState, wallet: Wallet) -> Self {
        Self {
            success: true,
            event_id,
            progression: progression.into(),
            wallet: wallet.into(),
        }
    }
}

/// Check whether a league pack was already claimed, by scanning the most
/// recent ledger rows for a matching claim reference id.
///
/// On storage error the check degrades to "not claimed": the read path
/// never blocks the user, and the mutation path re-runs the same scan
/// before granting.
#[must_use]
pub fn is_claimed(store: &RocksStore, user_id: &UserId, league: &str) -> bool {
    let wanted = pack_claim_reference(league);

    match store.list_events_by_user(user_id, CLAIM_SCAN_WINDOW, 0) {
        Ok(events) => events
            .iter()
            .filter(|event| event.source.is_claim())
            .filter_map(|event| event.reference_id.as_deref())
            .any(|reference| reference.eq_ignore_ascii_case(&wanted)),
        Err(e) => {
            tracing::warn!(
                user_id = %user_id,
                league = %league,
                error = %e,
                "Claim scan failed, treating league as unclaimed"
            );
            false
        }
    }
}

/// List the leagues whose packs the user has claimed, newest first, within
/// the claim scan window. Empty on storage error.
#[must_use]
pub fn claimed_leagues(store: &RocksStore, user_id: &UserId) -> Vec<String> {
    let events = match store.list_events_by_user(user_id, CLAIM_SCAN_WINDOW, 0) {
        Ok(events) => events,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Claimed-league scan failed");
            return Vec::new();
        }
    };

    let mut leagues: Vec<String> = Vec::new();
    for event in events.iter().filter(|event| event.source.is_claim()) {
        let Some(reference) = event.reference_id.as_deref() else {
            continue;
        };
        let Some(league) = reference
            .to_ascii_lowercase()
            .strip_prefix(CLAIM_REFERENCE_PREFIX)
            .map(ToString::to_string)
        else {
            continue;
        };
        if !leagues.contains(&league) {
            leagues.push(league);
        }
    }

    leagues
}
