//! Per-round entrant lifecycle rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entrant::{CompetitionId, EntrantId};

/// Lifecycle of an entrant within one round.
///
/// `Active` is the only initial state. All three other states are reachable
/// directly from it and none leads back; `Advanced` and `Eliminated` are
/// informational terminal markers, `Completed` means the round was closed
/// while the entrant was still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Active,
    Advanced,
    Eliminated,
    Completed,
}

/// One entrant's standing in one round of one competition.
///
/// At most one row exists per (entrant, competition, round). `is_eliminated`
/// mirrors `state == Eliminated` and is only ever set together with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStatus {
    pub entrant: EntrantId,
    pub competition_id: CompetitionId,
    pub round_number: u32,
    pub initial_score: i32,
    pub current_score: i32,
    pub state: RoundState,
    pub is_eliminated: bool,
    pub elimination_time: Option<DateTime<Utc>>,
}

impl RoundStatus {
    /// Fresh `Active` row.
    pub fn new(
        entrant: EntrantId,
        competition_id: CompetitionId,
        round_number: u32,
        initial_score: i32,
    ) -> Self {
        Self {
            entrant,
            competition_id,
            round_number,
            initial_score,
            current_score: initial_score,
            state: RoundState::Active,
            is_eliminated: false,
            elimination_time: None,
        }
    }
}
