//! Typed request payloads for engine operations.
//!
//! The enclosing request layer deserializes into these once at the boundary;
//! the core never sees loose key-value payloads.

use serde::{Deserialize, Serialize};

use crate::models::{CompetitionId, EntrantId, MatchId, PlayerId};

/// Seat assignment within a match-creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub player: PlayerId,
    pub raw_score: i32,
    #[serde(default)]
    pub penalty: i32,
}

/// Request to record one physical match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    pub competition_id: CompetitionId,
    pub round_number: u32,
    pub match_number: u32,
    /// Seats in East, South, West, North order.
    pub seats: [SeatAssignment; 4],
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Request to correct a recorded match's scores.
///
/// Raw scores and penalties are replaced together and the PT scores are
/// recomputed from them; there is no way to touch a PT score on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMatchRequest {
    pub match_id: MatchId,
    /// New raw scores in seat order.
    pub raw_scores: [i32; 4],
    /// New penalties in seat order.
    pub penalties: [i32; 4],
}

/// Request to advance entrants into a new round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub competition_id: CompetitionId,
    pub entrants: Vec<EntrantId>,
    pub target_round: u32,
    #[serde(default)]
    pub initial_score: i32,
}
