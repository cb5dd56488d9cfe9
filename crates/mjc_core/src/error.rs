//! Engine error taxonomy.
//!
//! Every variant is a caller-input error detected before any write; no
//! operation retries or silently recovers, and a failure aborts the whole
//! operation including any batch it was part of.

use thiserror::Error;

use crate::models::{CompetitionId, EntrantId, PlayerId, Seat};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid score sum: total was {total}, expected 100000")]
    InvalidScoreSum { total: i64 },

    #[error("match number {match_number} already used in competition {competition_id} round {round_number}")]
    DuplicateMatchNumber {
        competition_id: CompetitionId,
        round_number: u32,
        match_number: u32,
    },

    #[error("round status already exists for {entrant} in competition {competition_id} round {round_number}")]
    DuplicateRoundStatus {
        entrant: EntrantId,
        competition_id: CompetitionId,
        round_number: u32,
    },

    #[error("invalid target round {target_round}: must exceed 1 and the current maximum round {current_max_round}")]
    InvalidTargetRound {
        target_round: u32,
        current_max_round: u32,
    },

    #[error("{entrant} is not registered for competition {competition_id}")]
    NotRegistered {
        entrant: EntrantId,
        competition_id: CompetitionId,
    },

    #[error("{seat} seat player {player} is not eligible for round {round_number} of competition {competition_id}")]
    SeatEntrantNotEligible {
        seat: Seat,
        player: PlayerId,
        competition_id: CompetitionId,
        round_number: u32,
    },

    #[error("{entrant} is already eliminated from round {round_number} of competition {competition_id}")]
    AlreadyEliminated {
        entrant: EntrantId,
        competition_id: CompetitionId,
        round_number: u32,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
