//! PT-score computation and ranking aggregation.

pub mod pt;
pub mod ranking;

pub use pt::{apply_to_record, compute_outcomes, validate_score_total, SeatOutcome, SeatScore};
pub use ranking::{player_tallies, rank_players, rank_units, sort_and_rank, Tally};
