//! # mjc_core - Competition Scoring & Advancement Engine
//!
//! Converts raw four-seat match scores into normalized tournament points
//! (PT scores), aggregates them into per-round rankings with deterministic
//! tie-breaking, and drives the round-advancement state machine that moves
//! players and teams through elimination rounds.
//!
//! ## Structure
//! - Per-match PT computation and round ranking live in [`scoring`]
//! - The round-status state machine and batch advancement live in [`rounds`]
//! - Read-side snapshots live in [`status`]
//! - [`api::CompetitionEngine`] ties the stores together behind typed
//!   request structs

pub mod api;
pub mod error;
pub mod models;
pub mod registry;
pub mod rounds;
pub mod scoring;
pub mod state;
pub mod status;
pub mod store;

pub use api::{
    AdvanceRequest, CompetitionEngine, CreateMatchRequest, SeatAssignment, UpdateMatchRequest,
};
pub use error::{EngineError, Result};
pub use models::{
    CompetitionId, CompetitionRule, EntrantId, MatchId, MatchRecord, PlayerId, RankingEntry,
    RoundState, RoundStatus, Seat, TeamId, SCORE_TOTAL,
};
pub use registry::CompetitionKind;
pub use state::EngineState;
pub use status::CompetitionStatus;
