//! Core data model: rules, entrants, match records, round statuses, and
//! ranking aggregates.

pub mod entrant;
pub mod match_record;
pub mod ranking;
pub mod round_status;
pub mod rule;

pub use entrant::{CompetitionId, EntrantId, PlayerId, TeamId};
pub use match_record::{MatchId, MatchRecord, Seat, SeatResult, SCORE_TOTAL};
pub use ranking::RankingEntry;
pub use round_status::{RoundState, RoundStatus};
pub use rule::CompetitionRule;
