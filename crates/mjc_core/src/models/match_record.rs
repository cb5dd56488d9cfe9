//! Four-seat match records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entrant::{CompetitionId, PlayerId};

/// Required total of the four raw seat scores in one match.
pub const SCORE_TOTAL: i64 = 100_000;

/// Unique identifier of a match record.
pub type MatchId = Uuid;

/// One of the four fixed positions in a match.
///
/// Declaration order doubles as the rank tie-break precedence: when two seats
/// hold equal raw scores, the earlier seat takes the better rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    East,
    South,
    West,
    North,
}

impl Seat {
    pub const ALL: [Seat; 4] = [Seat::East, Seat::South, Seat::West, Seat::North];

    /// Position in seat order, 0-based.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
            Seat::North => "North",
        };
        write!(f, "{}", name)
    }
}

/// Result of one seat in one match.
///
/// `rank` and `pt_score` are derived by the PT calculator whenever the raw
/// score or penalty changes; callers never set them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatResult {
    pub seat: Seat,
    pub player: PlayerId,
    pub raw_score: i32,
    pub penalty: i32,
    pub pt_score: f64,
    pub rank: u8,
}

/// An immutable-once-created four-seat match result.
///
/// The seat sub-records are owned by the match and not separately
/// addressable. `match_number` is unique within (competition, round).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub competition_id: CompetitionId,
    pub round_number: u32,
    pub match_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    /// Seats in East, South, West, North order.
    pub seats: [SeatResult; 4],
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn seat(&self, seat: Seat) -> &SeatResult {
        &self.seats[seat.index()]
    }

    pub fn raw_score_total(&self) -> i64 {
        self.seats.iter().map(|s| s.raw_score as i64).sum()
    }
}
