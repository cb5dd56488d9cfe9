//! Scoring-rule parameters.

use serde::{Deserialize, Serialize};

/// Scoring parameters attached to a competition.
///
/// `origin_points` is the neutral raw score a seat is measured against; the
/// place bonuses are added per rank. Immutable once a live competition
/// references it (editing policy lives outside the engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionRule {
    pub origin_points: i32,
    pub first_place_points: i32,
    pub second_place_points: i32,
    pub third_place_points: i32,
    pub fourth_place_points: i32,
}

impl CompetitionRule {
    pub fn new(origin: i32, first: i32, second: i32, third: i32, fourth: i32) -> Self {
        Self {
            origin_points: origin,
            first_place_points: first,
            second_place_points: second,
            third_place_points: third,
            fourth_place_points: fourth,
        }
    }

    /// Place bonus for a 1-based rank. Ranks outside 1..=4 never occur in a
    /// four-seat match and contribute nothing.
    pub fn rank_bonus(&self, rank: u8) -> i32 {
        match rank {
            1 => self.first_place_points,
            2 => self.second_place_points,
            3 => self.third_place_points,
            4 => self.fourth_place_points,
            _ => 0,
        }
    }
}
