//! Ephemeral ranking aggregates.

use serde::{Deserialize, Serialize};

use super::entrant::EntrantId;

/// Aggregated standing of one entrant across a round's matches.
///
/// Built fresh from match records on every query and discarded after the
/// response; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub entrant: EntrantId,
    pub total_pt_score: f64,
    pub total_raw_score: i64,
    pub total_penalty: i64,
    pub match_count: u32,
    /// How often the entrant finished 1st..4th, indexed by place - 1.
    pub place_counts: [u32; 4],
    pub average_position: f64,
    /// 1-based position after the canonical sort; 0 when the entry was
    /// computed standalone and never ranked against a field.
    pub rank: u32,
}
