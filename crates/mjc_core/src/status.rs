//! Read-side status aggregation.
//!
//! Assembles a point-in-time snapshot of one round from round-status rows,
//! match records, and team membership. Never mutates state; every snapshot is
//! recomputed from the stores on demand.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{CompetitionId, EntrantId, PlayerId, RankingEntry, RoundStatus};
use crate::registry::MembershipLookup;
use crate::scoring::ranking::{player_tallies, unit_tally};
use crate::store::{MatchStore, RoundStatusStore};

/// One member's contribution within a team standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberContribution {
    pub player: PlayerId,
    /// The member's PT-score sum for the round.
    pub pt_score: f64,
    /// Appearance and placement statistics; `None` when the member has not
    /// played this round.
    pub stats: Option<RankingEntry>,
}

/// One entrant's row in a round snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrantStanding {
    pub status: RoundStatus,
    /// PT-score sum for the round; for a team, the sum over its active
    /// members' sums.
    pub current_round_score: f64,
    /// Round statistics; `None` when no constituent player has a match yet.
    pub stats: Option<RankingEntry>,
    /// Per-member breakdown; empty for individual entrants.
    pub members: Vec<MemberContribution>,
}

/// Point-in-time view of one round of one competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionStatus {
    pub competition_id: CompetitionId,
    pub round_number: u32,
    pub entrants: Vec<EntrantStanding>,
}

/// Assemble the snapshot for one round.
///
/// Entries are ordered by `current_round_score` descending with average
/// position ascending as the tie-break, the same canonical order ranking
/// uses; entrants without matches sort after scored ties.
pub fn competition_status(
    matches: &MatchStore,
    statuses: &RoundStatusStore,
    membership: &impl MembershipLookup,
    competition_id: &CompetitionId,
    round_number: u32,
) -> CompetitionStatus {
    let records = matches.for_round(competition_id, round_number);
    let tallies = player_tallies(records.into_iter());

    let mut entrants: Vec<EntrantStanding> = statuses
        .for_round(competition_id, round_number)
        .into_iter()
        .map(|row| {
            let players = membership.constituent_players(competition_id, &row.entrant);
            let combined = unit_tally(&tallies, players.iter());
            let current_round_score = combined.total_pt_score;
            let stats = combined.into_entry(row.entrant.clone());

            let members = if row.entrant.is_team() {
                players
                    .into_iter()
                    .map(|player| {
                        let tally = tallies.get(&player).cloned().unwrap_or_default();
                        MemberContribution {
                            pt_score: tally.total_pt_score,
                            stats: tally.into_entry(EntrantId::Player(player.clone())),
                            player,
                        }
                    })
                    .collect()
            } else {
                Vec::new()
            };

            EntrantStanding {
                status: row.clone(),
                current_round_score,
                stats,
                members,
            }
        })
        .collect();

    entrants.sort_by(|a, b| {
        b.current_round_score
            .partial_cmp(&a.current_round_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let pos = |e: &EntrantStanding| {
                    e.stats
                        .as_ref()
                        .map(|s| s.average_position)
                        .unwrap_or(f64::INFINITY)
                };
                pos(a).partial_cmp(&pos(b)).unwrap_or(Ordering::Equal)
            })
    });

    CompetitionStatus {
        competition_id: competition_id.clone(),
        round_number,
        entrants,
    }
}

/// Highest round number the competition has opened, across player and team
/// rows; 0 when no round exists yet (competition not started).
pub fn current_max_round(statuses: &RoundStatusStore, competition_id: &CompetitionId) -> u32 {
    statuses.max_round(competition_id)
}
