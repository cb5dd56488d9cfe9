//! Per-round ranking aggregation.
//!
//! Aggregates are recomputed from match records on every read; nothing here
//! is cached, so a corrected match is reflected by the next query.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{EntrantId, MatchRecord, PlayerId, RankingEntry, SeatResult};

/// Running totals for one scoring unit before ranks are assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub total_pt_score: f64,
    pub total_raw_score: i64,
    pub total_penalty: i64,
    pub match_count: u32,
    pub place_counts: [u32; 4],
}

impl Tally {
    pub fn add_seat(&mut self, seat: &SeatResult) {
        self.total_pt_score += seat.pt_score;
        self.total_raw_score += seat.raw_score as i64;
        self.total_penalty += seat.penalty as i64;
        self.match_count += 1;
        if (1..=4).contains(&seat.rank) {
            self.place_counts[(seat.rank - 1) as usize] += 1;
        }
    }

    pub fn merge(&mut self, other: &Tally) {
        self.total_pt_score += other.total_pt_score;
        self.total_raw_score += other.total_raw_score;
        self.total_penalty += other.total_penalty;
        self.match_count += other.match_count;
        for (mine, theirs) in self.place_counts.iter_mut().zip(other.place_counts.iter()) {
            *mine += theirs;
        }
    }

    /// Finish the aggregate for one entrant. `None` when the entrant played
    /// no match: zero-match entrants are excluded from ranking output, so the
    /// average position is never a division by zero.
    pub fn into_entry(self, entrant: EntrantId) -> Option<RankingEntry> {
        if self.match_count == 0 {
            return None;
        }
        let weighted: u64 = self
            .place_counts
            .iter()
            .enumerate()
            .map(|(i, &count)| (i as u64 + 1) * count as u64)
            .sum();
        Some(RankingEntry {
            entrant,
            total_pt_score: self.total_pt_score,
            total_raw_score: self.total_raw_score,
            total_penalty: self.total_penalty,
            match_count: self.match_count,
            place_counts: self.place_counts,
            average_position: weighted as f64 / self.match_count as f64,
            rank: 0,
        })
    }
}

/// Accumulate per-player tallies over a round's match records.
pub fn player_tallies<'a>(
    records: impl IntoIterator<Item = &'a MatchRecord>,
) -> HashMap<PlayerId, Tally> {
    let mut tallies: HashMap<PlayerId, Tally> = HashMap::new();
    for record in records {
        for seat in &record.seats {
            tallies.entry(seat.player.clone()).or_default().add_seat(seat);
        }
    }
    tallies
}

/// Fold one entrant's constituent players into a single tally.
pub fn unit_tally<'a>(
    tallies: &HashMap<PlayerId, Tally>,
    players: impl IntoIterator<Item = &'a PlayerId>,
) -> Tally {
    let mut combined = Tally::default();
    for player in players {
        if let Some(tally) = tallies.get(player) {
            combined.merge(tally);
        }
    }
    combined
}

/// Canonical ranking order: total PT score descending, then average position
/// ascending (the lower average finish wins the tie).
pub fn ranking_order(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.total_pt_score
        .partial_cmp(&a.total_pt_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            a.average_position
                .partial_cmp(&b.average_position)
                .unwrap_or(Ordering::Equal)
        })
}

/// Sort entries canonically and assign 1-based ranks.
pub fn sort_and_rank(mut entries: Vec<RankingEntry>) -> Vec<RankingEntry> {
    entries.sort_by(ranking_order);
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = (position + 1) as u32;
    }
    entries
}

/// Rank a round for a set of entrant units, each contributing the tallies of
/// its constituent players. Serves both individual competitions (one player
/// per unit) and team competitions (all active members per unit).
pub fn rank_units<'a>(
    records: impl IntoIterator<Item = &'a MatchRecord>,
    units: impl IntoIterator<Item = (EntrantId, Vec<PlayerId>)>,
) -> Vec<RankingEntry> {
    let tallies = player_tallies(records);
    let entries = units
        .into_iter()
        .filter_map(|(entrant, players)| unit_tally(&tallies, players.iter()).into_entry(entrant))
        .collect();
    sort_and_rank(entries)
}

/// Rank every player appearing in the given records.
pub fn rank_players<'a>(
    records: impl IntoIterator<Item = &'a MatchRecord>,
) -> Vec<RankingEntry> {
    let entries = player_tallies(records)
        .into_iter()
        .filter_map(|(player, tally)| tally.into_entry(EntrantId::Player(player)))
        .collect();
    sort_and_rank(entries)
}
