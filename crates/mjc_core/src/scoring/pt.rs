//! Per-match PT-score computation.
//!
//! Pure CPU work: validates the score total, ranks the four seats, and
//! derives each seat's PT score from the competition rule. Re-running the
//! computation on unchanged inputs yields identical outputs.

use crate::error::{EngineError, Result};
use crate::models::{CompetitionRule, MatchRecord, SCORE_TOTAL};

/// Raw per-seat input, in East/South/West/North order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatScore {
    pub raw_score: i32,
    pub penalty: i32,
}

/// Derived rank and PT score for one seat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatOutcome {
    pub rank: u8,
    pub pt_score: f64,
}

/// Reject a score set whose total is not exactly [`SCORE_TOTAL`].
pub fn validate_score_total(raw_scores: &[i32; 4]) -> Result<()> {
    let total: i64 = raw_scores.iter().map(|&s| s as i64).sum();
    if total != SCORE_TOTAL {
        return Err(EngineError::InvalidScoreSum { total });
    }
    Ok(())
}

/// Rank four seats and compute their PT scores.
///
/// Seats are ranked by raw score descending; equal scores fall back to seat
/// precedence, East before South before West before North. Each seat's PT
/// score is `(raw - origin) / 1000.0 + rank bonus + penalty`.
///
/// PT scores are not guaranteed to sum to zero: that only holds for rules
/// whose place bonuses are authored to cancel out.
pub fn compute_outcomes(
    rule: &CompetitionRule,
    scores: &[SeatScore; 4],
) -> Result<[SeatOutcome; 4]> {
    let raw: [i32; 4] = [
        scores[0].raw_score,
        scores[1].raw_score,
        scores[2].raw_score,
        scores[3].raw_score,
    ];
    validate_score_total(&raw)?;

    // Seat indices, best seat first. Input order is seat order, so the
    // ascending-index tie-break is exactly the seat precedence.
    let mut order: [usize; 4] = [0, 1, 2, 3];
    order.sort_by(|&a, &b| raw[b].cmp(&raw[a]).then(a.cmp(&b)));

    let mut outcomes = [SeatOutcome { rank: 0, pt_score: 0.0 }; 4];
    for (place, &idx) in order.iter().enumerate() {
        let rank = (place + 1) as u8;
        let base = (raw[idx] - rule.origin_points) as f64 / 1000.0;
        let pt_score = base + rule.rank_bonus(rank) as f64 + scores[idx].penalty as f64;
        outcomes[idx] = SeatOutcome { rank, pt_score };
    }
    Ok(outcomes)
}

/// Recompute the derived rank/PT fields of a record in place.
///
/// The only writer of `rank` and `pt_score`; raw scores and penalties are
/// read, never touched.
pub fn apply_to_record(rule: &CompetitionRule, record: &mut MatchRecord) -> Result<()> {
    let scores: [SeatScore; 4] = std::array::from_fn(|i| SeatScore {
        raw_score: record.seats[i].raw_score,
        penalty: record.seats[i].penalty,
    });
    let outcomes = compute_outcomes(rule, &scores)?;
    for (seat, outcome) in record.seats.iter_mut().zip(outcomes.iter()) {
        seat.rank = outcome.rank;
        seat.pt_score = outcome.pt_score;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_rule() -> CompetitionRule {
        CompetitionRule::new(25_000, 20, 10, -10, -20)
    }

    fn seats(raw: [i32; 4]) -> [SeatScore; 4] {
        std::array::from_fn(|i| SeatScore { raw_score: raw[i], penalty: 0 })
    }

    #[test]
    fn test_distinct_scores_rank_and_pt() {
        // East 42000 / South 28000 / West 18000 / North 12000
        let outcomes =
            compute_outcomes(&standard_rule(), &seats([42_000, 28_000, 18_000, 12_000])).unwrap();

        assert_eq!(outcomes.map(|o| o.rank), [1, 2, 3, 4]);
        assert_eq!(outcomes[0].pt_score, 37.0);
        assert_eq!(outcomes[1].pt_score, 13.0);
        assert_eq!(outcomes[2].pt_score, -17.0);
        assert_eq!(outcomes[3].pt_score, -33.0);
    }

    #[test]
    fn test_full_tie_uses_seat_precedence() {
        // All seats on the origin score: ranks follow seat order and the PT
        // scores reduce to the bare place bonuses.
        let outcomes =
            compute_outcomes(&standard_rule(), &seats([25_000, 25_000, 25_000, 25_000])).unwrap();

        assert_eq!(outcomes.map(|o| o.rank), [1, 2, 3, 4]);
        assert_eq!(outcomes.map(|o| o.pt_score), [20.0, 10.0, -10.0, -20.0]);
    }

    #[test]
    fn test_partial_tie_earlier_seat_wins() {
        // South and North tie on 30000; South sits earlier and outranks North.
        let outcomes =
            compute_outcomes(&standard_rule(), &seats([35_000, 30_000, 5_000, 30_000])).unwrap();

        assert_eq!(outcomes[0].rank, 1);
        assert_eq!(outcomes[1].rank, 2);
        assert_eq!(outcomes[3].rank, 3);
        assert_eq!(outcomes[2].rank, 4);
    }

    #[test]
    fn test_penalty_feeds_pt_score() {
        let mut scores = seats([42_000, 28_000, 18_000, 12_000]);
        scores[0].penalty = -30;
        let outcomes = compute_outcomes(&standard_rule(), &scores).unwrap();

        // Penalties shift PT scores, never ranks.
        assert_eq!(outcomes[0].rank, 1);
        assert_eq!(outcomes[0].pt_score, 7.0);
    }

    #[test]
    fn test_invalid_total_rejected() {
        let err = compute_outcomes(&standard_rule(), &seats([42_000, 28_000, 18_000, 11_500]))
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidScoreSum { total: 99_500 });
    }

    #[test]
    fn test_computation_is_idempotent() {
        let scores = seats([42_000, 28_000, 18_000, 12_000]);
        let first = compute_outcomes(&standard_rule(), &scores).unwrap();
        let second = compute_outcomes(&standard_rule(), &scores).unwrap();
        assert_eq!(first, second);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Three free scores; the fourth is forced so the total holds.
        fn valid_scores() -> impl Strategy<Value = [i32; 4]> {
            (0..=100_000i32, 0..=100_000i32, 0..=100_000i32)
                .prop_filter("scores must leave room for the fourth seat", |(a, b, c)| {
                    (*a as i64 + *b as i64 + *c as i64) <= 100_000
                })
                .prop_map(|(a, b, c)| [a, b, c, 100_000 - a - b - c])
        }

        proptest! {
            #[test]
            fn ranks_are_a_permutation(raw in valid_scores()) {
                let outcomes = compute_outcomes(&standard_rule(), &seats(raw)).unwrap();
                let mut ranks: Vec<u8> = outcomes.iter().map(|o| o.rank).collect();
                ranks.sort_unstable();
                prop_assert_eq!(ranks, vec![1, 2, 3, 4]);
            }

            #[test]
            fn higher_score_never_ranks_worse(raw in valid_scores()) {
                let outcomes = compute_outcomes(&standard_rule(), &seats(raw)).unwrap();
                for i in 0..4 {
                    for j in 0..4 {
                        if raw[i] > raw[j] {
                            prop_assert!(outcomes[i].rank < outcomes[j].rank);
                        }
                    }
                }
            }

            #[test]
            fn recomputation_is_stable(raw in valid_scores()) {
                let scores = seats(raw);
                let first = compute_outcomes(&standard_rule(), &scores).unwrap();
                let second = compute_outcomes(&standard_rule(), &scores).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}
