//! Batch advancement of entrants into a new round.

use std::collections::HashSet;

use crate::error::{EngineError, Result};
use crate::models::{CompetitionId, EntrantId, RoundStatus};
use crate::registry::RegistrationLookup;
use crate::store::RoundStatusStore;

/// Create the round-1 row for a freshly registered entrant.
///
/// Called by the registration flow at sign-up time; every later round is
/// opened by [`advance`] and nothing else.
pub fn create_round_one_status(
    store: &mut RoundStatusStore,
    registry: &impl RegistrationLookup,
    entrant: EntrantId,
    competition_id: CompetitionId,
) -> Result<RoundStatus> {
    if !registry.is_registered(&entrant, &competition_id) {
        return Err(EngineError::NotRegistered {
            entrant,
            competition_id,
        });
    }
    super::status::create_round_status(store, entrant, competition_id, 1, 0)
}

/// Advance a batch of entrants to `target_round`.
///
/// The target must exceed both 1 and the competition-wide maximum round, which
/// counts player and team rows alike: every advancement opens a round number
/// the competition has never seen. The batch is all-or-nothing; every entrant
/// is validated before the first row is written.
pub fn advance(
    store: &mut RoundStatusStore,
    registry: &impl RegistrationLookup,
    competition_id: &CompetitionId,
    entrants: &[EntrantId],
    target_round: u32,
    initial_score: i32,
) -> Result<Vec<RoundStatus>> {
    if entrants.is_empty() {
        return Err(EngineError::Validation("entrant batch is empty".into()));
    }

    let current_max_round = store.max_round(competition_id);
    if target_round <= 1 {
        return Err(EngineError::InvalidTargetRound {
            target_round,
            current_max_round,
        });
    }

    // Per-entrant checks come before the monotonicity check so a repeat of an
    // earlier advancement reports the duplicate row, not the stale target.
    let mut seen: HashSet<&EntrantId> = HashSet::new();
    for entrant in entrants {
        if !seen.insert(entrant) {
            return Err(EngineError::DuplicateRoundStatus {
                entrant: entrant.clone(),
                competition_id: competition_id.clone(),
                round_number: target_round,
            });
        }
        if !registry.is_registered(entrant, competition_id) {
            return Err(EngineError::NotRegistered {
                entrant: entrant.clone(),
                competition_id: competition_id.clone(),
            });
        }
        if store.get(entrant, competition_id, target_round).is_some() {
            return Err(EngineError::DuplicateRoundStatus {
                entrant: entrant.clone(),
                competition_id: competition_id.clone(),
                round_number: target_round,
            });
        }
    }

    if target_round <= current_max_round {
        return Err(EngineError::InvalidTargetRound {
            target_round,
            current_max_round,
        });
    }

    let mut created = Vec::with_capacity(entrants.len());
    for entrant in entrants {
        let status = RoundStatus::new(
            entrant.clone(),
            competition_id.clone(),
            target_round,
            initial_score,
        );
        store.insert(status.clone())?;
        if current_max_round >= 1 {
            super::status::mark_advanced(store, entrant, competition_id, current_max_round);
        }
        created.push(status);
    }
    log::info!(
        "advanced {} entrants to {competition_id} round {target_round}",
        created.len()
    );
    Ok(created)
}
