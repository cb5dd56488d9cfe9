//! Round-status lifecycle operations.
//!
//! The only writers of `RoundStatus` rows are this module and the
//! advancement orchestrator; readers never mutate.

use chrono::Utc;

use crate::error::{EngineError, Result};
use crate::models::{CompetitionId, EntrantId, RoundState, RoundStatus};
use crate::store::RoundStatusStore;

fn missing_row(entrant: &EntrantId, competition_id: &CompetitionId, round_number: u32) -> EngineError {
    EngineError::NotFound(format!(
        "round status for {entrant} in competition {competition_id} round {round_number}"
    ))
}

/// Create a fresh `Active` row. Fails when a row already exists for the key.
pub fn create_round_status(
    store: &mut RoundStatusStore,
    entrant: EntrantId,
    competition_id: CompetitionId,
    round_number: u32,
    initial_score: i32,
) -> Result<RoundStatus> {
    let status = RoundStatus::new(entrant, competition_id, round_number, initial_score);
    store.insert(status.clone())?;
    log::debug!(
        "created round status: {} in {} round {}",
        status.entrant,
        status.competition_id,
        status.round_number
    );
    Ok(status)
}

/// Overwrite the current score. The lifecycle state is untouched.
pub fn update_score(
    store: &mut RoundStatusStore,
    entrant: &EntrantId,
    competition_id: &CompetitionId,
    round_number: u32,
    new_score: i32,
) -> Result<()> {
    let row = store
        .get_mut(entrant, competition_id, round_number)
        .ok_or_else(|| missing_row(entrant, competition_id, round_number))?;
    row.current_score = new_score;
    Ok(())
}

/// Eliminate an entrant from a round.
///
/// A second elimination of the same row is rejected so the original
/// elimination timestamp survives.
pub fn eliminate(
    store: &mut RoundStatusStore,
    entrant: &EntrantId,
    competition_id: &CompetitionId,
    round_number: u32,
) -> Result<()> {
    let row = store
        .get_mut(entrant, competition_id, round_number)
        .ok_or_else(|| missing_row(entrant, competition_id, round_number))?;
    if row.is_eliminated {
        return Err(EngineError::AlreadyEliminated {
            entrant: entrant.clone(),
            competition_id: competition_id.clone(),
            round_number,
        });
    }
    row.state = RoundState::Eliminated;
    row.is_eliminated = true;
    row.elimination_time = Some(Utc::now());
    log::info!("eliminated {entrant} from {competition_id} round {round_number}");
    Ok(())
}

/// Mark an entrant's row as advanced out of its round. Only an `Active` row
/// changes; an already-decided row keeps its state.
pub(crate) fn mark_advanced(
    store: &mut RoundStatusStore,
    entrant: &EntrantId,
    competition_id: &CompetitionId,
    round_number: u32,
) {
    if let Some(row) = store.get_mut(entrant, competition_id, round_number) {
        if row.state == RoundState::Active {
            row.state = RoundState::Advanced;
        }
    }
}

/// Close a round: every row still `Active` becomes `Completed`.
///
/// The state is re-checked per row at flip time; rows that moved to
/// `Advanced` or `Eliminated` in the meantime keep their state. Returns the
/// number of rows flipped.
pub fn complete_round(
    store: &mut RoundStatusStore,
    competition_id: &CompetitionId,
    round_number: u32,
) -> usize {
    let mut flipped = 0;
    for row in store.iter_round_mut(competition_id, round_number) {
        if row.state == RoundState::Active {
            row.state = RoundState::Completed;
            flipped += 1;
        }
    }
    log::info!("completed {competition_id} round {round_number}: {flipped} rows closed");
    flipped
}

/// Whether the entrant may be seated in a match of this round: they hold a
/// non-eliminated status row at the round.
pub fn is_eligible_for_round(
    store: &RoundStatusStore,
    entrant: &EntrantId,
    competition_id: &CompetitionId,
    round_number: u32,
) -> bool {
    store
        .get(entrant, competition_id, round_number)
        .map(|row| !row.is_eliminated)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp() -> CompetitionId {
        CompetitionId::new("c1")
    }

    fn seeded_store() -> RoundStatusStore {
        let mut store = RoundStatusStore::new();
        create_round_status(&mut store, EntrantId::player("p1"), comp(), 1, 0).unwrap();
        create_round_status(&mut store, EntrantId::player("p2"), comp(), 1, 0).unwrap();
        create_round_status(&mut store, EntrantId::player("p3"), comp(), 1, 0).unwrap();
        store
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let mut store = seeded_store();
        let err =
            create_round_status(&mut store, EntrantId::player("p1"), comp(), 1, 50).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateRoundStatus { .. }));

        // The original row is unchanged.
        let row = store.get(&EntrantId::player("p1"), &comp(), 1).unwrap();
        assert_eq!(row.current_score, 0);
        assert_eq!(row.state, RoundState::Active);
    }

    #[test]
    fn test_update_score_keeps_state() {
        let mut store = seeded_store();
        update_score(&mut store, &EntrantId::player("p1"), &comp(), 1, 420).unwrap();

        let row = store.get(&EntrantId::player("p1"), &comp(), 1).unwrap();
        assert_eq!(row.current_score, 420);
        assert_eq!(row.initial_score, 0);
        assert_eq!(row.state, RoundState::Active);
    }

    #[test]
    fn test_update_score_requires_row() {
        let mut store = seeded_store();
        let err = update_score(&mut store, &EntrantId::player("p9"), &comp(), 1, 1).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_eliminate_sets_all_fields_together() {
        let mut store = seeded_store();
        eliminate(&mut store, &EntrantId::player("p2"), &comp(), 1).unwrap();

        let row = store.get(&EntrantId::player("p2"), &comp(), 1).unwrap();
        assert_eq!(row.state, RoundState::Eliminated);
        assert!(row.is_eliminated);
        assert!(row.elimination_time.is_some());
    }

    #[test]
    fn test_second_elimination_rejected_and_timestamp_kept() {
        let mut store = seeded_store();
        eliminate(&mut store, &EntrantId::player("p2"), &comp(), 1).unwrap();
        let first_time = store
            .get(&EntrantId::player("p2"), &comp(), 1)
            .unwrap()
            .elimination_time;

        let err = eliminate(&mut store, &EntrantId::player("p2"), &comp(), 1).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyEliminated { .. }));
        assert_eq!(
            store.get(&EntrantId::player("p2"), &comp(), 1).unwrap().elimination_time,
            first_time
        );
    }

    #[test]
    fn test_complete_round_flips_only_active_rows() {
        let mut store = seeded_store();
        eliminate(&mut store, &EntrantId::player("p1"), &comp(), 1).unwrap();
        mark_advanced(&mut store, &EntrantId::player("p2"), &comp(), 1);

        let flipped = complete_round(&mut store, &comp(), 1);
        assert_eq!(flipped, 1);
        assert_eq!(store.get(&EntrantId::player("p1"), &comp(), 1).unwrap().state, RoundState::Eliminated);
        assert_eq!(store.get(&EntrantId::player("p2"), &comp(), 1).unwrap().state, RoundState::Advanced);
        assert_eq!(store.get(&EntrantId::player("p3"), &comp(), 1).unwrap().state, RoundState::Completed);
    }

    #[test]
    fn test_eligibility() {
        let mut store = seeded_store();
        assert!(is_eligible_for_round(&store, &EntrantId::player("p1"), &comp(), 1));
        assert!(!is_eligible_for_round(&store, &EntrantId::player("p1"), &comp(), 2));
        assert!(!is_eligible_for_round(&store, &EntrantId::player("p9"), &comp(), 1));

        eliminate(&mut store, &EntrantId::player("p1"), &comp(), 1).unwrap();
        assert!(!is_eligible_for_round(&store, &EntrantId::player("p1"), &comp(), 1));
    }
}
