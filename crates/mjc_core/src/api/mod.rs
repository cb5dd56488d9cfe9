//! Engine facade: the single entry point for every operation in the
//! external contract.

mod requests;

pub use requests::{AdvanceRequest, CreateMatchRequest, SeatAssignment, UpdateMatchRequest};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::models::{
    CompetitionId, CompetitionRule, EntrantId, MatchId, MatchRecord, RankingEntry, RoundStatus,
    Seat, SeatResult,
};
use crate::registry::{CompetitionKind, MembershipLookup, Registry};
use crate::rounds;
use crate::scoring::{self, pt, ranking};
use crate::state::EngineState;
use crate::status::{self, CompetitionStatus};
use crate::store::{MatchStore, RoundStatusStore, RuleTable};

/// Owner of all competition state.
///
/// Writes take `&mut self`, reads `&self`; callers that share the engine
/// across a request pool wrap it in a lock. Every core operation is
/// synchronous compute plus store access, so nothing here suspends.
#[derive(Debug, Clone, Default)]
pub struct CompetitionEngine {
    rules: RuleTable,
    matches: MatchStore,
    statuses: RoundStatusStore,
    registry: Registry,
}

impl CompetitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Competition setup (registration collaborator surface)
    // ------------------------------------------------------------------

    /// Create a competition with its scoring rule.
    pub fn create_competition(
        &mut self,
        competition_id: CompetitionId,
        kind: CompetitionKind,
        rule: CompetitionRule,
    ) {
        self.registry.create_competition(competition_id.clone(), kind);
        self.rules.insert(competition_id, rule);
    }

    /// Register an individual player.
    pub fn register_player(
        &mut self,
        competition_id: &CompetitionId,
        player: crate::models::PlayerId,
    ) -> Result<()> {
        self.registry.register_player(competition_id, player)
    }

    /// Register a team and its members.
    pub fn register_team(
        &mut self,
        competition_id: &CompetitionId,
        team: crate::models::TeamId,
        members: impl IntoIterator<Item = crate::models::PlayerId>,
    ) -> Result<()> {
        self.registry.register_team(competition_id, team, members)
    }

    /// Delete a competition and everything it owns: rule, match records,
    /// round statuses, and roster go together so no orphan outlives it.
    pub fn delete_competition(&mut self, competition_id: &CompetitionId) {
        self.rules.remove(competition_id);
        let matches = self.matches.remove_competition(competition_id);
        let statuses = self.statuses.remove_competition(competition_id);
        self.registry.remove_competition(competition_id);
        log::info!(
            "deleted competition {competition_id}: {matches} matches, {statuses} status rows"
        );
    }

    pub fn rule(&self, competition_id: &CompetitionId) -> Result<&CompetitionRule> {
        self.rules.get(competition_id)
    }

    // ------------------------------------------------------------------
    // Match records
    // ------------------------------------------------------------------

    /// Record one physical match and compute its PT scores.
    pub fn create_match(&mut self, request: CreateMatchRequest) -> Result<MatchRecord> {
        if request.round_number == 0 {
            return Err(EngineError::Validation(
                "round number must be at least 1".into(),
            ));
        }
        let rule = *self.rules.get(&request.competition_id)?;

        let raw: [i32; 4] = std::array::from_fn(|i| request.seats[i].raw_score);
        pt::validate_score_total(&raw)?;

        // All four seat players must be eligible before anything is written.
        for (seat, assignment) in Seat::ALL.iter().zip(request.seats.iter()) {
            let not_eligible = EngineError::SeatEntrantNotEligible {
                seat: *seat,
                player: assignment.player.clone(),
                competition_id: request.competition_id.clone(),
                round_number: request.round_number,
            };
            let entrant = self
                .registry
                .entrant_for_player(&request.competition_id, &assignment.player)
                .ok_or_else(|| not_eligible.clone())?;
            if !rounds::is_eligible_for_round(
                &self.statuses,
                &entrant,
                &request.competition_id,
                request.round_number,
            ) {
                return Err(not_eligible);
            }
        }

        let now = Utc::now();
        let seats: [SeatResult; 4] = std::array::from_fn(|i| SeatResult {
            seat: Seat::ALL[i],
            player: request.seats[i].player.clone(),
            raw_score: request.seats[i].raw_score,
            penalty: request.seats[i].penalty,
            pt_score: 0.0,
            rank: 0,
        });
        let mut record = MatchRecord {
            id: Uuid::new_v4(),
            competition_id: request.competition_id,
            round_number: request.round_number,
            match_number: request.match_number,
            name: request.name,
            remarks: request.remarks,
            seats,
            created_at: now,
            updated_at: now,
        };
        pt::apply_to_record(&rule, &mut record)?;
        self.matches.insert(record.clone())?;
        log::info!(
            "recorded match {} of {} round {}",
            record.match_number,
            record.competition_id,
            record.round_number
        );
        Ok(record)
    }

    /// Correct a recorded match's scores; PT scores are recomputed with them.
    pub fn update_match(&mut self, request: UpdateMatchRequest) -> Result<MatchRecord> {
        pt::validate_score_total(&request.raw_scores)?;

        let competition_id = self
            .matches
            .get(&request.match_id)
            .map(|r| r.competition_id.clone())
            .ok_or_else(|| EngineError::NotFound(format!("match {}", request.match_id)))?;
        let rule = *self.rules.get(&competition_id)?;

        let record = self
            .matches
            .get_mut(&request.match_id)
            .ok_or_else(|| EngineError::NotFound(format!("match {}", request.match_id)))?;
        for (i, seat) in record.seats.iter_mut().enumerate() {
            seat.raw_score = request.raw_scores[i];
            seat.penalty = request.penalties[i];
        }
        pt::apply_to_record(&rule, record)?;
        record.updated_at = Utc::now();
        log::info!("corrected match {}", request.match_id);
        Ok(record.clone())
    }

    pub fn match_record(&self, id: &MatchId) -> Option<&MatchRecord> {
        self.matches.get(id)
    }

    // ------------------------------------------------------------------
    // Ranking
    // ------------------------------------------------------------------

    /// Rank a round, one entry per entrant with at least one match.
    pub fn rank_round(
        &self,
        competition_id: &CompetitionId,
        round_number: u32,
    ) -> Vec<RankingEntry> {
        let records = self.matches.for_round(competition_id, round_number);
        match self.registry.kind(competition_id) {
            Some(CompetitionKind::Team) => {
                let units = self
                    .registry
                    .entrants(competition_id)
                    .into_iter()
                    .map(|entrant| {
                        let players = self
                            .registry
                            .constituent_players(competition_id, &entrant);
                        (entrant, players)
                    });
                scoring::rank_units(records.into_iter(), units)
            }
            _ => scoring::rank_players(records.into_iter()),
        }
    }

    /// One entrant's round aggregate, computed without ranking the field.
    pub fn rank_entrant(
        &self,
        competition_id: &CompetitionId,
        round_number: u32,
        entrant: &EntrantId,
    ) -> Result<RankingEntry> {
        let records = self.matches.for_round(competition_id, round_number);
        let tallies = ranking::player_tallies(records.into_iter());
        let players = self.registry.constituent_players(competition_id, entrant);
        ranking::unit_tally(&tallies, players.iter())
            .into_entry(entrant.clone())
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "no matches for {entrant} in {competition_id} round {round_number}"
                ))
            })
    }

    // ------------------------------------------------------------------
    // Round lifecycle
    // ------------------------------------------------------------------

    /// Round-1 row for a freshly registered entrant (initial score 0).
    pub fn create_round_one_status(
        &mut self,
        entrant: EntrantId,
        competition_id: CompetitionId,
    ) -> Result<RoundStatus> {
        rounds::create_round_one_status(&mut self.statuses, &self.registry, entrant, competition_id)
    }

    /// Move a batch of entrants into a new round, all-or-nothing.
    pub fn advance(&mut self, request: AdvanceRequest) -> Result<Vec<RoundStatus>> {
        rounds::advance(
            &mut self.statuses,
            &self.registry,
            &request.competition_id,
            &request.entrants,
            request.target_round,
            request.initial_score,
        )
    }

    pub fn update_score(
        &mut self,
        entrant: &EntrantId,
        competition_id: &CompetitionId,
        round_number: u32,
        new_score: i32,
    ) -> Result<()> {
        rounds::update_score(&mut self.statuses, entrant, competition_id, round_number, new_score)
    }

    pub fn eliminate(
        &mut self,
        entrant: &EntrantId,
        competition_id: &CompetitionId,
        round_number: u32,
    ) -> Result<()> {
        rounds::eliminate(&mut self.statuses, entrant, competition_id, round_number)
    }

    /// Close a round; returns how many rows were flipped to `Completed`.
    pub fn complete_round(&mut self, competition_id: &CompetitionId, round_number: u32) -> usize {
        rounds::complete_round(&mut self.statuses, competition_id, round_number)
    }

    pub fn is_eligible_for_round(
        &self,
        entrant: &EntrantId,
        competition_id: &CompetitionId,
        round_number: u32,
    ) -> bool {
        rounds::is_eligible_for_round(&self.statuses, entrant, competition_id, round_number)
    }

    // ------------------------------------------------------------------
    // Status queries
    // ------------------------------------------------------------------

    /// Point-in-time snapshot of one round.
    pub fn competition_status(
        &self,
        competition_id: &CompetitionId,
        round_number: u32,
    ) -> CompetitionStatus {
        status::competition_status(
            &self.matches,
            &self.statuses,
            &self.registry,
            competition_id,
            round_number,
        )
    }

    /// Highest opened round; 0 when the competition has not started.
    pub fn current_max_round(&self, competition_id: &CompetitionId) -> u32 {
        status::current_max_round(&self.statuses, competition_id)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Snapshot the whole engine for persistence.
    pub fn to_state(&self) -> EngineState {
        EngineState {
            rules: self.rules.clone(),
            matches: self.matches.clone(),
            statuses: self.statuses.clone(),
            registry: self.registry.clone(),
        }
    }

    /// Restore an engine from a persisted snapshot.
    pub fn from_state(state: EngineState) -> Self {
        Self {
            rules: state.rules,
            matches: state.matches,
            statuses: state.statuses,
            registry: state.registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerId, RoundState, TeamId};

    fn comp() -> CompetitionId {
        CompetitionId::new("league")
    }

    fn standard_rule() -> CompetitionRule {
        CompetitionRule::new(25_000, 20, 10, -10, -20)
    }

    fn engine_with_players(players: &[&str]) -> CompetitionEngine {
        let mut engine = CompetitionEngine::new();
        engine.create_competition(comp(), CompetitionKind::Individual, standard_rule());
        for p in players {
            engine.register_player(&comp(), PlayerId::new(*p)).unwrap();
            engine
                .create_round_one_status(EntrantId::player(*p), comp())
                .unwrap();
        }
        engine
    }

    fn match_request(number: u32, players: [&str; 4], raw: [i32; 4]) -> CreateMatchRequest {
        CreateMatchRequest {
            competition_id: comp(),
            round_number: 1,
            match_number: number,
            seats: std::array::from_fn(|i| SeatAssignment {
                player: PlayerId::new(players[i]),
                raw_score: raw[i],
                penalty: 0,
            }),
            name: None,
            remarks: None,
        }
    }

    #[test]
    fn test_create_match_computes_pt_scores() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        let record = engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();

        assert_eq!(record.seats.clone().map(|s| s.rank), [1, 2, 3, 4]);
        assert_eq!(
            record.seats.clone().map(|s| s.pt_score),
            [37.0, 13.0, -17.0, -33.0]
        );
    }

    #[test]
    fn test_create_match_rejects_bad_total() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        let err = engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 11_000]))
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidScoreSum { total: 99_000 });
        assert!(engine.matches.is_empty());
    }

    #[test]
    fn test_create_match_rejects_duplicate_number() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();
        let err = engine
            .create_match(match_request(1, ["d", "c", "b", "a"], [25_000, 25_000, 25_000, 25_000]))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateMatchNumber { .. }));
    }

    #[test]
    fn test_create_match_requires_eligible_seats() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        engine.eliminate(&EntrantId::player("d"), &comp(), 1).unwrap();

        let err = engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::SeatEntrantNotEligible { seat: Seat::North, .. }
        ));

        // An unknown player is equally ineligible.
        let err = engine
            .create_match(match_request(1, ["a", "b", "c", "nobody"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap_err();
        assert!(matches!(err, EngineError::SeatEntrantNotEligible { .. }));
    }

    #[test]
    fn test_update_match_recomputes_pt() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        let record = engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();

        let updated = engine
            .update_match(UpdateMatchRequest {
                match_id: record.id,
                raw_scores: [12_000, 18_000, 28_000, 42_000],
                penalties: [0, 0, 0, 0],
            })
            .unwrap();

        assert_eq!(updated.seats.clone().map(|s| s.rank), [4, 3, 2, 1]);
        assert_eq!(updated.seats[3].pt_score, 37.0);
        assert!(updated.updated_at >= record.updated_at);

        // The next ranking read sees the correction.
        let entries = engine.rank_round(&comp(), 1);
        assert_eq!(entries[0].entrant, EntrantId::player("d"));
    }

    #[test]
    fn test_update_match_rejects_bad_total_before_write() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        let record = engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();

        let err = engine
            .update_match(UpdateMatchRequest {
                match_id: record.id,
                raw_scores: [1, 2, 3, 4],
                penalties: [0, 0, 0, 0],
            })
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidScoreSum { total: 10 });
        assert_eq!(engine.match_record(&record.id).unwrap(), &record);
    }

    #[test]
    fn test_update_unknown_match() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        let err = engine
            .update_match(UpdateMatchRequest {
                match_id: Uuid::new_v4(),
                raw_scores: [25_000, 25_000, 25_000, 25_000],
                penalties: [0, 0, 0, 0],
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_rank_entrant_matches_round_aggregate() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();

        let entry = engine
            .rank_entrant(&comp(), 1, &EntrantId::player("b"))
            .unwrap();
        assert_eq!(entry.total_pt_score, 13.0);
        assert_eq!(entry.match_count, 1);
        assert_eq!(entry.rank, 0);

        let err = engine
            .rank_entrant(&comp(), 1, &EntrantId::player("ghost"))
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_team_ranking_goes_through_membership() {
        let mut engine = CompetitionEngine::new();
        engine.create_competition(comp(), CompetitionKind::Team, standard_rule());
        engine
            .register_team(&comp(), TeamId::new("t1"), [PlayerId::new("a"), PlayerId::new("d")])
            .unwrap();
        engine
            .register_team(&comp(), TeamId::new("t2"), [PlayerId::new("b"), PlayerId::new("c")])
            .unwrap();
        for t in ["t1", "t2"] {
            engine
                .create_round_one_status(EntrantId::team(t), comp())
                .unwrap();
        }
        engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();

        let entries = engine.rank_round(&comp(), 1);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entrant, EntrantId::team("t1"));
        assert_eq!(entries[0].total_pt_score, 4.0);
        assert_eq!(entries[0].rank, 1);
    }

    #[test]
    fn test_full_round_flow() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();

        // Bottom finisher is eliminated, top two advance, round closes.
        engine.eliminate(&EntrantId::player("d"), &comp(), 1).unwrap();
        engine
            .advance(AdvanceRequest {
                competition_id: comp(),
                entrants: vec![EntrantId::player("a"), EntrantId::player("b")],
                target_round: 2,
                initial_score: 0,
            })
            .unwrap();
        let flipped = engine.complete_round(&comp(), 1);
        assert_eq!(flipped, 1); // only "c" was still active

        assert_eq!(engine.current_max_round(&comp()), 2);
        let snapshot = engine.competition_status(&comp(), 1);
        let state_of = |p: &str| {
            snapshot
                .entrants
                .iter()
                .find(|e| e.status.entrant == EntrantId::player(p))
                .map(|e| e.status.state)
        };
        assert_eq!(state_of("a"), Some(RoundState::Advanced));
        assert_eq!(state_of("b"), Some(RoundState::Advanced));
        assert_eq!(state_of("c"), Some(RoundState::Completed));
        assert_eq!(state_of("d"), Some(RoundState::Eliminated));
    }

    #[test]
    fn test_delete_competition_cascades() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();

        engine.delete_competition(&comp());

        assert!(engine.matches.is_empty());
        assert!(engine.statuses.is_empty());
        assert!(engine.rule(&comp()).is_err());
        assert_eq!(engine.current_max_round(&comp()), 0);
    }

    #[test]
    fn test_state_round_trip() {
        let mut engine = engine_with_players(&["a", "b", "c", "d"]);
        engine
            .create_match(match_request(1, ["a", "b", "c", "d"], [42_000, 28_000, 18_000, 12_000]))
            .unwrap();
        engine.eliminate(&EntrantId::player("d"), &comp(), 1).unwrap();

        let json = serde_json::to_string(&engine.to_state()).unwrap();
        let restored = CompetitionEngine::from_state(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.rank_round(&comp(), 1), engine.rank_round(&comp(), 1));
        assert_eq!(
            restored.competition_status(&comp(), 1),
            engine.competition_status(&comp(), 1)
        );
        assert_eq!(restored.current_max_round(&comp()), 1);
    }
}
