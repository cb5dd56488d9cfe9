//! In-memory stores for rules, match records, and round statuses.
//!
//! Persistence technology is an external concern; the engine only needs
//! simple keyed lookups, so the stores are plain serde-serializable
//! collections owned by the engine facade.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{CompetitionId, CompetitionRule, EntrantId, MatchId, MatchRecord, RoundStatus};

/// Scoring-rule lookup per competition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTable {
    rules: HashMap<CompetitionId, CompetitionRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, competition_id: CompetitionId, rule: CompetitionRule) {
        self.rules.insert(competition_id, rule);
    }

    pub fn get(&self, competition_id: &CompetitionId) -> Result<&CompetitionRule> {
        self.rules
            .get(competition_id)
            .ok_or_else(|| EngineError::NotFound(format!("rule for competition {competition_id}")))
    }

    pub fn remove(&mut self, competition_id: &CompetitionId) -> Option<CompetitionRule> {
        self.rules.remove(competition_id)
    }
}

/// Store of match records, keyed by id with a uniqueness invariant on
/// (competition, round, match number).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStore {
    records: HashMap<MatchId, MatchRecord>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created record. Rejects a second record with the same
    /// match number in the same (competition, round).
    pub fn insert(&mut self, record: MatchRecord) -> Result<()> {
        let duplicate = self.records.values().any(|r| {
            r.competition_id == record.competition_id
                && r.round_number == record.round_number
                && r.match_number == record.match_number
        });
        if duplicate {
            return Err(EngineError::DuplicateMatchNumber {
                competition_id: record.competition_id,
                round_number: record.round_number,
                match_number: record.match_number,
            });
        }
        self.records.insert(record.id, record);
        Ok(())
    }

    pub fn get(&self, id: &MatchId) -> Option<&MatchRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &MatchId) -> Option<&mut MatchRecord> {
        self.records.get_mut(id)
    }

    /// All records of one round, in match-number order.
    pub fn for_round(&self, competition_id: &CompetitionId, round_number: u32) -> Vec<&MatchRecord> {
        let mut records: Vec<&MatchRecord> = self
            .records
            .values()
            .filter(|r| r.competition_id == *competition_id && r.round_number == round_number)
            .collect();
        records.sort_by_key(|r| r.match_number);
        records
    }

    /// Drop every record of a competition; returns how many were removed.
    pub fn remove_competition(&mut self, competition_id: &CompetitionId) -> usize {
        let before = self.records.len();
        self.records.retain(|_, r| r.competition_id != *competition_id);
        before - self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Store of per-round entrant statuses.
///
/// Player and team rows live in the same store, so competition-wide queries
/// (notably the maximum round) see both kinds in one pass. At most one row
/// exists per (entrant, competition, round).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundStatusStore {
    rows: Vec<RoundStatus>,
}

impl RoundStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, status: RoundStatus) -> Result<()> {
        if self
            .get(&status.entrant, &status.competition_id, status.round_number)
            .is_some()
        {
            return Err(EngineError::DuplicateRoundStatus {
                entrant: status.entrant,
                competition_id: status.competition_id,
                round_number: status.round_number,
            });
        }
        self.rows.push(status);
        Ok(())
    }

    pub fn get(
        &self,
        entrant: &EntrantId,
        competition_id: &CompetitionId,
        round_number: u32,
    ) -> Option<&RoundStatus> {
        self.rows.iter().find(|r| {
            r.entrant == *entrant
                && r.competition_id == *competition_id
                && r.round_number == round_number
        })
    }

    pub fn get_mut(
        &mut self,
        entrant: &EntrantId,
        competition_id: &CompetitionId,
        round_number: u32,
    ) -> Option<&mut RoundStatus> {
        self.rows.iter_mut().find(|r| {
            r.entrant == *entrant
                && r.competition_id == *competition_id
                && r.round_number == round_number
        })
    }

    /// All rows of one round, in insertion order.
    pub fn for_round(&self, competition_id: &CompetitionId, round_number: u32) -> Vec<&RoundStatus> {
        self.rows
            .iter()
            .filter(|r| r.competition_id == *competition_id && r.round_number == round_number)
            .collect()
    }

    pub fn iter_round_mut(
        &mut self,
        competition_id: &CompetitionId,
        round_number: u32,
    ) -> impl Iterator<Item = &mut RoundStatus> {
        let competition_id = competition_id.clone();
        self.rows
            .iter_mut()
            .filter(move |r| r.competition_id == competition_id && r.round_number == round_number)
    }

    /// Highest round number seen for the competition across player and team
    /// rows; 0 when no row exists yet. Always derived from the rows, never
    /// maintained as a counter.
    pub fn max_round(&self, competition_id: &CompetitionId) -> u32 {
        self.rows
            .iter()
            .filter(|r| r.competition_id == *competition_id)
            .map(|r| r.round_number)
            .max()
            .unwrap_or(0)
    }

    /// Drop every row of a competition; returns how many were removed.
    pub fn remove_competition(&mut self, competition_id: &CompetitionId) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| r.competition_id != *competition_id);
        before - self.rows.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
