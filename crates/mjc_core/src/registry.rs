//! Competition rosters: registration and team membership.
//!
//! In a deployment this data belongs to the registration collaborator; the
//! engine carries an in-process registry and consumes it only through the two
//! lookup traits, so the scoring and advancement modules never see the
//! concrete type.

use std::collections::{BTreeMap, BTreeSet};
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{CompetitionId, EntrantId, PlayerId, TeamId};

/// Registration check consumed by advancement and round-1 creation.
pub trait RegistrationLookup {
    fn is_registered(&self, entrant: &EntrantId, competition_id: &CompetitionId) -> bool;
}

/// Membership access consumed by ranking and status aggregation.
pub trait MembershipLookup {
    /// Player IDs currently contributing score for the entrant: the player
    /// itself for individual entrants, the active members for a team.
    fn constituent_players(
        &self,
        competition_id: &CompetitionId,
        entrant: &EntrantId,
    ) -> Vec<PlayerId>;
}

/// Whether a competition's entrants are individual players or teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionKind {
    Individual,
    Team,
}

/// Registration state of one competition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionRoster {
    pub kind: CompetitionKind,
    pub players: BTreeSet<PlayerId>,
    pub teams: BTreeMap<TeamId, BTreeSet<PlayerId>>,
}

impl CompetitionRoster {
    fn new(kind: CompetitionKind) -> Self {
        Self {
            kind,
            players: BTreeSet::new(),
            teams: BTreeMap::new(),
        }
    }
}

/// Registry of competitions and their rosters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    rosters: HashMap<CompetitionId, CompetitionRoster>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_competition(&mut self, competition_id: CompetitionId, kind: CompetitionKind) {
        self.rosters
            .entry(competition_id)
            .or_insert_with(|| CompetitionRoster::new(kind));
    }

    pub fn kind(&self, competition_id: &CompetitionId) -> Option<CompetitionKind> {
        self.rosters.get(competition_id).map(|r| r.kind)
    }

    fn roster_mut(&mut self, competition_id: &CompetitionId) -> Result<&mut CompetitionRoster> {
        self.rosters
            .get_mut(competition_id)
            .ok_or_else(|| EngineError::NotFound(format!("competition {competition_id}")))
    }

    /// Register an individual player.
    pub fn register_player(
        &mut self,
        competition_id: &CompetitionId,
        player: PlayerId,
    ) -> Result<()> {
        let roster = self.roster_mut(competition_id)?;
        roster.players.insert(player);
        Ok(())
    }

    /// Register a team with its member players. Members are also recorded in
    /// the player pool so seat eligibility can resolve them.
    pub fn register_team(
        &mut self,
        competition_id: &CompetitionId,
        team: TeamId,
        members: impl IntoIterator<Item = PlayerId>,
    ) -> Result<()> {
        let roster = self.roster_mut(competition_id)?;
        let members: BTreeSet<PlayerId> = members.into_iter().collect();
        roster.players.extend(members.iter().cloned());
        roster.teams.insert(team, members);
        Ok(())
    }

    /// All entrants of the competition, players or teams per its kind.
    pub fn entrants(&self, competition_id: &CompetitionId) -> Vec<EntrantId> {
        let Some(roster) = self.rosters.get(competition_id) else {
            return Vec::new();
        };
        match roster.kind {
            CompetitionKind::Individual => roster
                .players
                .iter()
                .cloned()
                .map(EntrantId::Player)
                .collect(),
            CompetitionKind::Team => roster.teams.keys().cloned().map(EntrantId::Team).collect(),
        }
    }

    /// The entrant a player scores for: themselves in an individual
    /// competition, their team in a team competition. `None` when the player
    /// is unknown to the competition.
    pub fn entrant_for_player(
        &self,
        competition_id: &CompetitionId,
        player: &PlayerId,
    ) -> Option<EntrantId> {
        let roster = self.rosters.get(competition_id)?;
        match roster.kind {
            CompetitionKind::Individual => roster
                .players
                .contains(player)
                .then(|| EntrantId::Player(player.clone())),
            CompetitionKind::Team => roster
                .teams
                .iter()
                .find(|(_, members)| members.contains(player))
                .map(|(team, _)| EntrantId::Team(team.clone())),
        }
    }

    pub fn remove_competition(&mut self, competition_id: &CompetitionId) -> bool {
        self.rosters.remove(competition_id).is_some()
    }
}

impl RegistrationLookup for Registry {
    fn is_registered(&self, entrant: &EntrantId, competition_id: &CompetitionId) -> bool {
        let Some(roster) = self.rosters.get(competition_id) else {
            return false;
        };
        match entrant {
            EntrantId::Player(id) => {
                roster.kind == CompetitionKind::Individual && roster.players.contains(id)
            }
            EntrantId::Team(id) => {
                roster.kind == CompetitionKind::Team && roster.teams.contains_key(id)
            }
        }
    }
}

impl MembershipLookup for Registry {
    fn constituent_players(
        &self,
        competition_id: &CompetitionId,
        entrant: &EntrantId,
    ) -> Vec<PlayerId> {
        match entrant {
            EntrantId::Player(id) => vec![id.clone()],
            EntrantId::Team(id) => self
                .rosters
                .get(competition_id)
                .and_then(|r| r.teams.get(id))
                .map(|members| members.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }
}
