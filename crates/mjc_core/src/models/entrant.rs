//! Identifier types for competitions and their entrants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a registered player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a registered team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a competition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompetitionId(pub String);

impl CompetitionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CompetitionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A competition entrant: an individual player or a team.
///
/// Round statuses, advancement, and ranking all key on this so the player and
/// team paths share one implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntrantId {
    Player(PlayerId),
    Team(TeamId),
}

impl EntrantId {
    pub fn player(id: impl Into<String>) -> Self {
        EntrantId::Player(PlayerId::new(id))
    }

    pub fn team(id: impl Into<String>) -> Self {
        EntrantId::Team(TeamId::new(id))
    }

    pub fn as_player(&self) -> Option<&PlayerId> {
        match self {
            EntrantId::Player(id) => Some(id),
            EntrantId::Team(_) => None,
        }
    }

    pub fn as_team(&self) -> Option<&TeamId> {
        match self {
            EntrantId::Player(_) => None,
            EntrantId::Team(id) => Some(id),
        }
    }

    pub fn is_team(&self) -> bool {
        matches!(self, EntrantId::Team(_))
    }
}

impl fmt::Display for EntrantId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntrantId::Player(id) => write!(f, "player {}", id),
            EntrantId::Team(id) => write!(f, "team {}", id),
        }
    }
}

impl From<PlayerId> for EntrantId {
    fn from(id: PlayerId) -> Self {
        EntrantId::Player(id)
    }
}

impl From<TeamId> for EntrantId {
    fn from(id: TeamId) -> Self {
        EntrantId::Team(id)
    }
}
