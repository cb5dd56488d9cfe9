//! Serializable engine snapshot.

use serde::{Deserialize, Serialize};

use crate::registry::Registry;
use crate::store::{MatchStore, RoundStatusStore, RuleTable};

/// Snapshot of every engine store, round-trippable through serde.
///
/// Pairs with [`CompetitionEngine::to_state`] and
/// [`CompetitionEngine::from_state`].
///
/// [`CompetitionEngine::to_state`]: crate::api::CompetitionEngine::to_state
/// [`CompetitionEngine::from_state`]: crate::api::CompetitionEngine::from_state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineState {
    pub rules: RuleTable,
    pub matches: MatchStore,
    pub statuses: RoundStatusStore,
    pub registry: Registry,
}
