//! Round lifecycle: the per-entrant state machine and the advancement
//! orchestrator.

pub mod advancement;
pub mod status;

pub use advancement::{advance, create_round_one_status};
pub use status::{complete_round, eliminate, is_eligible_for_round, update_score};
