//! Reference model for model-based testing.
//!
//! The model captures what a valid draw IS, not how to find one. Rosters are
//! index tables: participant `i` may draw `j` unless `i == j` or the pair is
//! excluded. Feasibility and validity are decided by exhaustive search over
//! permutations, which is slow but leaves nothing to trust.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Small: Rosters are capped at [`MAX_PARTICIPANTS`] so search stays cheap
//! - Deterministic: Same inputs produce same outputs

mod roster;
mod spec;

pub use roster::ModelRoster;
pub use spec::{MAX_PARTICIPANTS, RosterSpec};
