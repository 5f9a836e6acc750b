//! Tinsel core: constrained random gift-exchange assignment.
//!
//! Given a roster of participants, each with a list of names they must not
//! draw, the engine assigns every participant exactly one giftee so that the
//! result is a derangement with exclusions: a permutation of the names with
//! no self-assignment and no forbidden pair.
//!
//! # Architecture
//!
//! The core is Sans-IO. It never reads files, sends messages or touches a
//! global RNG:
//!
//! - [`Environment`]: randomness source, injected by the caller
//! - [`Roster`] / [`Participant`]: who is drawing and what they may not draw
//! - [`Hat`]: names still available, with snapshot and rollback
//! - [`AssignmentEngine`]: the draw itself, with a bounded retry policy
//! - [`validate`] / [`ResolvedRoster`]: proof that a draw is complete and
//!   valid, required by everything downstream
//! - [`next_cycle`]: exclusion lists for next year's draw
//!
//! ```text
//! Roster ──► AssignmentEngine ──► validate ──► ResolvedRoster ──► notify / export
//!                 │    ▲
//!                 ▼    │ rollback
//!                 Hat ─┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod env;
pub mod export;
pub mod hat;
pub mod matching;
pub mod roster;
pub mod validate;

pub use engine::{
    AssignConfig, AssignError, Assignment, AssignmentEngine, DEFAULT_MAX_ATTEMPTS, Strategy,
};
pub use env::Environment;
pub use export::{ExportError, HistoryCap, NextCycleEntry, next_cycle, next_cycle_for};
pub use hat::{Hat, HatSnapshot};
pub use roster::{Participant, Roster, RosterError};
pub use validate::{ResolvedRoster, ValidationError, validate};
