//! Deterministic test harness for the Tinsel draw engine.
//!
//! Provides a seeded [`SimEnv`] so every draw is reproducible from its seed,
//! and a reference model that decides feasibility by brute force. Property
//! tests run the real engine and check its output against the model.
//!
//! # Model-Based Testing
//!
//! The `model` module describes rosters as small index-based constraint
//! tables ([`RosterSpec`] -> [`ModelRoster`]). The model enumerates every
//! valid assignment directly, which is only practical for tiny rosters but is
//! obviously correct. It serves as the oracle for the engine.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod sim_env;

pub use model::{MAX_PARTICIPANTS, ModelRoster, RosterSpec};
pub use sim_env::SimEnv;
