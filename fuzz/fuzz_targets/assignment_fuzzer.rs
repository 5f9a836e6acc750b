//! Fuzz target for the assignment engine
//!
//! Never hand back an invalid or half-drawn roster
//!
//! # Strategy
//!
//! - Rosters: arbitrary sizes and exclusion tables, including self
//!   exclusions, duplicates and rosters with no valid assignment
//! - Strategies: both reconcile and redraw, with tiny attempt budgets so
//!   exhaustion paths are exercised
//! - Reuse: the same roster is drawn twice to catch stale state
//!
//! # Invariants
//!
//! - `Ok` ONLY if every participant has an allowed, unique giftee
//! - `Infeasible` if and ONLY if the exhaustive model finds no assignment
//! - Any error leaves every giftee cleared
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tinsel_core::{AssignConfig, AssignError, AssignmentEngine, Strategy, validate};
use tinsel_harness::{ModelRoster, RosterSpec, SimEnv};

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    /// Seed for the draw.
    seed: u64,
    /// Use the redraw strategy instead of reconcile.
    redraw: bool,
    /// Attempt budget (kept small).
    max_attempts: u8,
    /// Roster to draw.
    roster: RosterSpec,
}

fuzz_target!(|input: FuzzInput| {
    let model = ModelRoster::from_spec(&input.roster);
    let Ok(mut roster) = model.to_roster() else {
        panic!("model rosters always have unique, non-empty names");
    };

    let strategy = if input.redraw { Strategy::Redraw } else { Strategy::Reconcile };
    let config = AssignConfig { strategy, max_attempts: u32::from(input.max_attempts % 16) };
    let engine = AssignmentEngine::new(SimEnv::with_seed(input.seed), config);
    let feasible = model.is_feasible();

    for _ in 0..2 {
        match engine.assign(&mut roster) {
            Ok(receipt) => {
                assert!(feasible, "drew an infeasible roster");
                assert_eq!(receipt.strategy, strategy);
                assert_eq!(validate(&roster), Ok(()));
                if let Err(problem) = model.check(&roster) {
                    panic!("invalid draw: {problem}");
                }
            },
            Err(AssignError::Infeasible { participant }) => {
                assert!(!feasible, "feasible roster reported infeasible at {participant}");
                assert_eq!(roster.unresolved().count(), model.len());
            },
            Err(AssignError::AttemptsExhausted { attempts, .. }) => {
                assert!(feasible);
                assert_eq!(attempts, config.max_attempts.max(1));
                assert_eq!(roster.unresolved().count(), model.len());
            },
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
});
