//! Assignment engine.
//!
//! Turns a [`Roster`] into a complete derangement with exclusions, drawing
//! names from a [`Hat`] with randomness supplied by an [`Environment`].
//!
//! ## Strategies
//!
//! - [`Strategy::Reconcile`]: each participant prunes the names they may not
//!   draw, draws from what is left, and restores the rest. When nothing is
//!   left, a swap with an earlier participant repairs the draw.
//! - [`Strategy::Redraw`]: each participant draws from the shared hat, setting
//!   aside invalid picks. If only one invalid name remains, the whole cycle is
//!   thrown away and started again.
//!
//! ## Retry policy
//!
//! A failed cycle (no swap partner, or a redraw signal) rolls the hat and the
//! roster back to the cycle-start snapshot and tries again, up to
//! [`AssignConfig::max_attempts`] cycles. Infeasible rosters are detected up
//! front and never consume attempts.
//!
//! The engine never hands back a partially drawn or invalid roster: on any
//! error every giftee is cleared.

mod reconcile;
mod redraw;

use std::fmt;

use thiserror::Error;

use crate::{
    env::Environment,
    hat::{Hat, HatSnapshot},
    matching,
    roster::Roster,
    validate::{ValidationError, validate},
};

/// Default number of full draw cycles before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// How each participant's name is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Prune-and-draw with swap reconciliation.
    #[default]
    Reconcile,

    /// Draw from the shared hat, full redraw on deadlock.
    Redraw,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconcile => write!(f, "reconcile"),
            Self::Redraw => write!(f, "redraw"),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignConfig {
    /// Drawing strategy.
    pub strategy: Strategy,
    /// Maximum full draw cycles. Zero is treated as one.
    pub max_attempts: u32,
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self { strategy: Strategy::default(), max_attempts: DEFAULT_MAX_ATTEMPTS }
    }
}

/// Receipt for a successful draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Strategy that produced the draw.
    pub strategy: Strategy,
    /// Draw cycles used, including the successful one.
    pub attempts: u32,
    /// Reconciliation swaps in the successful cycle.
    pub swaps: usize,
}

/// Errors from [`AssignmentEngine::assign`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// Nobody to draw for.
    #[error("roster is empty")]
    EmptyRoster,

    /// No valid assignment exists for this roster.
    #[error("no valid assignment exists: {participant} cannot be matched")]
    Infeasible {
        /// A participant left without a possible giftee.
        participant: String,
    },

    /// Every allowed cycle failed.
    #[error("{strategy} draw failed after {attempts} attempts")]
    AttemptsExhausted {
        /// Strategy in use.
        strategy: Strategy,
        /// Cycles tried.
        attempts: u32,
    },

    /// The draw finished but broke the assignment invariant.
    #[error("draw produced an invalid assignment: {0}")]
    Invalid(#[from] ValidationError),
}

impl AssignError {
    /// Returns true if retrying with a fresh random sequence could succeed.
    ///
    /// Empty and infeasible rosters fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AttemptsExhausted { .. } => true,
            Self::EmptyRoster | Self::Infeasible { .. } | Self::Invalid(_) => false,
        }
    }
}

/// Why a single cycle was abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Stalled {
    /// Participant whose turn could not be completed.
    pub participant: String,
}

/// Hat and roster state at the start of a cycle.
struct CycleSnapshot {
    hat: HatSnapshot,
    giftees: Vec<Option<String>>,
}

impl CycleSnapshot {
    fn capture(hat: &Hat, roster: &Roster) -> Self {
        Self {
            hat: hat.snapshot(),
            giftees: roster.iter().map(|p| p.giftee().map(str::to_string)).collect(),
        }
    }

    fn rollback(&self, hat: &mut Hat, roster: &mut Roster) {
        hat.rollback(&self.hat);
        for (p, giftee) in roster.participants_mut().iter_mut().zip(&self.giftees) {
            p.set_giftee(giftee.clone());
        }
    }
}

/// Draws giftees for a roster.
///
/// # Type Parameters
///
/// - `E`: Environment implementation for randomness
pub struct AssignmentEngine<E: Environment> {
    env: E,
    config: AssignConfig,
}

impl<E: Environment> AssignmentEngine<E> {
    /// Create an engine with the given randomness source and configuration.
    pub fn new(env: E, config: AssignConfig) -> Self {
        Self { env, config }
    }

    /// Assign every participant a giftee.
    ///
    /// Any giftees already on the roster are discarded first. On success
    /// every participant has a giftee and the roster passes [`validate`].
    ///
    /// # Errors
    ///
    /// - `EmptyRoster` for an empty roster
    /// - `Infeasible` if no valid assignment exists
    /// - `AttemptsExhausted` if every allowed cycle failed
    ///
    /// On error the roster is left with no giftees.
    pub fn assign(&self, roster: &mut Roster) -> Result<Assignment, AssignError> {
        roster.clear_giftees();

        if roster.is_empty() {
            return Err(AssignError::EmptyRoster);
        }
        if let Some(participant) = matching::unmatchable(roster) {
            tracing::warn!(%participant, "roster has no valid assignment");
            return Err(AssignError::Infeasible { participant: participant.to_string() });
        }

        let strategy = self.config.strategy;
        let max_attempts = self.config.max_attempts.max(1);
        let mut hat = Hat::new(roster.names());
        let snapshot = CycleSnapshot::capture(&hat, roster);

        for attempt in 1..=max_attempts {
            let cycle = match strategy {
                Strategy::Reconcile => reconcile::draw_cycle(roster, &mut hat, &self.env),
                Strategy::Redraw => redraw::draw_cycle(roster, &mut hat, &self.env).map(|()| 0),
            };

            match cycle {
                Ok(swaps) => {
                    if let Err(e) = validate(roster) {
                        snapshot.rollback(&mut hat, roster);
                        return Err(e.into());
                    }
                    tracing::info!(%strategy, attempts = attempt, swaps, "draw complete");
                    return Ok(Assignment { strategy, attempts: attempt, swaps });
                },
                Err(Stalled { participant }) => {
                    tracing::debug!(%strategy, attempt, %participant, "redraw");
                    snapshot.rollback(&mut hat, roster);
                },
            }
        }

        tracing::error!(%strategy, attempts = max_attempts, "draw attempts exhausted");
        Err(AssignError::AttemptsExhausted { strategy, attempts: max_attempts })
    }
}
