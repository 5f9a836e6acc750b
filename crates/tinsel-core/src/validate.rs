//! Post-draw validation.
//!
//! A completed roster must be a derangement with exclusions: every name used
//! exactly once as a giftee, nobody drawing themselves, nobody drawing a
//! forbidden name. [`ResolvedRoster`] is the proof that this check passed;
//! anything that acts on the draw (notification, export) takes one.

use std::collections::HashSet;

use thiserror::Error;

use crate::roster::{Participant, Roster};

/// Ways a completed roster can violate the assignment invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Participant has no giftee.
    #[error("{participant} has no giftee")]
    Unresolved {
        /// Participant without a giftee.
        participant: String,
    },

    /// Participant drew themselves.
    #[error("{participant} drew themselves")]
    SelfAssigned {
        /// Offending participant.
        participant: String,
    },

    /// Participant drew a forbidden name.
    #[error("{participant} drew forbidden name {giftee}")]
    Forbidden {
        /// Offending participant.
        participant: String,
        /// The forbidden giftee.
        giftee: String,
    },

    /// Giftee is not a member of the roster.
    #[error("{participant} drew unknown name {giftee}")]
    UnknownGiftee {
        /// Offending participant.
        participant: String,
        /// The unknown giftee.
        giftee: String,
    },

    /// Two participants drew the same name.
    #[error("{giftee} was drawn more than once")]
    DuplicateGiftee {
        /// Name drawn twice.
        giftee: String,
    },
}

/// Check that `roster` holds a complete, valid assignment.
///
/// Reports the first violation in roster order.
pub fn validate(roster: &Roster) -> Result<(), ValidationError> {
    let names: HashSet<&str> = roster.names().collect();
    let mut drawn = HashSet::with_capacity(roster.len());

    for p in roster.iter() {
        let giftee = p
            .giftee()
            .ok_or_else(|| ValidationError::Unresolved { participant: p.name().to_string() })?;

        if giftee == p.name() {
            return Err(ValidationError::SelfAssigned { participant: p.name().to_string() });
        }
        if p.forbids(giftee) {
            return Err(ValidationError::Forbidden {
                participant: p.name().to_string(),
                giftee: giftee.to_string(),
            });
        }
        if !names.contains(giftee) {
            return Err(ValidationError::UnknownGiftee {
                participant: p.name().to_string(),
                giftee: giftee.to_string(),
            });
        }
        if !drawn.insert(giftee) {
            return Err(ValidationError::DuplicateGiftee { giftee: giftee.to_string() });
        }
    }

    Ok(())
}

/// A roster whose assignment has been validated.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRoster<'a> {
    roster: &'a Roster,
}

impl<'a> ResolvedRoster<'a> {
    /// Validate `roster` and wrap it.
    pub fn new(roster: &'a Roster) -> Result<Self, ValidationError> {
        validate(roster)?;
        Ok(Self { roster })
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    /// True if the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Participants with their giftee, in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Participant, &'a str)> + 'a {
        self.roster.iter().filter_map(|p| p.giftee().map(|g| (p, g)))
    }

    /// The underlying roster.
    pub fn roster(&self) -> &'a Roster {
        self.roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with(giftees: &[(&str, &[&str], Option<&str>)]) -> Roster {
        let mut roster = Roster::new(
            giftees
                .iter()
                .map(|(name, forbidden, _)| {
                    Participant::new(*name, "x@x", forbidden.iter().copied())
                })
                .collect(),
        )
        .unwrap();
        for (p, (_, _, giftee)) in roster.participants_mut().iter_mut().zip(giftees) {
            p.set_giftee(giftee.map(str::to_string));
        }
        roster
    }

    #[test]
    fn accepts_three_cycle() {
        let roster = roster_with(&[
            ("Alice", &[], Some("Bob")),
            ("Bob", &[], Some("Carol")),
            ("Carol", &[], Some("Alice")),
        ]);
        assert_eq!(validate(&roster), Ok(()));

        let resolved = ResolvedRoster::new(&roster).unwrap();
        let pairs: Vec<_> = resolved.iter().map(|(p, g)| (p.name(), g)).collect();
        assert_eq!(pairs, [("Alice", "Bob"), ("Bob", "Carol"), ("Carol", "Alice")]);
    }

    #[test]
    fn rejects_unresolved() {
        let roster = roster_with(&[("Alice", &[], Some("Bob")), ("Bob", &[], None)]);
        assert_eq!(
            validate(&roster),
            Err(ValidationError::Unresolved { participant: "Bob".to_string() })
        );
        assert!(ResolvedRoster::new(&roster).is_err());
    }

    #[test]
    fn rejects_self_assignment() {
        let roster = roster_with(&[("Alice", &[], Some("Alice")), ("Bob", &[], Some("Bob"))]);
        assert_eq!(
            validate(&roster),
            Err(ValidationError::SelfAssigned { participant: "Alice".to_string() })
        );
    }

    #[test]
    fn rejects_forbidden() {
        let roster =
            roster_with(&[("Alice", &["Bob"], Some("Bob")), ("Bob", &[], Some("Alice"))]);
        assert_eq!(
            validate(&roster),
            Err(ValidationError::Forbidden {
                participant: "Alice".to_string(),
                giftee: "Bob".to_string()
            })
        );
    }

    #[test]
    fn rejects_duplicates() {
        let roster = roster_with(&[
            ("Alice", &[], Some("Carol")),
            ("Bob", &[], Some("Carol")),
            ("Carol", &[], Some("Alice")),
        ]);
        assert_eq!(
            validate(&roster),
            Err(ValidationError::DuplicateGiftee { giftee: "Carol".to_string() })
        );
    }

    #[test]
    fn rejects_unknown() {
        let roster = roster_with(&[("Alice", &[], Some("Zed")), ("Bob", &[], Some("Alice"))]);
        assert_eq!(
            validate(&roster),
            Err(ValidationError::UnknownGiftee {
                participant: "Alice".to_string(),
                giftee: "Zed".to_string()
            })
        );
    }

    #[test]
    fn error_display() {
        let err = ValidationError::Forbidden {
            participant: "Alice".to_string(),
            giftee: "Bob".to_string(),
        };
        assert_eq!(err.to_string(), "Alice drew forbidden name Bob");
    }
}
