//! Next-cycle exclusion lists.
//!
//! After a successful draw, each participant's forbidden list is extended
//! with the giftee they just drew so the same pairing is excluded next time.
//! Old entries fall off the front once the history cap is reached.

use std::num::NonZeroUsize;

use thiserror::Error;

use crate::{
    roster::Roster,
    validate::{ResolvedRoster, ValidationError},
};

/// How many past exclusions to keep per participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryCap {
    /// Keep everything.
    #[default]
    Unbounded,

    /// Keep at most this many names, including the newly drawn giftee.
    Limit(NonZeroUsize),
}

impl HistoryCap {
    /// `0` means unbounded.
    pub fn from_count(count: usize) -> Self {
        NonZeroUsize::new(count).map_or(Self::Unbounded, Self::Limit)
    }
}

/// Errors from building the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The roster does not hold a complete valid assignment.
    #[error("cannot export an incomplete draw: {0}")]
    Invalid(#[from] ValidationError),
}

/// One participant's configuration for the next draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextCycleEntry {
    /// Participant name.
    pub name: String,
    /// Contact address, carried over unchanged.
    pub address: String,
    /// Updated forbidden list, oldest first, ending with this year's giftee.
    pub forbidden: Vec<String>,
}

/// Build next cycle's entries from a validated draw.
pub fn next_cycle(resolved: ResolvedRoster<'_>, cap: HistoryCap) -> Vec<NextCycleEntry> {
    resolved
        .iter()
        .map(|(p, giftee)| NextCycleEntry {
            name: p.name().to_string(),
            address: p.address().to_string(),
            forbidden: extend_history(p.forbidden(), giftee, cap),
        })
        .collect()
}

/// Validate `roster` and build next cycle's entries.
pub fn next_cycle_for(
    roster: &Roster,
    cap: HistoryCap,
) -> Result<Vec<NextCycleEntry>, ExportError> {
    Ok(next_cycle(ResolvedRoster::new(roster)?, cap))
}

fn extend_history(history: &[String], giftee: &str, cap: HistoryCap) -> Vec<String> {
    let mut kept: Vec<String> = history.iter().filter(|f| *f != giftee).cloned().collect();

    if let HistoryCap::Limit(limit) = cap {
        let keep = limit.get() - 1;
        let excess = kept.len().saturating_sub(keep);
        kept.drain(..excess);
    }

    kept.push(giftee.to_string());
    kept
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::roster::Participant;

    fn cap(n: usize) -> HistoryCap {
        HistoryCap::from_count(n)
    }

    fn history(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn unbounded_appends() {
        let out = extend_history(&history(&["Bob", "Carol"]), "Dave", HistoryCap::Unbounded);
        assert_eq!(out, ["Bob", "Carol", "Dave"]);
    }

    #[test]
    fn limit_drops_oldest() {
        let out = extend_history(&history(&["Bob", "Carol", "Dave"]), "Erin", cap(3));
        assert_eq!(out, ["Carol", "Dave", "Erin"]);
    }

    #[test]
    fn limit_of_one_keeps_only_new_giftee() {
        let out = extend_history(&history(&["Bob", "Carol"]), "Dave", cap(1));
        assert_eq!(out, ["Dave"]);
    }

    #[test]
    fn repeated_giftee_moves_to_end() {
        let out = extend_history(&history(&["Bob", "Carol"]), "Bob", cap(5));
        assert_eq!(out, ["Carol", "Bob"]);
    }

    #[test]
    fn zero_means_unbounded() {
        assert_eq!(cap(0), HistoryCap::Unbounded);
    }

    #[test]
    fn export_requires_complete_draw() {
        let roster = Roster::new(vec![
            Participant::new("Alice", "a@x", Vec::<String>::new()),
            Participant::new("Bob", "b@x", Vec::<String>::new()),
        ])
        .unwrap();

        let result = next_cycle_for(&roster, HistoryCap::Unbounded);
        assert!(matches!(result, Err(ExportError::Invalid(ValidationError::Unresolved { .. }))));
    }

    #[test]
    fn export_carries_address_and_appends_giftee() {
        let mut roster = Roster::new(vec![
            Participant::new("Alice", "alice@example.com", ["Carol"]),
            Participant::new("Bob", "bob@example.com", Vec::<String>::new()),
            Participant::new("Carol", "carol@example.com", Vec::<String>::new()),
        ])
        .unwrap();
        let giftees = ["Bob", "Carol", "Alice"];
        for (p, g) in roster.participants_mut().iter_mut().zip(giftees) {
            p.set_giftee(Some(g.to_string()));
        }

        let entries = next_cycle_for(&roster, HistoryCap::Unbounded).unwrap();

        assert_eq!(entries[0], NextCycleEntry {
            name: "Alice".to_string(),
            address: "alice@example.com".to_string(),
            forbidden: history(&["Carol", "Bob"]),
        });
        assert_eq!(entries[2].forbidden, ["Alice"]);
    }

    proptest! {
        #[test]
        fn prop_history_ends_with_giftee_within_cap(
            past in prop::collection::vec("[A-E]", 0..8),
            giftee in "[A-E]",
            limit in 0..6usize
        ) {
            let mut seen = HashSet::new();
            let past: Vec<String> = past.into_iter().filter(|n| seen.insert(n.clone())).collect();

            let out = extend_history(&past, &giftee, cap(limit));

            prop_assert_eq!(out.last(), Some(&giftee));
            prop_assert_eq!(out.iter().filter(|n| **n == giftee).count(), 1);
            if limit > 0 {
                prop_assert!(out.len() <= limit);
            } else {
                prop_assert!(out.len() >= past.len());
            }
        }
    }
}
