//! Participants and the roster they are drawn from.
//!
//! A [`Roster`] is built once from configuration and iterated in a fixed
//! order. Each [`Participant`] carries its own exclusion list and an optional
//! giftee that the engine fills in exactly once per successful draw.

use std::collections::HashSet;

use thiserror::Error;

/// Errors from building a roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Participant name is empty or whitespace.
    #[error("participant name must not be empty")]
    EmptyName,

    /// Two participants share a name.
    #[error("duplicate participant: {name}")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },
}

/// A single member of the gift exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    name: String,
    address: String,
    /// Forbidden giftees, deduplicated, oldest first.
    forbidden: Vec<String>,
    giftee: Option<String>,
}

impl Participant {
    /// Create a participant with no giftee.
    ///
    /// Duplicate forbidden names are collapsed, keeping the first occurrence.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        forbidden: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut seen = HashSet::new();
        let forbidden = forbidden
            .into_iter()
            .map(Into::<String>::into)
            .filter(|f| seen.insert(f.clone()))
            .collect();

        Self { name: name.into(), address: address.into(), forbidden, giftee: None }
    }

    /// Participant's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact address for the notification.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Explicitly forbidden names, oldest first. Does not include self.
    pub fn forbidden(&self) -> &[String] {
        &self.forbidden
    }

    /// Assigned giftee, if the draw has resolved this participant.
    pub fn giftee(&self) -> Option<&str> {
        self.giftee.as_deref()
    }

    /// True if `name` appears in the explicit forbidden list.
    pub fn forbids(&self, name: &str) -> bool {
        self.forbidden.iter().any(|f| f == name)
    }

    /// True if this participant must not draw `name`: self or forbidden.
    pub fn is_forbidden(&self, name: &str) -> bool {
        name == self.name || self.forbids(name)
    }

    /// True if this participant may draw `name`.
    pub fn allows(&self, name: &str) -> bool {
        !self.is_forbidden(name)
    }

    pub(crate) fn set_giftee(&mut self, giftee: Option<String>) {
        self.giftee = giftee;
    }

    pub(crate) fn take_giftee(&mut self) -> Option<String> {
        self.giftee.take()
    }
}

/// Ordered collection of participants with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Build a roster, rejecting empty and duplicate names.
    ///
    /// Forbidden names that refer to nobody in the roster are allowed; they
    /// usually name someone sitting this year out.
    pub fn new(participants: Vec<Participant>) -> Result<Self, RosterError> {
        let mut names = HashSet::with_capacity(participants.len());
        for p in &participants {
            if p.name.trim().is_empty() {
                return Err(RosterError::EmptyName);
            }
            if !names.insert(p.name.as_str()) {
                return Err(RosterError::DuplicateName { name: p.name.clone() });
            }
        }

        for p in &participants {
            for f in p.forbidden.iter().filter(|f| !names.contains(f.as_str())) {
                tracing::debug!(
                    participant = %p.name,
                    forbidden = %f,
                    "forbidden name not in roster"
                );
            }
        }

        Ok(Self { participants })
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// True if the roster has no participants.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participants in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Look up a participant by name.
    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Participant names in draw order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.participants.iter().map(Participant::name)
    }

    /// True if every participant has a giftee.
    pub fn is_resolved(&self) -> bool {
        self.participants.iter().all(|p| p.giftee.is_some())
    }

    /// Names of participants without a giftee.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.participants.iter().filter(|p| p.giftee.is_none()).map(Participant::name)
    }

    /// `(participant, giftee)` pairs for resolved participants.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.participants.iter().filter_map(|p| p.giftee().map(|g| (p.name(), g)))
    }

    /// Clear every giftee.
    pub fn clear_giftees(&mut self) {
        for p in &mut self.participants {
            p.giftee = None;
        }
    }

    pub(crate) fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub(crate) fn participants_mut(&mut self) -> &mut [Participant] {
        &mut self.participants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Participant {
        Participant::new("Alice", "alice@example.com", ["Bob", "Bob", "Carol"])
    }

    #[test]
    fn forbidden_is_deduplicated_in_order() {
        assert_eq!(alice().forbidden(), ["Bob", "Carol"]);
    }

    #[test]
    fn self_is_always_forbidden() {
        let p = Participant::new("Alice", "a@x", Vec::<String>::new());
        assert!(p.is_forbidden("Alice"));
        assert!(!p.forbids("Alice"));
        assert!(p.allows("Bob"));
    }

    #[test]
    fn new_participant_has_no_giftee() {
        assert_eq!(alice().giftee(), None);
    }

    #[test]
    fn roster_rejects_duplicates() {
        let result = Roster::new(vec![alice(), alice()]);
        assert_eq!(result, Err(RosterError::DuplicateName { name: "Alice".to_string() }));
    }

    #[test]
    fn roster_rejects_empty_name() {
        let result = Roster::new(vec![Participant::new("  ", "x@x", Vec::<String>::new())]);
        assert_eq!(result, Err(RosterError::EmptyName));
    }

    #[test]
    fn roster_keeps_order_and_tracks_resolution() {
        let mut roster = Roster::new(vec![
            alice(),
            Participant::new("Bob", "bob@example.com", Vec::<String>::new()),
        ])
        .unwrap();

        assert_eq!(roster.names().collect::<Vec<_>>(), ["Alice", "Bob"]);
        assert!(!roster.is_resolved());
        assert_eq!(roster.unresolved().count(), 2);

        roster.participants_mut()[1].set_giftee(Some("Alice".to_string()));
        assert_eq!(roster.unresolved().collect::<Vec<_>>(), ["Alice"]);
        assert_eq!(roster.pairs().collect::<Vec<_>>(), [("Bob", "Alice")]);

        roster.clear_giftees();
        assert_eq!(roster.pairs().count(), 0);
    }

    #[test]
    fn unknown_forbidden_names_are_allowed() {
        let roster = Roster::new(vec![Participant::new("Alice", "a@x", ["Zed"])]);
        assert!(roster.is_ok());
    }
}
