//! The hat: names still available to be drawn.
//!
//! The hat is owned by a single assignment run. Pruning is always paired
//! with a restore so that after each participant's turn exactly one name has
//! left the hat for good.

use crate::{env::Environment, roster::Participant};

/// Pool of names not yet finally assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hat {
    names: Vec<String>,
}

/// Restore point for a [`Hat`].
#[derive(Debug, Clone)]
pub struct HatSnapshot(Vec<String>);

impl Hat {
    /// Create a hat holding exactly `names`.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { names: names.into_iter().map(Into::<String>::into).collect() }
    }

    /// Number of names left.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if nothing is left to draw.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True if `name` is still in the hat.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names left, in no particular order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Remove `name` if present. Returns whether it was present.
    pub fn take(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(i) => {
                self.names.swap_remove(i);
                true
            },
            None => false,
        }
    }

    /// Temporarily remove every name `participant` may not draw.
    ///
    /// Returns the names actually removed, in removal order: own name first,
    /// then the forbidden list in its stored order. Names already drawn by
    /// earlier participants are not in the hat and are skipped.
    pub fn prune(&mut self, participant: &Participant) -> Vec<String> {
        std::iter::once(participant.name())
            .chain(participant.forbidden().iter().map(String::as_str))
            .filter(|name| self.take(name))
            .map(str::to_string)
            .collect()
    }

    /// Put names back into the hat.
    pub fn restore(&mut self, names: impl IntoIterator<Item = String>) {
        self.names.extend(names);
    }

    /// Draw one name uniformly at random and remove it.
    pub fn draw<E: Environment>(&mut self, env: &E) -> Option<String> {
        if self.names.is_empty() {
            return None;
        }
        let index = env.random_below(self.names.len());
        Some(self.names.swap_remove(index))
    }

    /// Capture the current contents.
    pub fn snapshot(&self) -> HatSnapshot {
        HatSnapshot(self.names.clone())
    }

    /// Reset to a previously captured state.
    pub fn rollback(&mut self, snapshot: &HatSnapshot) {
        self.names.clone_from(&snapshot.0);
    }
}
