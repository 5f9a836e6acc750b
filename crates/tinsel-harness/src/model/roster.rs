//! Index-based roster with exhaustive search.

use tinsel_core::{Participant, Roster, RosterError};

use super::spec::RosterSpec;

/// Reference roster: names plus an exclusion table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoster {
    names: Vec<String>,
    /// `excluded[i][j]`: participant `i` must not draw `j`.
    excluded: Vec<Vec<bool>>,
}

impl ModelRoster {
    /// Build the model for `spec`. Participants are named `P0`, `P1`, ...
    pub fn from_spec(spec: &RosterSpec) -> Self {
        let n = spec.participants();
        let mut excluded = vec![vec![false; n]; n];
        for (giver, giftee) in spec.excluded_pairs() {
            excluded[giver][giftee] = true;
        }
        Self { names: (0..n).map(|i| format!("P{i}")).collect(), excluded }
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if there are no participants.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Participant names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True if participant `giver` may draw `giftee`.
    pub fn allows(&self, giver: usize, giftee: usize) -> bool {
        giver != giftee && !self.excluded[giver][giftee]
    }

    /// The real roster this model describes.
    pub fn to_roster(&self) -> Result<Roster, RosterError> {
        let participants = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let forbidden = self.excluded[i]
                    .iter()
                    .enumerate()
                    .filter(|&(_, &excluded)| excluded)
                    .map(|(j, _)| self.names[j].clone());
                let address = format!("{}@example.com", name.to_lowercase());
                Participant::new(name.clone(), address, forbidden)
            })
            .collect();
        Roster::new(participants)
    }

    /// Every valid assignment, as `giftee_of` index vectors.
    pub fn valid_assignments(&self) -> Vec<Vec<usize>> {
        let mut found = Vec::new();
        self.search(&mut Vec::new(), &mut vec![false; self.len()], &mut |a| {
            found.push(a.to_vec());
            true
        });
        found
    }

    /// True if at least one valid assignment exists.
    pub fn is_feasible(&self) -> bool {
        let mut feasible = false;
        self.search(&mut Vec::new(), &mut vec![false; self.len()], &mut |_| {
            feasible = true;
            false
        });
        feasible
    }

    /// Check a drawn roster against the model.
    ///
    /// Returns a description of the first problem found.
    pub fn check(&self, roster: &Roster) -> Result<Vec<usize>, String> {
        let names: Vec<&str> = roster.names().collect();
        if names != self.names {
            return Err(format!("roster names {names:?} differ from model {:?}", self.names));
        }

        let mut giftee_of = Vec::with_capacity(self.len());
        let mut taken = vec![false; self.len()];
        for (i, p) in roster.iter().enumerate() {
            let giftee = p.giftee().ok_or_else(|| format!("{} has no giftee", p.name()))?;
            let j = self
                .names
                .iter()
                .position(|n| n == giftee)
                .ok_or_else(|| format!("{} drew unknown {giftee}", p.name()))?;

            if !self.allows(i, j) {
                return Err(format!("{} may not draw {giftee}", p.name()));
            }
            if std::mem::replace(&mut taken[j], true) {
                return Err(format!("{giftee} drawn twice"));
            }
            giftee_of.push(j);
        }
        Ok(giftee_of)
    }

    // Depth-first over partial assignments; `visit` returns false to stop.
    fn search(
        &self,
        partial: &mut Vec<usize>,
        taken: &mut [bool],
        visit: &mut dyn FnMut(&[usize]) -> bool,
    ) -> bool {
        let giver = partial.len();
        if giver == self.len() {
            return visit(partial);
        }

        for giftee in 0..self.len() {
            if taken[giftee] || !self.allows(giver, giftee) {
                continue;
            }
            taken[giftee] = true;
            partial.push(giftee);
            let keep_going = self.search(partial, taken, visit);
            partial.pop();
            taken[giftee] = false;
            if !keep_going {
                return false;
            }
        }
        true
    }
}
