//! Prune-and-draw with swap reconciliation.
//!
//! For each participant in roster order:
//!
//! 1. Prune their own name and their forbidden names from the hat, recording
//!    which names were actually present.
//! 2. Draw uniformly from whatever is left.
//! 3. If nothing is left, take the last pruned name as a candidate and hand
//!    it to the first earlier participant who can accept it and whose own
//!    giftee this participant may take.
//! 4. Put every pruned name back except the one that left the hat.

use super::Stalled;
use crate::{
    env::Environment,
    hat::Hat,
    roster::{Participant, Roster},
};

/// Run one full cycle. Returns the number of swaps performed.
pub(super) fn draw_cycle<E: Environment>(
    roster: &mut Roster,
    hat: &mut Hat,
    env: &E,
) -> Result<usize, Stalled> {
    let participants = roster.participants_mut();
    let mut swaps = 0;

    for i in 0..participants.len() {
        let (assigned, rest) = participants.split_at_mut(i);
        let current = &mut rest[0];
        let before = hat.len();

        let mut pruned = hat.prune(current);
        let giftee = match hat.draw(env) {
            Some(drawn) => drawn,
            None => {
                let swapped = reconcile(current, assigned, &mut pruned);
                match swapped {
                    Some(giftee) => {
                        swaps += 1;
                        giftee
                    },
                    None => {
                        hat.restore(pruned);
                        return Err(Stalled { participant: current.name().to_string() });
                    },
                }
            },
        };

        hat.restore(pruned);
        debug_assert_eq!(hat.len() + 1, before, "each turn removes exactly one name");
        current.set_giftee(Some(giftee));
    }

    Ok(swaps)
}

/// Swap the last pruned name with an earlier participant's giftee.
///
/// On success the candidate is removed from `pruned` (it leaves the hat for
/// good) and the earlier participant's former giftee is returned for
/// `current`.
fn reconcile(
    current: &Participant,
    assigned: &mut [Participant],
    pruned: &mut Vec<String>,
) -> Option<String> {
    let candidate = pruned.last()?;

    let partner = assigned.iter().position(|other| {
        !current.forbids(other.name())
            && other.allows(candidate)
            && other.giftee().is_some_and(|g| current.allows(g))
    })?;

    let candidate = pruned.pop()?;
    let other = &mut assigned[partner];
    tracing::debug!(participant = %current.name(), partner = %other.name(), "reconciled by swap");

    let former = other.take_giftee();
    other.set_giftee(Some(candidate));
    former
}
