//! Feasibility check for a roster's constraint graph.
//!
//! The random strategies only explore the space of assignments; they cannot
//! tell "unlucky" from "impossible". Before drawing, the engine asks this
//! module whether any valid derangement exists at all, using augmenting-path
//! bipartite matching (participants on one side, names on the other, an edge
//! wherever the participant allows the name).

use crate::roster::Roster;

/// Find a complete participant-to-name matching, if one exists.
///
/// Returns `giftee_of[i] = j`, meaning participant `i` (roster order) draws
/// the name of participant `j`. Returns `Err(i)` with the index of the first
/// participant for which no augmenting path exists.
pub fn perfect_matching(roster: &Roster) -> Result<Vec<usize>, usize> {
    let participants = roster.participants();
    let n = participants.len();

    let allowed: Vec<Vec<usize>> = participants
        .iter()
        .map(|p| (0..n).filter(|&j| p.allows(participants[j].name())).collect())
        .collect();

    // drawn_by[j] = participant currently holding name j
    let mut drawn_by: Vec<Option<usize>> = vec![None; n];

    for i in 0..n {
        let mut visited = vec![false; n];
        if !augment(i, &allowed, &mut visited, &mut drawn_by) {
            return Err(i);
        }
    }

    let mut giftee_of = vec![0; n];
    for (j, holder) in drawn_by.iter().enumerate() {
        if let Some(i) = holder {
            giftee_of[*i] = j;
        }
    }
    Ok(giftee_of)
}

/// Name of a participant who cannot be matched, or `None` if the roster
/// admits a valid assignment.
pub fn unmatchable(roster: &Roster) -> Option<&str> {
    perfect_matching(roster).err().and_then(|i| roster.participants().get(i)).map(|p| p.name())
}

/// True if at least one valid assignment exists.
pub fn is_feasible(roster: &Roster) -> bool {
    perfect_matching(roster).is_ok()
}

fn augment(
    i: usize,
    allowed: &[Vec<usize>],
    visited: &mut [bool],
    drawn_by: &mut [Option<usize>],
) -> bool {
    for &j in &allowed[i] {
        if visited[j] {
            continue;
        }
        visited[j] = true;

        let free = match drawn_by[j] {
            None => true,
            Some(holder) => augment(holder, allowed, visited, drawn_by),
        };
        if free {
            drawn_by[j] = Some(i);
            return true;
        }
    }
    false
}
