//! Compact roster descriptions generated by proptest and the fuzzer.

use arbitrary::Arbitrary;

/// Largest roster the model will search exhaustively.
pub const MAX_PARTICIPANTS: usize = 7;

/// A roster as raw bytes: a size hint and a list of excluded pairs.
///
/// Indices are reduced modulo the participant count, so every value of this
/// type describes a usable roster.
#[derive(Debug, Clone, Arbitrary)]
pub struct RosterSpec {
    /// Participant count hint (mapped to `1..=MAX_PARTICIPANTS`).
    pub size: u8,
    /// `(giver, giftee)` pairs the giver must not draw.
    pub exclusions: Vec<(u8, u8)>,
}

impl RosterSpec {
    /// Number of participants this spec describes.
    pub fn participants(&self) -> usize {
        1 + usize::from(self.size) % MAX_PARTICIPANTS
    }

    /// Exclusions as in-range index pairs.
    pub fn excluded_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.participants();
        self.exclusions.iter().map(move |&(giver, giftee)| {
            (usize::from(giver) % n, usize::from(giftee) % n)
        })
    }
}
