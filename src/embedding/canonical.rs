use super::{Induction, Word};
use crate::graph::HostGraph;

/// Growth-order rule that admits exactly one insertion order per connected
/// word set, so exhaustive enumeration visits every embedding once.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalityChecker;

impl CanonicalityChecker {
    /// Whether appending `candidate` to `words` keeps the order canonical.
    ///
    /// The candidate may not precede the first word, must touch some earlier
    /// word, and every word after its first neighbour must be smaller than it.
    pub fn is_canonical_with_word<G: HostGraph, I: Induction>(
        graph: &G,
        words: &[Word],
        candidate: Word,
    ) -> bool {
        let Some(&first) = words.first() else {
            return true;
        };
        if candidate < first {
            return false;
        }
        let Some(anchor) = words
            .iter()
            .position(|&word| I::are_words_adjacent(graph, word, candidate))
        else {
            return false;
        };
        words[anchor + 1..].iter().all(|&word| word < candidate)
    }
}
