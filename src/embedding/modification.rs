use rand::Rng;

use super::{Embedding, Extensions, Induction, Word};
use crate::graph::HostGraph;

/// Which moves a walk may take from an embedding of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationPolicy {
    Extensions,
    Contractions,
    Both,
    /// Grow below `max_size`, move both ways at `max_size`, shrink above it.
    Bounded { max_size: usize },
}

impl ModificationPolicy {
    fn directions(self, size: usize) -> (bool, bool) {
        match self {
            Self::Extensions => (true, false),
            Self::Contractions => (false, true),
            Self::Both => (true, true),
            Self::Bounded { max_size } => {
                if size < max_size {
                    (true, false)
                } else if size == max_size {
                    (true, true)
                } else {
                    (false, true)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modification {
    Word(Word),
    /// Stands for every word of the universe; only offered by empty embeddings.
    AnyWord,
}

/// Moves available from one embedding state.
#[derive(Debug, Clone, Default)]
pub struct ModificationSet {
    entries: Vec<Modification>,
    universe: usize,
}

impl ModificationSet {
    pub fn entries(&self) -> &[Modification] {
        &self.entries
    }

    /// Number of neighbouring states; the wildcard counts once per word.
    pub fn degree(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                Modification::Word(_) => 1,
                Modification::AnyWord => self.universe,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.degree() == 0
    }

    /// Draws a word uniformly over all neighbouring states.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Word> {
        let degree = self.degree();
        if degree == 0 {
            return None;
        }
        let mut slot = rng.gen_range(0..degree);
        for entry in &self.entries {
            match *entry {
                Modification::Word(word) => {
                    if slot == 0 {
                        return Some(word);
                    }
                    slot -= 1;
                }
                Modification::AnyWord => {
                    if slot < self.universe {
                        return Some(slot as Word);
                    }
                    slot -= self.universe;
                }
            }
        }
        None
    }
}

pub struct ModificationEnumerator;

impl ModificationEnumerator {
    pub fn possible_modifications<G: HostGraph, I: Induction>(
        embedding: &mut Embedding<'_, G, I>,
        policy: ModificationPolicy,
    ) -> ModificationSet {
        let (extend, contract) = policy.directions(embedding.num_words());
        let mut set = ModificationSet::default();
        if extend {
            match embedding.extensions() {
                Extensions::Universe(0) => {}
                Extensions::Universe(n) => {
                    set.entries.push(Modification::AnyWord);
                    set.universe = n;
                }
                Extensions::Words(words) => {
                    set.entries.extend(words.iter().map(|&word| Modification::Word(word)));
                }
            }
        }
        if contract {
            set.entries.extend(
                embedding
                    .contractions()
                    .iter()
                    .map(|&word| Modification::Word(word)),
            );
        }
        set
    }
}
