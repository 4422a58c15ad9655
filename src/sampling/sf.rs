use anyhow::{Result, bail};
use log::trace;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{StepOutcome, WalkStats, random_seed};
use crate::embedding::{Embedding, Extensions, Induction, Word};
use crate::graph::HostGraph;
use crate::hooks::ExplorationHooks;

/// Weighted flood-and-drain walk with a bounded embedding size.
///
/// Every step adds an extension word drawn in proportion to its weight
/// (see [`extension_weights`]); once the size exceeds `max_size` a
/// contractible word other than the new one is removed uniformly at random.
/// At the size bound the walk is a simple random walk whose stationary
/// probability of a state is proportional to its [`local_degree`].
pub struct SfSampler<'g, G: HostGraph, I: Induction> {
    embedding: Embedding<'g, G, I>,
    max_size: usize,
    rng: Xoshiro256PlusPlus,
    stats: WalkStats,
}

impl<'g, G: HostGraph, I: Induction> SfSampler<'g, G, I> {
    /// Sampler seeded from the wall clock.
    pub fn new(graph: &'g G, max_size: usize) -> Self {
        Self::with_seed(graph, max_size, random_seed())
    }

    pub fn with_seed(graph: &'g G, max_size: usize, seed: u64) -> Self {
        Self {
            embedding: Embedding::new(graph),
            max_size: max_size.max(1),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            stats: WalkStats::default(),
        }
    }

    pub fn embedding(&self) -> &Embedding<'g, G, I> {
        &self.embedding
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    pub fn seed_random_word(&mut self) -> bool {
        let universe = self.embedding.universe_size();
        self.embedding.reset();
        if universe == 0 {
            return false;
        }
        let word = self.rng.gen_range(0..universe) as Word;
        self.embedding.add_word(word);
        true
    }

    pub fn step(&mut self) -> Result<StepOutcome> {
        let Some(word) = propose_extension(&mut self.embedding, &mut self.rng) else {
            trace!("SF walk stuck at {}, restarting", self.embedding);
            self.embedding.reset();
            self.stats.record(StepOutcome::Restarted);
            return Ok(StepOutcome::Restarted);
        };
        self.embedding.add_word(word);

        let outcome = if self.embedding.num_words() > self.max_size {
            drain_one(&mut self.embedding, word, &mut self.rng)?;
            StepOutcome::Drained
        } else {
            StepOutcome::Expanded
        };
        self.stats.record(outcome);
        Ok(outcome)
    }

    pub fn run<H: ExplorationHooks<G, I>>(&mut self, hooks: &mut H) -> Result<()> {
        let mut step = 0;
        loop {
            if hooks.filter(&self.embedding) {
                self.stats.visited += 1;
                hooks.on_visit(&mut self.embedding, step)?;
            }
            if !hooks.should_continue(&self.embedding, step) {
                return Ok(());
            }
            self.step()?;
            step += 1;
        }
    }
}

/// Each extension word paired with the number of words that could be drained
/// after adding it, i.e. `|contractible(S + e) \ {e}|`.
pub fn extension_weights<G: HostGraph, I: Induction>(
    embedding: &mut Embedding<'_, G, I>,
) -> Vec<(Word, usize)> {
    let candidates: Vec<Word> = match embedding.extensions() {
        Extensions::Words(words) => words.iter().copied().collect(),
        Extensions::Universe(_) => return Vec::new(),
    };
    candidates
        .into_iter()
        .map(|word| {
            embedding.add_word(word);
            let weight = embedding
                .contractions()
                .iter()
                .filter(|&&other| other != word)
                .count();
            embedding.remove_last_word();
            (word, weight)
        })
        .collect()
}

/// Number of states one flood-and-drain step can reach from `embedding`.
pub fn local_degree<G: HostGraph, I: Induction>(embedding: &mut Embedding<'_, G, I>) -> usize {
    extension_weights(embedding)
        .into_iter()
        .map(|(_, weight)| weight)
        .sum()
}

/// Draws the next word to add: uniform over the universe for an empty
/// embedding, weighted by [`extension_weights`] otherwise.
pub fn propose_extension<G: HostGraph, I: Induction, R: Rng + ?Sized>(
    embedding: &mut Embedding<'_, G, I>,
    rng: &mut R,
) -> Option<Word> {
    if embedding.is_empty() {
        let universe = embedding.universe_size();
        return (universe > 0).then(|| rng.gen_range(0..universe) as Word);
    }

    let weights = extension_weights(embedding);
    let total: usize = weights.iter().map(|(_, weight)| weight).sum();
    if total == 0 {
        return None;
    }
    let mut slot = rng.gen_range(0..total);
    for (word, weight) in weights {
        if slot < weight {
            return Some(word);
        }
        slot -= weight;
    }
    None
}

/// Removes a uniformly drawn contractible word other than `protected`.
pub fn drain_one<G: HostGraph, I: Induction, R: Rng + ?Sized>(
    embedding: &mut Embedding<'_, G, I>,
    protected: Word,
    rng: &mut R,
) -> Result<Word> {
    let candidates: Vec<Word> = embedding
        .contractions()
        .iter()
        .copied()
        .filter(|&word| word != protected)
        .collect();
    if candidates.is_empty() {
        bail!("no contractible word to drain from embedding [{}]", embedding);
    }
    let word = candidates[rng.gen_range(0..candidates.len())];
    embedding.remove_word(word);
    Ok(word)
}
