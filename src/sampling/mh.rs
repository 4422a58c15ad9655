use anyhow::Result;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{StepOutcome, WalkStats};
use crate::embedding::{Embedding, Induction, ModificationEnumerator, ModificationPolicy, Word};
use crate::graph::HostGraph;
use crate::hooks::ExplorationHooks;

/// Metropolis-Hastings walk over the modification graph.
///
/// A move from `S` to `T` is accepted with probability
/// `min(1, deg(S) / deg(T))`, which makes the walk uniform over the states
/// it can reach when the policy allows moving both ways.
pub struct MhSampler<'g, G: HostGraph, I: Induction> {
    embedding: Embedding<'g, G, I>,
    policy: ModificationPolicy,
    rng: Xoshiro256PlusPlus,
    stats: WalkStats,
}

impl<'g, G: HostGraph, I: Induction> MhSampler<'g, G, I> {
    pub fn new(graph: &'g G, policy: ModificationPolicy, seed: u64) -> Self {
        Self {
            embedding: Embedding::new(graph),
            policy,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            stats: WalkStats::default(),
        }
    }

    /// Sampler whose stream is derived from the partition id, so reruns of
    /// a partition replay the same walk.
    pub fn for_partition(
        graph: &'g G,
        policy: ModificationPolicy,
        seed: u64,
        partition: usize,
    ) -> Self {
        Self::new(graph, policy, seed.wrapping_add(partition as u64))
    }

    pub fn embedding(&self) -> &Embedding<'g, G, I> {
        &self.embedding
    }

    pub fn embedding_mut(&mut self) -> &mut Embedding<'g, G, I> {
        &mut self.embedding
    }

    pub fn policy(&self) -> ModificationPolicy {
        self.policy
    }

    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Restart from a single uniformly drawn word. Returns `false` when the
    /// universe is empty.
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

    /// One proposal. A rejected move restores the word set, not its order:
    /// an undone removal appends the word again, so derived elements may be
    /// laid out differently from before the step.
    pub fn step(&mut self) -> StepOutcome {
        let outcome = self.propose();
        self.stats.record(outcome);
        outcome
    }

    fn propose(&mut self) -> StepOutcome {
        let current =
            ModificationEnumerator::possible_modifications(&mut self.embedding, self.policy);
        let current_degree = current.degree();
        let Some(word) = current.pick(&mut self.rng) else {
            trace!("MH walk stuck at {}, restarting", self.embedding);
            self.embedding.reset();
            return StepOutcome::Restarted;
        };

        let added = !self.embedding.contains(word);
        if added {
            self.embedding.add_word(word);
        } else {
            self.embedding.remove_word(word);
        }

        let candidate_degree =
            ModificationEnumerator::possible_modifications(&mut self.embedding, self.policy)
                .degree();
        let accept = candidate_degree <= current_degree
            || self.rng.gen::<f64>() < current_degree as f64 / candidate_degree as f64;
        if accept {
            return StepOutcome::Accepted;
        }

        if added {
            self.embedding.remove_last_word();
        } else {
            self.embedding.add_word(word);
        }
        StepOutcome::Rejected
    }

    /// Visits the current state, then steps while the hooks allow it.
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
            self.step();
            step += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::VertexInduced;
    use crate::graph::MainGraph;

    #[test]
    fn rejected_moves_restore_the_word_set() {
        let graph = MainGraph::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (1, 4)]);
        let mut sampler: MhSampler<'_, _, VertexInduced> =
            MhSampler::new(&graph, ModificationPolicy::Both, 9);
        assert!(sampler.seed_random_word());
        for _ in 0..500 {
            let mut before = sampler.embedding().words().to_vec();
            let mut edges_before = sampler.embedding().edges().to_vec();
            let outcome = sampler.step();
            if outcome == StepOutcome::Rejected {
                let mut after = sampler.embedding().words().to_vec();
                let mut edges_after = sampler.embedding().edges().to_vec();
                before.sort_unstable();
                after.sort_unstable();
                edges_before.sort_unstable();
                edges_after.sort_unstable();
                assert_eq!(before, after);
                assert_eq!(edges_before, edges_after);
            }
        }
        let stats = sampler.stats();
        assert_eq!(stats.steps, 500);
        assert_eq!(stats.accepted + stats.rejected + stats.restarts, 500);
        assert!(stats.accepted > 0);
    }

    #[test]
    fn same_partition_replays_the_walk() {
        let graph = MainGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let walk = |partition| {
            let mut sampler: MhSampler<'_, _, VertexInduced> =
                MhSampler::for_partition(&graph, ModificationPolicy::Both, 7, partition);
            sampler.seed_random_word();
            (0..100)
                .map(|_| {
                    sampler.step();
                    sampler.embedding().words().to_vec()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(walk(3), walk(3));
    }

    #[test]
    fn lone_vertex_is_contracted_at_max_size() {
        let graph = MainGraph::from_edges(1, &[]);
        let policy = ModificationPolicy::Bounded { max_size: 1 };
        let mut sampler: MhSampler<'_, _, VertexInduced> = MhSampler::new(&graph, policy, 1);
        assert!(sampler.seed_random_word());
        // at max size the lone vertex can only be contracted
        assert_eq!(sampler.step(), StepOutcome::Accepted);
        assert!(sampler.embedding().is_empty());
    }
}
