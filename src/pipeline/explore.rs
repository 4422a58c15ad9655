use anyhow::Result;

use crate::embedding::{Embedding, Extensions, Induction, Word};
use crate::graph::HostGraph;
use crate::hooks::ExplorationHooks;

/// Exhaustive depth-first enumeration of connected embeddings.
///
/// Children are grown only through canonical words, so every connected word
/// set is reached through exactly one insertion order.
pub struct Explorer<'g, G: HostGraph, I: Induction> {
    embedding: Embedding<'g, G, I>,
    visited: usize,
}

impl<'g, G: HostGraph, I: Induction> Explorer<'g, G, I> {
    pub fn new(graph: &'g G) -> Self {
        Self {
            embedding: Embedding::new(graph),
            visited: 0,
        }
    }

    /// Embeddings handed to `on_visit` so far.
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Explores every embedding whose smallest word is `start`.
    pub fn explore_from<H: ExplorationHooks<G, I>>(
        &mut self,
        start: Word,
        hooks: &mut H,
    ) -> Result<()> {
        self.embedding.reset();
        self.embedding.add_word(start);
        let result = self.expand(hooks, 0);
        self.embedding.reset();
        result
    }

    fn expand<H: ExplorationHooks<G, I>>(&mut self, hooks: &mut H, depth: usize) -> Result<()> {
        if !hooks.filter(&self.embedding) {
            return Ok(());
        }
        self.visited += 1;
        hooks.on_visit(&mut self.embedding, depth)?;
        if !hooks.should_continue(&self.embedding, depth) {
            return Ok(());
        }

        let mut candidates: Vec<Word> = match self.embedding.extensions() {
            Extensions::Words(words) => words.iter().copied().collect(),
            Extensions::Universe(_) => Vec::new(),
        };
        candidates.retain(|&word| self.embedding.is_canonical_with_word(word));
        candidates.sort_unstable();

        for word in candidates {
            self.embedding.add_word(word);
            let result = self.expand(hooks, depth + 1);
            self.embedding.remove_last_word();
            result?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::embedding::{EdgeInduced, VertexInduced};
    use crate::graph::MainGraph;

    struct Collect {
        max_size: usize,
        seen: Vec<Vec<Word>>,
    }

    impl<G: HostGraph, I: Induction> ExplorationHooks<G, I> for Collect {
        fn should_continue(&mut self, embedding: &Embedding<'_, G, I>, _step: usize) -> bool {
            embedding.num_words() < self.max_size
        }

        fn on_visit(&mut self, embedding: &mut Embedding<'_, G, I>, _step: usize) -> Result<()> {
            let mut words = embedding.words().to_vec();
            words.sort_unstable();
            self.seen.push(words);
            Ok(())
        }
    }

    fn explore_all<I: Induction>(
        graph: &MainGraph,
        universe: u32,
        max_size: usize,
    ) -> Vec<Vec<Word>> {
        let mut explorer: Explorer<'_, _, I> = Explorer::new(graph);
        let mut hooks = Collect {
            max_size,
            seen: Vec::new(),
        };
        for start in 0..universe {
            explorer.explore_from(start, &mut hooks).unwrap();
        }
        hooks.seen
    }

    #[test]
    fn every_connected_vertex_set_once() {
        // 4-cycle with chord 0-2
        let graph = MainGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        let seen = explore_all::<VertexInduced>(&graph, 4, 4);
        let unique: BTreeSet<_> = seen.iter().cloned().collect();
        assert_eq!(seen.len(), unique.len());
        // 4 singles, 5 edges, 4 triples (all connected), 1 full set
        assert_eq!(seen.len(), 14);
    }

    #[test]
    fn every_connected_edge_set_once() {
        let graph = MainGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let seen = explore_all::<EdgeInduced>(&graph, 4, 2);
        let unique: BTreeSet<_> = seen.iter().cloned().collect();
        assert_eq!(seen.len(), unique.len());
        // 4 single edges and 4 adjacent pairs
        assert_eq!(seen.len(), 8);
    }
}
