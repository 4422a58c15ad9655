//! Hook implementations behind each mining task.

use anyhow::Result;
use indexmap::IndexMap;

use crate::aggregation::{AggregationSink, AggregationStorage, SupportStorage};
use crate::embedding::{Embedding, Induction, Word};
use crate::graph::HostGraph;
use crate::hooks::ExplorationHooks;
use crate::pattern::CanonicalLabeler;
use crate::sampling::GroupFactorEstimator;

/// Exhaustive motif counting: grow to `max_size`, count each pattern once
/// per embedding.
pub struct MotifCounting<'l, L: CanonicalLabeler> {
    labeler: &'l L,
    max_size: usize,
    storage: AggregationStorage,
    reported: usize,
}

impl<'l, L: CanonicalLabeler> MotifCounting<'l, L> {
    pub fn new(labeler: &'l L, max_size: usize) -> Self {
        Self {
            labeler,
            max_size,
            storage: AggregationStorage::new(),
            reported: 0,
        }
    }

    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn into_storage(self) -> AggregationStorage {
        self.storage
    }
}

impl<G: HostGraph, I: Induction, L: CanonicalLabeler> ExplorationHooks<G, I>
    for MotifCounting<'_, L>
{
    fn should_continue(&mut self, embedding: &Embedding<'_, G, I>, _step: usize) -> bool {
        embedding.num_words() < self.max_size
    }

    fn on_visit(&mut self, embedding: &mut Embedding<'_, G, I>, _step: usize) -> Result<()> {
        if embedding.num_words() == self.max_size {
            let pattern = embedding.pattern(self.labeler)?.clone();
            self.storage.report(pattern, 1.0)?;
            self.reported += 1;
        }
        Ok(())
    }
}

/// Motif mining where a pattern's support is the number of classes its
/// embeddings form when embeddings sharing a host edge are joined.
pub struct EdgeClassSupport<'l, L: CanonicalLabeler> {
    labeler: &'l L,
    max_size: usize,
    supports: SupportStorage,
    reported: usize,
}

impl<'l, L: CanonicalLabeler> EdgeClassSupport<'l, L> {
    pub fn new(labeler: &'l L, max_size: usize) -> Self {
        Self {
            labeler,
            max_size,
            supports: SupportStorage::new(),
            reported: 0,
        }
    }

    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn into_supports(self) -> SupportStorage {
        self.supports
    }
}

impl<G: HostGraph, I: Induction, L: CanonicalLabeler> ExplorationHooks<G, I>
    for EdgeClassSupport<'_, L>
{
    fn should_continue(&mut self, embedding: &Embedding<'_, G, I>, _step: usize) -> bool {
        embedding.num_words() < self.max_size
    }

    fn on_visit(&mut self, embedding: &mut Embedding<'_, G, I>, _step: usize) -> Result<()> {
        if embedding.num_words() == self.max_size {
            let pattern = embedding.pattern(self.labeler)?.clone();
            self.supports.report(pattern, embedding.edges().iter().copied());
            self.reported += 1;
        }
        Ok(())
    }
}

/// Vertex sets of size `max_size` missing at most `max_missing_edges`
/// vertex pairs from a clique.
pub struct DenseSubgraphs {
    max_size: usize,
    max_missing_edges: usize,
    outputs: Vec<Vec<Word>>,
}

impl DenseSubgraphs {
    pub fn new(max_size: usize, max_missing_edges: usize) -> Self {
        Self {
            max_size,
            max_missing_edges,
            outputs: Vec::new(),
        }
    }

    pub fn into_outputs(self) -> Vec<Vec<Word>> {
        self.outputs
    }
}

/// Vertex pairs of the embedding that are not adjacent in the host graph.
pub fn missing_edges<G: HostGraph, I: Induction>(embedding: &Embedding<'_, G, I>) -> usize {
    let vertices = embedding.vertices();
    let graph = embedding.graph();
    let mut missing = 0;
    for (idx, &a) in vertices.iter().enumerate() {
        for &b in &vertices[idx + 1..] {
            if !graph.is_vertex_adjacent(a, b) {
                missing += 1;
            }
        }
    }
    missing
}

impl<G: HostGraph, I: Induction> ExplorationHooks<G, I> for DenseSubgraphs {
    fn should_continue(&mut self, embedding: &Embedding<'_, G, I>, _step: usize) -> bool {
        embedding.num_words() < self.max_size
    }

    // Adding a vertex never removes a missing pair, so pruning here is safe.
    fn filter(&mut self, embedding: &Embedding<'_, G, I>) -> bool {
        missing_edges(embedding) <= self.max_missing_edges
    }

    fn on_visit(&mut self, embedding: &mut Embedding<'_, G, I>, _step: usize) -> Result<()> {
        if embedding.num_words() == self.max_size {
            let mut words = embedding.words().to_vec();
            words.sort_unstable();
            self.outputs.push(words);
        }
        Ok(())
    }
}

/// How a sampled embedding is weighted when reported.
#[derive(Debug, Clone, Copy)]
pub enum SampleWeight {
    Unit,
    GroupFactor(GroupFactorEstimator),
}

/// Reporting policy shared by the walk tasks: keep walking while
/// `step < max_step`, report embeddings of size `max_size` from `agg_step` on.
pub struct WalkSampling<'l, L: CanonicalLabeler> {
    labeler: &'l L,
    max_step: usize,
    agg_step: usize,
    max_size: usize,
    weight: SampleWeight,
    majority_only: bool,
    storage: AggregationStorage,
    reported: usize,
}

impl<'l, L: CanonicalLabeler> WalkSampling<'l, L> {
    pub fn new(
        labeler: &'l L,
        max_step: usize,
        agg_step: usize,
        max_size: usize,
        weight: SampleWeight,
    ) -> Self {
        Self {
            labeler,
            max_step,
            agg_step,
            max_size,
            weight,
            majority_only: false,
            storage: AggregationStorage::new(),
            reported: 0,
        }
    }

    /// Only report embeddings in which one vertex label covers more than half
    /// of the vertices.
    pub fn majority_only(mut self) -> Self {
        self.majority_only = true;
        self
    }

    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn into_storage(self) -> AggregationStorage {
        self.storage
    }
}

pub fn has_majority_label<G: HostGraph, I: Induction>(embedding: &Embedding<'_, G, I>) -> bool {
    let vertices = embedding.vertices();
    let graph = embedding.graph();
    let mut counts: IndexMap<u32, usize> = IndexMap::new();
    for &vertex in vertices {
        *counts.entry(graph.vertex_label(vertex)).or_insert(0) += 1;
    }
    counts
        .values()
        .any(|&count| count * 2 > vertices.len())
}

impl<G: HostGraph, I: Induction, L: CanonicalLabeler> ExplorationHooks<G, I>
    for WalkSampling<'_, L>
{
    fn should_continue(&mut self, _embedding: &Embedding<'_, G, I>, step: usize) -> bool {
        step < self.max_step
    }

    fn filter(&mut self, embedding: &Embedding<'_, G, I>) -> bool {
        !self.majority_only || has_majority_label(embedding)
    }

    fn on_visit(&mut self, embedding: &mut Embedding<'_, G, I>, step: usize) -> Result<()> {
        if step < self.agg_step || embedding.num_words() != self.max_size {
            return Ok(());
        }
        let value = match self.weight {
            SampleWeight::Unit => 1.0,
            SampleWeight::GroupFactor(estimator) => estimator.group_factor(embedding),
        };
        let pattern = embedding.pattern(self.labeler)?.clone();
        self.storage.report(pattern, value)?;
        self.reported += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EdgeInduced, VertexEmbedding};
    use crate::graph::MainGraph;
    use crate::pattern::WlCanonicalLabeler;
    use crate::pipeline::explore::Explorer;

    fn edge_class_supports(graph: &MainGraph, max_size: usize) -> Result<Vec<usize>> {
        let labeler = WlCanonicalLabeler::default();
        let mut hooks = EdgeClassSupport::new(&labeler, max_size);
        let mut explorer: Explorer<'_, MainGraph, EdgeInduced> = Explorer::new(graph);
        for start in 0..graph.number_of_edges() as Word {
            explorer.explore_from(start, &mut hooks)?;
        }
        let supports = hooks.into_supports().into_aggregation();
        Ok(supports.sorted().into_iter().map(|(_, value)| value as usize).collect())
    }

    #[test]
    fn overlapping_paths_form_one_class() -> Result<()> {
        // 0-1-2-3: the two 2-paths share edge 1-2
        let graph = MainGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(edge_class_supports(&graph, 2)?, vec![1]);
        Ok(())
    }

    #[test]
    fn disjoint_paths_form_two_classes() -> Result<()> {
        let graph = MainGraph::from_edges(6, &[(0, 1), (1, 2), (3, 4), (4, 5)]);
        assert_eq!(edge_class_supports(&graph, 2)?, vec![2]);
        Ok(())
    }

    #[test]
    fn missing_pairs_of_a_path() {
        let graph = MainGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (0, 2)]);
        assert_eq!(missing_edges(&VertexEmbedding::from_words(&graph, &[0, 1, 2])), 0);
        assert_eq!(missing_edges(&VertexEmbedding::from_words(&graph, &[1, 2, 3])), 1);
        assert_eq!(missing_edges(&VertexEmbedding::from_words(&graph, &[0, 1, 2, 3])), 2);
    }

    #[test]
    fn majority_needs_strictly_more_than_half() {
        let graph = MainGraph::from_labeled_edges(
            &[Some("a"), Some("a"), Some("b"), Some("b")],
            &[(0, 1), (1, 2), (2, 3)],
        );
        assert!(has_majority_label(&VertexEmbedding::from_words(&graph, &[0, 1, 2])));
        assert!(!has_majority_label(&VertexEmbedding::from_words(&graph, &[0, 1, 2, 3])));
        assert!(!has_majority_label(&VertexEmbedding::from_words(&graph, &[1, 2])));
    }
}
