use log::trace;

use super::sf::local_degree;
use crate::embedding::{Embedding, Induction};
use crate::graph::HostGraph;

/// Correction weight for embeddings sampled by the flood-and-drain walk.
///
/// At the size bound a step from `S` reaches each neighbouring state through
/// one (added, drained) pair out of `local_degree(S)`, and the pair counts
/// are symmetric between neighbours. The walk therefore visits `S` in
/// proportion to `local_degree(S)`, and `1 / local_degree(S)` is the
/// Horvitz-Thompson weight up to the shared normalising constant. Summed per
/// pattern, the weights are proportional to the number of embeddings of that
/// pattern in the walk's component.
///
/// A sample that cannot be extended has no stationary mass; it only shows
/// up during the growth phase of a walk and is weighted `1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupFactorEstimator;

impl GroupFactorEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn group_factor<G: HostGraph, I: Induction>(
        &self,
        sample: &mut Embedding<'_, G, I>,
    ) -> f64 {
        let degree = local_degree(sample);
        if degree == 0 {
            trace!("Sample [{}] has no continuation, weighting it 1", sample);
            return 1.0;
        }
        1.0 / degree as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EdgeEmbedding, VertexEmbedding, Word};
    use crate::graph::MainGraph;

    fn broom() -> MainGraph {
        MainGraph::from_edges(6, &[(0, 1), (0, 2), (0, 3), (3, 4), (4, 5)])
    }

    #[test]
    fn busier_states_weigh_less() {
        let graph = broom();
        let estimator = GroupFactorEstimator::new();
        let factor = |words: &[Word]| {
            estimator.group_factor(&mut VertexEmbedding::from_words(&graph, words))
        };
        assert_eq!(factor(&[0, 3]), 1.0 / 3.0);
        assert_eq!(factor(&[0, 1]), 0.5);
        assert_eq!(factor(&[3, 4]), 0.5);
        assert_eq!(factor(&[4, 5]), 1.0);
        assert!(factor(&[0, 3]) < factor(&[4, 5]));
    }

    #[test]
    fn weighting_leaves_the_sample_untouched() {
        let graph = broom();
        let mut sample = VertexEmbedding::from_words(&graph, &[3, 0]);
        let before = sample.clone();
        GroupFactorEstimator::new().group_factor(&mut sample);
        assert_eq!(sample.words(), before.words());
        assert_eq!(sample.edges(), before.edges());
    }

    #[test]
    fn whole_component_samples_weigh_one() {
        let graph = MainGraph::from_edges(3, &[(0, 1), (1, 2)]);
        let mut sample = EdgeEmbedding::from_words(&graph, &[0, 1]);
        assert_eq!(GroupFactorEstimator::new().group_factor(&mut sample), 1.0);
    }
}
