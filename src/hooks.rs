use anyhow::Result;

use crate::embedding::{Embedding, Induction};
use crate::graph::HostGraph;

/// Callbacks a driver invokes while exploring or walking.
///
/// `step` is the recursion depth for exhaustive exploration and the walk
/// step for samplers.
pub trait ExplorationHooks<G: HostGraph, I: Induction> {
    /// Whether the driver may modify the embedding further.
    fn should_continue(&mut self, embedding: &Embedding<'_, G, I>, step: usize) -> bool;

    /// Embeddings rejected here are neither visited nor expanded.
    fn filter(&mut self, _embedding: &Embedding<'_, G, I>) -> bool {
        true
    }

    fn on_visit(&mut self, embedding: &mut Embedding<'_, G, I>, step: usize) -> Result<()>;
}
