use indexmap::IndexSet;
use log::debug;

use super::{ConnectivityOracle, Induction, InductionKind, Word, WordState};
use crate::graph::{EdgeId, HostGraph, VertexId};

/// Words are edges; derived elements are their endpoints in first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeInduced;

impl Induction for EdgeInduced {
    const KIND: InductionKind = InductionKind::Edge;

    fn universe_size<G: HostGraph>(graph: &G) -> usize {
        graph.number_of_edges()
    }

    fn are_words_adjacent<G: HostGraph>(graph: &G, a: Word, b: Word) -> bool {
        graph.are_edges_adjacent(a, b)
    }

    fn collect_extensions<G: HostGraph>(graph: &G, word: Word, out: &mut IndexSet<Word>) {
        let (src, dst) = graph.edge(word);
        out.extend(graph.incident_edges(src).iter().copied());
        out.extend(graph.incident_edges(dst).iter().copied());
    }

    fn derive_last<G: HostGraph>(graph: &G, state: &mut WordState) {
        let Some(&word) = state.words.last() else {
            return;
        };
        let (src, dst) = graph.edge(word);
        let before = state.derived.len();
        if !state.derived.contains(&src) {
            state.derived.push(src);
        }
        if dst != src && !state.derived.contains(&dst) {
            state.derived.push(dst);
        }
        state.derived_per_word.push(state.derived.len() - before);
    }

    /// An earlier edge may have introduced a vertex that later edges share,
    /// so vertex attribution is always re-derived. The insertion order is
    /// kept while every edge still touches an earlier one; otherwise the
    /// words are re-laid in DFS preorder from the first edge, dropping any
    /// that became unreachable.
    fn remove_at<G: HostGraph>(
        graph: &G,
        state: &mut WordState,
        index: usize,
        oracle: &mut ConnectivityOracle,
    ) {
        let removed = state.words.remove(index);
        let words = &state.words;

        let prefix_connected = words.iter().enumerate().skip(1).all(|(idx, &word)| {
            words[..idx]
                .iter()
                .any(|&earlier| graph.are_edges_adjacent(earlier, word))
        });
        let order: Vec<Word> = if prefix_connected {
            words.clone()
        } else {
            oracle
                .dfs_order(words.len(), 0, |a, b| {
                    graph.are_edges_adjacent(words[a], words[b])
                })
                .iter()
                .map(|&idx| words[idx])
                .collect()
        };
        if order.len() < words.len() {
            debug!(
                "Removing edge {} split the embedding, keeping {} of {} words",
                removed,
                order.len(),
                words.len()
            );
        }
        state.rebuild::<Self, G>(graph, order);
    }

    fn vertices(state: &WordState) -> &[VertexId] {
        &state.derived
    }

    fn edges(state: &WordState) -> &[EdgeId] {
        &state.words
    }
}

#[cfg(test)]
mod tests {
    use crate::embedding::EdgeEmbedding;
    use crate::graph::MainGraph;

    fn path() -> MainGraph {
        // 0-1-2-3-4 with edge ids 0..4
        MainGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)])
    }

    #[test]
    fn removing_first_edge_relays_growth_order() {
        let graph = path();
        // grown from the middle: 1, then 0 and 2 hang off it
        let mut embedding = EdgeEmbedding::from_words(&graph, &[1, 0, 2]);
        assert_eq!(embedding.vertices(), &[1, 2, 0, 3]);
        embedding.remove_word(0);
        assert_eq!(embedding.words(), &[1, 2]);
        assert_eq!(embedding.vertices(), &[1, 2, 3]);
        assert_eq!(embedding.derived_per_word(), &[2, 1]);
    }

    #[test]
    fn order_is_rebuilt_when_prefix_breaks() {
        let graph = path();
        let mut embedding = EdgeEmbedding::from_words(&graph, &[1, 2, 0, 3]);
        // dropping 1 leaves 2, 0, 3 where 0 no longer touches 2
        embedding.remove_word(1);
        assert_eq!(embedding.words(), &[2, 3]);
        assert_eq!(embedding.vertices(), &[2, 3, 4]);
    }

    #[test]
    fn dfs_relayout_keeps_every_connected_edge() {
        // triangle 0-1-2 plus edge 2-3: ids 0:(0,1) 1:(1,2) 2:(2,0) 3:(2,3)
        let graph = MainGraph::from_edges(4, &[(0, 1), (1, 2), (2, 0), (2, 3)]);
        let mut embedding = EdgeEmbedding::from_words(&graph, &[3, 1, 0, 2]);
        embedding.remove_word(1);
        // 3 and 0 share no endpoint, so the order becomes 3, 2, 0
        assert_eq!(embedding.words(), &[3, 2, 0]);
        assert_eq!(embedding.vertices(), &[2, 3, 0, 1]);
        assert_eq!(embedding.derived_per_word(), &[2, 1, 1]);
    }
}
