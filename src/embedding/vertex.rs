use indexmap::IndexSet;
use log::debug;

use super::{ConnectivityOracle, Induction, InductionKind, Word, WordState};
use crate::graph::{EdgeId, HostGraph, VertexId};

/// Words are vertices; derived elements are every host edge between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexInduced;

impl Induction for VertexInduced {
    const KIND: InductionKind = InductionKind::Vertex;

    fn universe_size<G: HostGraph>(graph: &G) -> usize {
        graph.number_of_vertices()
    }

    fn are_words_adjacent<G: HostGraph>(graph: &G, a: Word, b: Word) -> bool {
        graph.is_vertex_adjacent(a, b)
    }

    fn collect_extensions<G: HostGraph>(graph: &G, word: Word, out: &mut IndexSet<Word>) {
        out.extend(graph.vertex_neighbors(word).iter().copied());
    }

    fn derive_last<G: HostGraph>(graph: &G, state: &mut WordState) {
        let Some((&word, earlier)) = state.words.split_last() else {
            return;
        };
        let before = state.derived.len();
        for &other in earlier {
            state
                .derived
                .extend_from_slice(graph.edges_between(other, word));
        }
        state.derived_per_word.push(state.derived.len() - before);
    }

    fn remove_at<G: HostGraph>(
        graph: &G,
        state: &mut WordState,
        index: usize,
        oracle: &mut ConnectivityOracle,
    ) {
        let removed = state.words[index];

        // Edges are attributed to the later endpoint, so dropping the ones
        // touching `removed` never moves an edge between words.
        let mut kept = Vec::with_capacity(state.derived.len());
        let mut cursor = 0;
        for (position, count) in state.derived_per_word.iter_mut().enumerate() {
            let owned = &state.derived[cursor..cursor + *count];
            cursor += *count;
            let before = kept.len();
            if position != index {
                kept.extend(owned.iter().copied().filter(|&edge| {
                    let (src, dst) = graph.edge(edge);
                    src != removed && dst != removed
                }));
            }
            *count = kept.len() - before;
        }
        state.derived = kept;
        state.words.remove(index);
        state.derived_per_word.remove(index);

        let words = &state.words;
        let reachable = oracle.dfs_order(words.len(), 0, |a, b| {
            graph.is_vertex_adjacent(words[a], words[b])
        });
        if reachable.len() < words.len() {
            let mut positions = reachable.to_vec();
            positions.sort_unstable();
            let order: Vec<Word> = positions.into_iter().map(|idx| words[idx]).collect();
            debug!(
                "Removing vertex {} split the embedding, keeping {} of {} words",
                removed,
                order.len(),
                words.len()
            );
            state.rebuild::<Self, G>(graph, order);
        }
    }

    fn vertices(state: &WordState) -> &[VertexId] {
        &state.words
    }

    fn edges(state: &WordState) -> &[EdgeId] {
        &state.derived
    }
}
