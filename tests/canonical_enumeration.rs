use std::collections::BTreeSet;

use anyhow::Result;
use graphmine::pipeline::tasks::MotifCounting;
use graphmine::{
    AggregationSink, AggregationStorage, CanonicalityChecker, ConnectivityOracle, EdgeInduced,
    Embedding, Explorer, ExplorationHooks, HostGraph, Induction, MainGraph, VertexInduced,
    WlCanonicalLabeler, Word,
};
use petgraph::algo::is_isomorphic_matching;

fn labeled_graph() -> MainGraph {
    // two triangles sharing vertex 2, a chord 1-3 and a tail 4-5-6
    MainGraph::from_labeled_edges(
        &[Some("a"), Some("b"), Some("a"), Some("b"), Some("a"), None, Some("b")],
        &[
            (0, 1),
            (1, 2),
            (2, 0),
            (2, 3),
            (3, 4),
            (4, 2),
            (4, 5),
            (5, 6),
            (1, 3),
        ],
    )
}

/// Every connected word set with at most `max_size` words, found by brute force.
fn connected_subsets<I: Induction>(graph: &MainGraph, max_size: usize) -> Vec<Vec<Word>> {
    let universe = I::universe_size(graph);
    let mut oracle = ConnectivityOracle::new();
    let mut subsets = Vec::new();
    for mask in 1u32..(1 << universe) {
        let words: Vec<Word> = (0..universe as u32)
            .filter(|bit| mask & (1 << bit) != 0)
            .collect();
        if words.len() > max_size {
            continue;
        }
        if oracle.is_connected(words.len(), |a, b| {
            I::are_words_adjacent(graph, words[a], words[b])
        }) {
            subsets.push(words);
        }
    }
    subsets
}

struct CollectSets {
    max_size: usize,
    seen: Vec<Vec<Word>>,
}

impl<G: HostGraph, I: Induction> ExplorationHooks<G, I> for CollectSets {
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

fn explore<I, H>(graph: &MainGraph, hooks: &mut H) -> Result<()>
where
    I: Induction,
    H: ExplorationHooks<MainGraph, I>,
{
    let mut explorer: Explorer<'_, MainGraph, I> = Explorer::new(graph);
    for start in 0..I::universe_size(graph) {
        explorer.explore_from(start as Word, hooks)?;
    }
    Ok(())
}

fn assert_explorer_visits_each_subset_once<I: Induction>(max_size: usize) -> Result<()> {
    let graph = labeled_graph();
    let mut hooks = CollectSets {
        max_size,
        seen: Vec::new(),
    };
    explore::<I, _>(&graph, &mut hooks)?;

    let unique: BTreeSet<Vec<Word>> = hooks.seen.iter().cloned().collect();
    assert_eq!(unique.len(), hooks.seen.len(), "an embedding was visited twice");
    let expected: BTreeSet<Vec<Word>> = connected_subsets::<I>(&graph, max_size)
        .into_iter()
        .collect();
    assert_eq!(unique, expected);
    Ok(())
}

#[test]
fn explorer_matches_brute_force_vertex_sets() -> Result<()> {
    assert_explorer_visits_each_subset_once::<VertexInduced>(4)
}

#[test]
fn explorer_matches_brute_force_edge_sets() -> Result<()> {
    assert_explorer_visits_each_subset_once::<EdgeInduced>(3)
}

fn permutations(items: &[Word]) -> Vec<Vec<Word>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for idx in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(idx);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            result.push(tail);
        }
    }
    result
}

fn assert_single_canonical_order<I: Induction>(max_size: usize) {
    let graph = labeled_graph();
    for subset in connected_subsets::<I>(&graph, max_size) {
        let canonical_orders = permutations(&subset)
            .into_iter()
            .filter(|order| {
                (0..order.len()).all(|idx| {
                    CanonicalityChecker::is_canonical_with_word::<MainGraph, I>(
                        &graph,
                        &order[..idx],
                        order[idx],
                    )
                })
            })
            .count();
        assert_eq!(canonical_orders, 1, "subset {subset:?}");
    }
}

#[test]
fn one_canonical_order_per_vertex_set() {
    assert_single_canonical_order::<VertexInduced>(4);
}

#[test]
fn one_canonical_order_per_edge_set() {
    assert_single_canonical_order::<EdgeInduced>(4);
}

fn assert_motif_counts_match<I: Induction>(size: usize) -> Result<()> {
    let graph = labeled_graph();
    let labeler = WlCanonicalLabeler::default();

    let mut hooks = MotifCounting::new(&labeler, size);
    explore::<I, _>(&graph, &mut hooks)?;
    let explored = hooks.into_storage();

    let mut brute = AggregationStorage::new();
    for subset in connected_subsets::<I>(&graph, size) {
        if subset.len() != size {
            continue;
        }
        let mut embedding: Embedding<'_, MainGraph, I> = Embedding::from_words(&graph, &subset);
        brute.report(embedding.pattern(&labeler)?.clone(), 1.0)?;
    }

    assert!(!brute.is_empty());
    assert_eq!(explored.len(), brute.len());
    for (pattern, value) in brute.iter() {
        assert_eq!(explored.get(pattern), Some(value), "pattern {pattern}");
    }
    Ok(())
}

#[test]
fn motif_counts_match_brute_force() -> Result<()> {
    assert_motif_counts_match::<VertexInduced>(3)?;
    assert_motif_counts_match::<VertexInduced>(4)?;
    assert_motif_counts_match::<EdgeInduced>(3)
}

fn assert_labels_agree_with_isomorphism<I: Induction>(size: usize) -> Result<()> {
    let graph = labeled_graph();
    let labeler = WlCanonicalLabeler::default();
    let mut embeddings: Vec<Embedding<'_, MainGraph, I>> = connected_subsets::<I>(&graph, size)
        .into_iter()
        .filter(|subset| subset.len() == size)
        .map(|subset| Embedding::from_words(&graph, &subset))
        .collect();

    let mut patterns = Vec::with_capacity(embeddings.len());
    for embedding in &mut embeddings {
        patterns.push(embedding.pattern(&labeler)?.clone());
    }
    let views: Vec<_> = embeddings.iter().map(|embedding| embedding.to_petgraph()).collect();

    for a in 0..views.len() {
        for b in (a + 1)..views.len() {
            let isomorphic =
                is_isomorphic_matching(&views[a], &views[b], |x, y| x == y, |_, _| true);
            assert_eq!(
                patterns[a] == patterns[b],
                isomorphic,
                "{} vs {}",
                embeddings[a],
                embeddings[b]
            );
        }
    }
    Ok(())
}

#[test]
fn canonical_labels_agree_with_petgraph_isomorphism() -> Result<()> {
    assert_labels_agree_with_isomorphism::<VertexInduced>(4)?;
    assert_labels_agree_with_isomorphism::<EdgeInduced>(3)
}
