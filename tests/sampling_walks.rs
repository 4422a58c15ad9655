use std::collections::BTreeMap;

use anyhow::Result;
use graphmine::{
    GroupFactorEstimator, HostGraph, MainGraph, MhSampler, MiningConfig, MiningWorkflow,
    ModificationPolicy, SfSampler, StepOutcome, VertexInduced, Word,
};

fn five_cycle() -> MainGraph {
    MainGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)])
}

fn state_key(words: &[Word]) -> Vec<Word> {
    let mut key = words.to_vec();
    key.sort_unstable();
    key
}

#[test]
fn mh_walk_is_uniform_over_cycle_embeddings() -> Result<()> {
    let graph = five_cycle();
    let mut sampler: MhSampler<'_, _, VertexInduced> =
        MhSampler::new(&graph, ModificationPolicy::Both, 2024);

    // empty state, 5 singles, 5 pairs, 5 triples, 5 quadruples, the full cycle
    let states = 22;
    let thinning = 60;
    let samples = 400 * states;

    for _ in 0..1_000 {
        sampler.step();
    }
    let mut counts: BTreeMap<Vec<Word>, usize> = BTreeMap::new();
    for _ in 0..samples {
        for _ in 0..thinning {
            sampler.step();
        }
        *counts.entry(state_key(sampler.embedding().words())).or_insert(0) += 1;
    }

    assert_eq!(counts.len(), states);
    let expected = samples as f64 / states as f64;
    let chi_square: f64 = counts
        .values()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    // 21 degrees of freedom; the 0.1% critical value is about 46.8
    assert!(chi_square < 60.0, "chi-square {chi_square:.1} over {counts:?}");
    assert_eq!(sampler.stats().restarts, 0);
    Ok(())
}

#[test]
fn mh_rejections_happen_on_unequal_degrees() {
    let graph = five_cycle();
    let mut sampler: MhSampler<'_, _, VertexInduced> =
        MhSampler::new(&graph, ModificationPolicy::Both, 5);
    let outcomes: Vec<StepOutcome> = (0..2_000).map(|_| sampler.step()).collect();
    assert!(outcomes.contains(&StepOutcome::Accepted));
    assert!(outcomes.contains(&StepOutcome::Rejected));
}

fn broom() -> MainGraph {
    // centre 0 with leaves 1, 2 and a tail 0-3-4-5
    MainGraph::from_edges(6, &[(0, 1), (0, 2), (0, 3), (3, 4), (4, 5)])
}

fn spread(shares: &[f64]) -> f64 {
    let max = shares.iter().copied().fold(f64::MIN, f64::max);
    let min = shares.iter().copied().fold(f64::MAX, f64::min);
    max / min
}

#[test]
fn group_factors_equalise_state_frequencies() -> Result<()> {
    let graph = broom();
    let estimator = GroupFactorEstimator::new();
    let mut sampler: SfSampler<'_, _, VertexInduced> = SfSampler::with_seed(&graph, 2, 77);
    assert!(sampler.seed_random_word());
    for _ in 0..100 {
        sampler.step()?;
    }

    let mut raw: BTreeMap<Vec<Word>, f64> = BTreeMap::new();
    let mut weighted: BTreeMap<Vec<Word>, f64> = BTreeMap::new();
    for _ in 0..40_000 {
        sampler.step()?;
        let mut sample = sampler.embedding().clone();
        let factor = estimator.group_factor(&mut sample);
        let key = state_key(sample.words());
        *raw.entry(key.clone()).or_insert(0.0) += 1.0;
        *weighted.entry(key).or_insert(0.0) += factor;
    }
    assert_eq!(raw.len(), 5, "one state per host edge: {raw:?}");

    // raw visits follow the local degrees 2, 2, 3, 2, 1
    let raw_shares: Vec<f64> = raw.values().copied().collect();
    assert!(spread(&raw_shares) > 2.0, "raw {raw:?}");
    assert!(raw[&vec![0, 3]] > raw[&vec![4, 5]] * 2.0);

    let weighted_shares: Vec<f64> = weighted.values().copied().collect();
    assert!(spread(&weighted_shares) < 1.3, "weighted {weighted:?}");
    Ok(())
}

#[test]
fn sf_motif_estimates_track_embedding_counts() -> Result<()> {
    // pattern a-a has two embeddings, a-b, b-c and c-c one each; the hub edge
    // 0-3 (a-b) is visited three times as often as the leaf edge 4-5 (c-c)
    let graph = MainGraph::from_labeled_edges(
        &[Some("a"), Some("a"), Some("a"), Some("b"), Some("c"), Some("c")],
        &[(0, 1), (0, 2), (0, 3), (3, 4), (4, 5)],
    );
    let config = MiningConfig::from_pairs([
        ("task", "sf-motifs"),
        ("max_size", "2"),
        ("sample_size", "20"),
        ("max_step", "2000"),
        ("agg_step", "100"),
        ("seed", "9"),
        ("partitions", "1"),
    ])?;
    let summary = MiningWorkflow::new(config)?.execute(&graph)?;

    let value_of = |first: u32, second: u32| {
        summary
            .aggregation
            .iter()
            .find(|(pattern, _)| {
                let mut labels = pattern.labels.clone();
                labels.sort_unstable();
                labels == vec![first.min(second), first.max(second)]
            })
            .map(|(_, value)| value)
            .unwrap_or(0.0)
    };
    let (a, b, c) = (graph.vertex_label(0), graph.vertex_label(3), graph.vertex_label(4));
    let hub = value_of(a, b);
    let leaf = value_of(c, c);
    let pair = value_of(a, a);
    assert!(hub > 0.0 && leaf > 0.0 && pair > 0.0);
    assert!((hub / leaf - 1.0).abs() < 0.2, "a-b {hub} c-c {leaf}");
    assert!((pair / leaf - 2.0).abs() < 0.4, "a-a {pair} c-c {leaf}");
    Ok(())
}

#[test]
fn sf_walks_with_equal_seeds_agree() -> Result<()> {
    let graph = broom();
    let walk = |seed| -> Result<Vec<Vec<Word>>> {
        let mut sampler: SfSampler<'_, _, VertexInduced> = SfSampler::with_seed(&graph, 3, seed);
        sampler.seed_random_word();
        let mut states = Vec::new();
        for _ in 0..200 {
            sampler.step()?;
            states.push(sampler.embedding().words().to_vec());
        }
        Ok(states)
    };
    assert_eq!(walk(31)?, walk(31)?);
    Ok(())
}
