//! Weisfeiler-Lehman colour refinement over small adjacency lists.
//!
//! Colours are canonical ranks: two isomorphic inputs always receive the same
//! colour multiset and the same colour for corresponding vertices, which is
//! what the canonical labeler relies on when it compares codes across
//! embeddings.

use std::collections::BTreeMap;

/// Rank vertices by `(label, degree)`.
pub fn initial_colors(labels: &[u32], adjacency: &[Vec<usize>]) -> Vec<u32> {
    let keys: Vec<(u32, usize)> = labels
        .iter()
        .zip(adjacency)
        .map(|(&label, neighbors)| (label, neighbors.len()))
        .collect();
    rank(&keys)
}

/// One refinement round: each vertex is recoloured by its own colour and the
/// sorted multiset of its neighbours' colours.
pub fn refine_colors(adjacency: &[Vec<usize>], colors: &[u32]) -> Vec<u32> {
    let signatures: Vec<(u32, Vec<u32>)> = adjacency
        .iter()
        .enumerate()
        .map(|(node, neighbors)| {
            let mut neighbor_colors: Vec<u32> = neighbors.iter().map(|&n| colors[n]).collect();
            neighbor_colors.sort_unstable();
            (colors[node], neighbor_colors)
        })
        .collect();
    rank(&signatures)
}

/// Refine until the number of colour classes stops growing.
pub fn refine_until_stable(adjacency: &[Vec<usize>], mut colors: Vec<u32>) -> Vec<u32> {
    let mut classes = color_count(&colors);
    loop {
        let next = refine_colors(adjacency, &colors);
        let next_classes = color_count(&next);
        colors = next;
        if next_classes == classes {
            return colors;
        }
        classes = next_classes;
    }
}

/// Give `node` a colour of its own, ahead of its former class.
pub fn individualize(colors: &[u32], node: usize) -> Vec<u32> {
    let target = colors[node];
    colors
        .iter()
        .enumerate()
        .map(|(idx, &color)| {
            let doubled = color * 2 + 1;
            if idx == node {
                target * 2
            } else {
                doubled
            }
        })
        .collect()
}

pub fn color_count(colors: &[u32]) -> usize {
    let mut seen: Vec<u32> = colors.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

fn rank<K: Ord + Clone>(keys: &[K]) -> Vec<u32> {
    let mut palette: BTreeMap<K, u32> = BTreeMap::new();
    for key in keys {
        palette.entry(key.clone()).or_insert(0);
    }
    for (rank, value) in palette.values_mut().enumerate() {
        *value = rank as u32;
    }
    keys.iter().map(|key| palette[key]).collect()
}
