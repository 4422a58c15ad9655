//! Canonical pattern codes for embeddings.

use std::fmt;

use anyhow::{Result, anyhow, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::{EdgeId, HostGraph, VertexId};
use crate::wl::{color_count, individualize, initial_colors, refine_until_stable};

const DEFAULT_LEAF_BUDGET: usize = 1 << 20;

/// Canonical code of a small labelled multigraph.
///
/// Two embeddings are isomorphic exactly when their patterns compare equal.
/// `labels[i]` is the label of the vertex at canonical position `i` and
/// `edges` holds `(low, high)` position pairs in ascending order, repeated
/// for parallel edges.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub labels: Vec<u32>,
    pub edges: Vec<(u16, u16)>,
}

impl Pattern {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, label) in self.labels.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{label}")?;
        }
        write!(f, "]")?;
        for (a, b) in &self.edges {
            write!(f, " {a}-{b}")?;
        }
        Ok(())
    }
}

/// Oracle turning the vertices and edges of an embedding into its pattern.
pub trait CanonicalLabeler: Send + Sync {
    fn canonical_label<G: HostGraph>(
        &self,
        graph: &G,
        vertices: &[VertexId],
        edges: &[EdgeId],
    ) -> Result<Pattern>;
}

/// Colour refinement followed by an individualisation search that keeps the
/// smallest code over all discrete leaves.
#[derive(Debug, Clone)]
pub struct WlCanonicalLabeler {
    leaf_budget: usize,
}

impl Default for WlCanonicalLabeler {
    fn default() -> Self {
        Self {
            leaf_budget: DEFAULT_LEAF_BUDGET,
        }
    }
}

impl WlCanonicalLabeler {
    pub fn with_leaf_budget(leaf_budget: usize) -> Self {
        Self {
            leaf_budget: leaf_budget.max(1),
        }
    }
}

struct Search<'a> {
    labels: &'a [u32],
    adjacency: &'a [Vec<usize>],
    edges: &'a [(usize, usize)],
    leaves: usize,
    budget: usize,
    best: Option<Pattern>,
}

impl Search<'_> {
    fn explore(&mut self, colors: Vec<u32>) -> Result<()> {
        let n = colors.len();
        if color_count(&colors) == n {
            return self.leaf(&colors);
        }

        // first non-singleton cell by colour
        let mut cells: IndexMap<u32, usize> = IndexMap::new();
        for &color in &colors {
            *cells.entry(color).or_insert(0) += 1;
        }
        let target = cells
            .iter()
            .filter(|(_, size)| **size > 1)
            .map(|(&color, _)| color)
            .min()
            .ok_or_else(|| anyhow!("refinement produced no splittable cell"))?;

        for node in 0..n {
            if colors[node] != target {
                continue;
            }
            let refined = refine_until_stable(self.adjacency, individualize(&colors, node));
            self.explore(refined)?;
        }
        Ok(())
    }

    fn leaf(&mut self, colors: &[u32]) -> Result<()> {
        self.leaves += 1;
        if self.leaves > self.budget {
            bail!(
                "canonical labeling exceeded its leaf budget of {} for a {}-vertex pattern",
                self.budget,
                colors.len()
            );
        }

        let mut labels = vec![0u32; colors.len()];
        for (node, &position) in colors.iter().enumerate() {
            labels[position as usize] = self.labels[node];
        }
        let mut edges: Vec<(u16, u16)> = self
            .edges
            .iter()
            .map(|&(a, b)| {
                let (pa, pb) = (colors[a] as u16, colors[b] as u16);
                (pa.min(pb), pa.max(pb))
            })
            .collect();
        edges.sort_unstable();

        let candidate = Pattern { labels, edges };
        match &self.best {
            Some(best) if *best <= candidate => {}
            _ => self.best = Some(candidate),
        }
        Ok(())
    }
}

impl CanonicalLabeler for WlCanonicalLabeler {
    fn canonical_label<G: HostGraph>(
        &self,
        graph: &G,
        vertices: &[VertexId],
        edges: &[EdgeId],
    ) -> Result<Pattern> {
        if vertices.is_empty() {
            return Ok(Pattern::empty());
        }
        if vertices.len() > u16::MAX as usize {
            bail!("pattern with {} vertices is too large to label", vertices.len());
        }

        let position: IndexMap<VertexId, usize> = vertices
            .iter()
            .enumerate()
            .map(|(idx, &vertex)| (vertex, idx))
            .collect();
        let mut local_edges = Vec::with_capacity(edges.len());
        let mut adjacency = vec![Vec::new(); vertices.len()];
        for &edge in edges {
            let (src, dst) = graph.edge(edge);
            let a = *position
                .get(&src)
                .ok_or_else(|| anyhow!("edge {edge} endpoint {src} is not in the embedding"))?;
            let b = *position
                .get(&dst)
                .ok_or_else(|| anyhow!("edge {edge} endpoint {dst} is not in the embedding"))?;
            local_edges.push((a, b));
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        let labels: Vec<u32> = vertices.iter().map(|&v| graph.vertex_label(v)).collect();
        let colors = refine_until_stable(&adjacency, initial_colors(&labels, &adjacency));

        let mut search = Search {
            labels: &labels,
            adjacency: &adjacency,
            edges: &local_edges,
            leaves: 0,
            budget: self.leaf_budget,
            best: None,
        };
        search.explore(colors)?;
        search
            .best
            .ok_or_else(|| anyhow!("canonical labeling produced no code"))
    }
}
