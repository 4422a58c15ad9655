use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::graph::EdgeId;
use crate::pattern::Pattern;

/// Destination of per-pattern values reported by mining tasks.
pub trait AggregationSink {
    fn report(&mut self, key: Pattern, value: f64) -> Result<()>;
}

/// In-process sum reduction keyed by pattern.
#[derive(Debug, Clone, Default)]
pub struct AggregationStorage {
    values: IndexMap<Pattern, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternRecord {
    pub pattern: String,
    pub vertices: usize,
    pub edges: usize,
    pub value: f64,
}

impl AggregationStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pattern: &Pattern) -> Option<f64> {
        self.values.get(pattern).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, f64)> {
        self.values.iter().map(|(pattern, &value)| (pattern, value))
    }

    pub fn merge(&mut self, other: AggregationStorage) {
        for (pattern, value) in other.values {
            *self.values.entry(pattern).or_insert(0.0) += value;
        }
    }

    /// Entries by descending value, ties broken by pattern order.
    pub fn sorted(&self) -> Vec<(&Pattern, f64)> {
        let mut entries: Vec<(&Pattern, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn to_records(&self) -> Vec<PatternRecord> {
        self.sorted()
            .into_iter()
            .map(|(pattern, value)| PatternRecord {
                pattern: pattern.to_string(),
                vertices: pattern.num_vertices(),
                edges: pattern.num_edges(),
                value,
            })
            .collect()
    }
}

impl AggregationSink for AggregationStorage {
    fn report(&mut self, key: Pattern, value: f64) -> Result<()> {
        *self.values.entry(key).or_insert(0.0) += value;
        Ok(())
    }
}

/// Disjoint classes of host edges; an inserted edge set joins every class
/// it overlaps into one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeClasses {
    classes: Vec<IndexSet<EdgeId>>,
}

impl EdgeClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes, the support of the pattern they belong to.
    pub fn support(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[IndexSet<EdgeId>] {
        &self.classes
    }

    pub fn insert<E: IntoIterator<Item = EdgeId>>(&mut self, edges: E) {
        let mut joined: IndexSet<EdgeId> = edges.into_iter().collect();
        if joined.is_empty() {
            return;
        }
        // classes are pairwise disjoint, so only overlap with `edges` matters
        let mut idx = 0;
        while idx < self.classes.len() {
            if self.classes[idx].iter().any(|edge| joined.contains(edge)) {
                let class = self.classes.swap_remove(idx);
                joined.extend(class);
            } else {
                idx += 1;
            }
        }
        self.classes.push(joined);
    }

    pub fn merge(&mut self, other: EdgeClasses) {
        for class in other.classes {
            self.insert(class);
        }
    }
}

/// Per-pattern edge classes, reported as class counts.
#[derive(Debug, Clone, Default)]
pub struct SupportStorage {
    supports: IndexMap<Pattern, EdgeClasses>,
}

impl SupportStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report<E: IntoIterator<Item = EdgeId>>(&mut self, key: Pattern, edges: E) {
        self.supports.entry(key).or_default().insert(edges);
    }

    pub fn support(&self, pattern: &Pattern) -> usize {
        self.supports.get(pattern).map_or(0, EdgeClasses::support)
    }

    pub fn len(&self) -> usize {
        self.supports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supports.is_empty()
    }

    pub fn merge(&mut self, other: SupportStorage) {
        for (pattern, classes) in other.supports {
            self.supports.entry(pattern).or_default().merge(classes);
        }
    }

    /// Class counts as plain values.
    pub fn into_aggregation(self) -> AggregationStorage {
        let values = self
            .supports
            .into_iter()
            .map(|(pattern, classes)| (pattern, classes.support() as f64))
            .collect();
        AggregationStorage { values }
    }
}
