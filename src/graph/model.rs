use indexmap::IndexMap;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::graph::{EdgeId, HostGraph, VertexId};

pub type GraphId = String;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NodeAttributes {
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EdgeAttributes {
    pub weight: Option<f64>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub graph_attributes: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: GraphId,
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: GraphId,
    pub target: GraphId,
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
}

pub type LabeledGraph = UnGraph<NodeAttributes, EdgeAttributes>;

/// Immutable undirected host graph with dense vertex and edge ids.
///
/// Vertex ids are petgraph node indices and edge ids are petgraph edge
/// indices, so ids follow insertion order. Adjacency, incidence and the
/// vertex-pair index are precomputed once so every [`HostGraph`] query is a
/// slice lookup.
#[derive(Debug, Clone)]
pub struct MainGraph {
    graph: LabeledGraph,
    node_lookup: IndexMap<GraphId, VertexId>,
    label_palette: IndexMap<String, u32>,
    labels: Vec<u32>,
    neighbors: Vec<Vec<VertexId>>,
    incident: Vec<Vec<EdgeId>>,
    endpoints: Vec<(VertexId, VertexId)>,
    pair_edges: IndexMap<(VertexId, VertexId), Vec<EdgeId>>,
}

impl MainGraph {
    /// Index an already-built petgraph graph. `node_lookup` maps external ids
    /// to node indices and may be empty for synthetic graphs.
    pub fn from_petgraph(graph: LabeledGraph, node_lookup: IndexMap<GraphId, VertexId>) -> Self {
        let node_count = graph.node_count();
        let mut label_palette: IndexMap<String, u32> = IndexMap::new();
        let mut labels = Vec::with_capacity(node_count);
        for node in graph.node_indices() {
            let label = match graph.node_weight(node).and_then(|attrs| attrs.label.as_ref()) {
                Some(name) => {
                    let next_value = label_palette.len() as u32 + 1;
                    *label_palette.entry(name.clone()).or_insert(next_value)
                }
                None => 0,
            };
            labels.push(label);
        }

        let mut neighbors = vec![Vec::new(); node_count];
        let mut incident = vec![Vec::new(); node_count];
        let mut endpoints = Vec::with_capacity(graph.edge_count());
        let mut pair_edges: IndexMap<(VertexId, VertexId), Vec<EdgeId>> = IndexMap::new();

        for edge in graph.edge_references() {
            let id = edge.id().index() as EdgeId;
            let source = edge.source().index() as VertexId;
            let target = edge.target().index() as VertexId;
            endpoints.push((source, target));
            incident[source as usize].push(id);
            if source != target {
                incident[target as usize].push(id);
                neighbors[source as usize].push(target);
                neighbors[target as usize].push(source);
            }
            pair_edges.entry(pair_key(source, target)).or_default().push(id);
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            graph,
            node_lookup,
            label_palette,
            labels,
            neighbors,
            incident,
            endpoints,
            pair_edges,
        }
    }

    /// Build an unlabelled graph with `vertices` vertices from an edge list.
    pub fn from_edges(vertices: usize, edges: &[(VertexId, VertexId)]) -> Self {
        Self::from_labeled_edges(&vec![None; vertices], edges)
    }

    /// Build a graph whose vertex `i` carries `labels[i]`.
    pub fn from_labeled_edges(labels: &[Option<&str>], edges: &[(VertexId, VertexId)]) -> Self {
        let mut graph = LabeledGraph::with_capacity(labels.len(), edges.len());
        for label in labels {
            graph.add_node(NodeAttributes {
                label: label.map(str::to_string),
                extra: IndexMap::new(),
            });
        }
        for &(source, target) in edges {
            graph.add_edge(
                NodeIndex::new(source as usize),
                NodeIndex::new(target as usize),
                EdgeAttributes::default(),
            );
        }
        Self::from_petgraph(graph, IndexMap::new())
    }

    pub fn graph(&self) -> &LabeledGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn resolve_node_id(&self, node_id: &str) -> Option<VertexId> {
        self.node_lookup.get(node_id).copied()
    }

    pub fn label_name(&self, label: u32) -> Option<&str> {
        if label == 0 {
            return None;
        }
        self.label_palette
            .get_index(label as usize - 1)
            .map(|(name, _)| name.as_str())
    }

    pub fn edge_attributes(&self, edge: EdgeId) -> Option<&EdgeAttributes> {
        self.graph.edge_weight(EdgeIndex::new(edge as usize))
    }
}

impl HostGraph for MainGraph {
    fn number_of_vertices(&self) -> usize {
        self.neighbors.len()
    }

    fn number_of_edges(&self) -> usize {
        self.endpoints.len()
    }

    fn vertex_neighbors(&self, vertex: VertexId) -> &[VertexId] {
        &self.neighbors[vertex as usize]
    }

    fn incident_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.incident[vertex as usize]
    }

    fn edge(&self, edge: EdgeId) -> (VertexId, VertexId) {
        self.endpoints[edge as usize]
    }

    fn edges_between(&self, v1: VertexId, v2: VertexId) -> &[EdgeId] {
        self.pair_edges
            .get(&pair_key(v1, v2))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn vertex_label(&self, vertex: VertexId) -> u32 {
        self.labels[vertex as usize]
    }
}

fn pair_key(v1: VertexId, v2: VertexId) -> (VertexId, VertexId) {
    if v1 <= v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}
