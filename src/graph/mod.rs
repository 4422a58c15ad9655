pub mod construction;
pub mod model;

pub use construction::GraphLoader;
pub use model::{EdgeAttributes, GraphId, MainGraph, NodeAttributes, RawGraph};

pub type VertexId = u32;
pub type EdgeId = u32;

/// Read-only view of the host graph that embeddings are carved out of.
///
/// Implementations must be immutable for the duration of a mining run; many
/// exploration tasks query the same instance concurrently.
pub trait HostGraph: Send + Sync {
    fn number_of_vertices(&self) -> usize;

    fn number_of_edges(&self) -> usize;

    /// Neighbours of `vertex`, sorted ascending and without duplicates.
    fn vertex_neighbors(&self, vertex: VertexId) -> &[VertexId];

    /// Ids of every edge touching `vertex`.
    fn incident_edges(&self, vertex: VertexId) -> &[EdgeId];

    /// Endpoints of `edge` as `(source, destination)`.
    fn edge(&self, edge: EdgeId) -> (VertexId, VertexId);

    /// Ids of all (possibly parallel) edges joining `v1` and `v2`.
    fn edges_between(&self, v1: VertexId, v2: VertexId) -> &[EdgeId];

    fn is_vertex_adjacent(&self, v1: VertexId, v2: VertexId) -> bool {
        self.vertex_neighbors(v1).binary_search(&v2).is_ok()
    }

    /// Two edges are adjacent when they share an endpoint.
    fn are_edges_adjacent(&self, e1: EdgeId, e2: EdgeId) -> bool {
        let (a, b) = self.edge(e1);
        let (c, d) = self.edge(e2);
        a == c || a == d || b == c || b == d
    }

    /// Interned vertex label, `0` when the vertex carries none.
    fn vertex_label(&self, _vertex: VertexId) -> u32 {
        0
    }
}
