use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use log::{debug, warn};
use petgraph::prelude::NodeIndex;

use crate::graph::model::{EdgeAttributes, LabeledGraph, MainGraph, NodeAttributes, RawGraph};
use crate::graph::VertexId;

/// High-level loader responsible for turning JSON representations into host graphs.
#[derive(Debug, Default)]
pub struct GraphLoader;

impl GraphLoader {
    /// Parse a JSON string into a host graph.
    pub fn from_json_str(json: &str) -> Result<MainGraph> {
        let raw: RawGraph = serde_json::from_str(json)?;
        Self::from_raw_graph(raw)
    }

    /// Read JSON graph data from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<MainGraph> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json_str(&buf)
    }

    pub fn from_path(path: &Path) -> Result<MainGraph> {
        let file = File::open(path).with_context(|| format!("open graph file {:?}", path))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("parse graph file {:?}", path))
    }

    fn from_raw_graph(raw: RawGraph) -> Result<MainGraph> {
        if raw.directed {
            warn!("Directed input graph will be mined as undirected");
        }

        let mut graph = LabeledGraph::with_capacity(raw.nodes.len(), raw.edges.len());
        let mut node_lookup = IndexMap::new();

        for raw_node in raw.nodes {
            let mut attributes = raw_node.attributes;
            let label = attributes.shift_remove("label").and_then(value_to_string);
            let idx = graph.add_node(NodeAttributes {
                label,
                extra: attributes,
            });
            if node_lookup
                .insert(raw_node.id.clone(), idx.index() as VertexId)
                .is_some()
            {
                return Err(anyhow!("Duplicate node id: {}", raw_node.id));
            }
        }

        let mut self_loops = 0usize;
        for raw_edge in raw.edges {
            let source = *node_lookup
                .get(&raw_edge.source)
                .ok_or_else(|| anyhow!("Unknown source node id: {}", raw_edge.source))?;
            let target = *node_lookup
                .get(&raw_edge.target)
                .ok_or_else(|| anyhow!("Unknown target node id: {}", raw_edge.target))?;
            if source == target {
                self_loops += 1;
                continue;
            }

            let mut attributes = raw_edge.attributes;
            let weight = extract_weight(&mut attributes);
            graph.add_edge(
                NodeIndex::new(source as usize),
                NodeIndex::new(target as usize),
                EdgeAttributes {
                    weight,
                    extra: attributes,
                },
            );
        }

        if self_loops > 0 {
            warn!("Dropped {} self-loop edges", self_loops);
        }
        debug!(
            "Loaded host graph with {} vertices and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(MainGraph::from_petgraph(graph, node_lookup))
    }
}

fn extract_weight(attrs: &mut IndexMap<String, serde_json::Value>) -> Option<f64> {
    attrs.shift_remove("weight").and_then(|value| match value {
        serde_json::Value::Number(num) => num.as_f64(),
        serde_json::Value::String(s) => s.parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        _ => None,
    })
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(num) => Some(num.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
