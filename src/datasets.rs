use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::graph::{GraphLoader, MainGraph};

const DEFAULT_ROOT: &str = "datasets";
const GRAPH_FILE: &str = "data_graph.json";

/// Resolves named datasets laid out as `<root>/<name>/data_graph.json`.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    root: PathBuf,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl DatasetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn graph_path(&self, name: &str) -> PathBuf {
        self.root.join(name).join(GRAPH_FILE)
    }

    pub fn load(&self, name: &str) -> Result<MainGraph> {
        let path = self.graph_path(name);
        GraphLoader::from_path(&path).with_context(|| format!("load dataset {name} from {:?}", path))
    }

    /// Names of every dataset directory under the root that holds a graph file.
    pub fn available(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("list datasets directory {:?}", self.root))?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let path = entry.path();
                if path.is_dir() && path.join(GRAPH_FILE).is_file() {
                    Some(entry.file_name().to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }
}
