//! JSON description of an MRF as read by `solve` and written by `random`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mrfcut::api::{MrfEdge, MrfGraph, MrfNode};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub index: usize,
    /// `null` marks an impossible label.
    pub potentials: Vec<Option<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub first: usize,
    pub second: usize,
    /// Row-major `L×L`: entry `i*L + j` is label `i` on `first`, `j` on `second`.
    pub potentials: Vec<Option<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MrfFile {
    pub num_labels: usize,
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl MrfFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))
    }

    /// Build the graph; nodes keep file order, which fixes assignment positions.
    pub fn to_graph(&self) -> Result<MrfGraph> {
        let mut mrf = MrfGraph::new();
        for n in &self.nodes {
            let node = MrfNode::new(n.index, n.potentials.clone())
                .with_context(|| format!("node {}", n.index))?;
            mrf.add_node(node)?;
        }
        for e in &self.edges {
            let edge = MrfEdge::new(e.first, e.second, e.potentials.clone())
                .with_context(|| format!("edge {}-{}", e.first, e.second))?;
            mrf.add_edge(edge)?;
        }
        Ok(mrf)
    }

    pub fn from_graph(mrf: &MrfGraph, num_labels: usize) -> Self {
        Self {
            num_labels,
            nodes: mrf
                .nodes()
                .iter()
                .map(|n| NodeSpec {
                    index: n.index(),
                    potentials: n.potentials().to_vec(),
                })
                .collect(),
            edges: mrf
                .edges()
                .iter()
                .map(|e| EdgeSpec {
                    first: e.first(),
                    second: e.second(),
                    potentials: e.potentials().to_vec(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TWO_NODES: &str = r#"{
        "num_labels": 2,
        "nodes": [
            {"index": 3, "potentials": [0.6, 0.4]},
            {"index": 1, "potentials": [null, 1.0]}
        ],
        "edges": [{"first": 3, "second": 1, "potentials": [0.9, 0.1, 0.1, 0.9]}]
    }"#;

    #[test]
    fn parses_and_builds_graph() {
        let file: MrfFile = serde_json::from_str(TWO_NODES).unwrap();
        let mrf = file.to_graph().unwrap();
        assert_eq!(mrf.node_count(), 2);
        assert_eq!(mrf.position_of(1), Some(1));
        assert_eq!(mrf.edge_count(), 1);
        assert!(mrfcut::api::is_impossible(mrf.nodes()[1].energy(0)));
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let mut file: MrfFile = serde_json::from_str(TWO_NODES).unwrap();
        file.edges[0].second = 9;
        let err = file.to_graph().unwrap_err();
        assert!(err.to_string().contains("unknown node 9"));
    }

    #[test]
    fn save_and_load_keep_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/mrf.json");
        let file: MrfFile = serde_json::from_str(TWO_NODES).unwrap();
        file.save(&path).unwrap();
        let back = MrfFile::load(&path).unwrap();
        assert_eq!(back, file);
        let again = MrfFile::from_graph(&back.to_graph().unwrap(), back.num_labels);
        assert_eq!(again, file);
    }
}
