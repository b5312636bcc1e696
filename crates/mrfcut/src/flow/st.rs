//! s-t minimum cut on an undirected graph.

use super::mincut::{min_cut, MinCutCfg};
use super::undirected::UndirectedGraph;
use super::{EdgeId, FlowError, VertexId};

/// Undirected cut: source-side vertices, crossing edges and their capacity.
#[derive(Clone, Debug)]
pub struct StCut {
    source_side: Vec<bool>,
    edges: Vec<EdgeId>,
    value: f64,
    flow_value: f64,
}

impl StCut {
    pub fn vertex_set_cut_min(&self) -> Vec<VertexId> {
        self.source_side
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| VertexId(i))
            .collect()
    }

    #[inline]
    pub fn is_source_side(&self, v: VertexId) -> bool {
        self.source_side.get(v.0).copied().unwrap_or(false)
    }

    /// Edges with exactly one endpoint on the source side.
    #[inline]
    pub fn edge_set_cut_min(&self) -> &[EdgeId] {
        &self.edges
    }

    #[inline]
    pub fn min_cut_value(&self) -> f64 {
        self.value
    }

    /// Max-flow value of the lowered directed graph.
    #[inline]
    pub fn flow_value(&self) -> f64 {
        self.flow_value
    }
}

/// Lower `g` to a directed graph, run Edmonds-Karp and map the cut back to edges.
pub fn st_min_cut(
    g: &UndirectedGraph,
    s: VertexId,
    t: VertexId,
    cfg: &MinCutCfg,
) -> Result<StCut, FlowError> {
    let key = cfg.capacity_key.as_str();
    let mut directed = g.to_directed(key)?;
    let result = min_cut(&mut directed, s, t, cfg)?;
    directed.clear();

    let source_side: Vec<bool> = (0..g.vertex_count())
        .map(|i| result.is_source_side(VertexId(i)))
        .collect();
    let mut edges = Vec::new();
    let mut value = 0.0;
    for v in (0..g.vertex_count()).map(VertexId).filter(|v| source_side[v.0]) {
        for &e in g.incident(v) {
            if !source_side[g.edge(e).other(v).0] {
                edges.push(e);
                value += g.edge_value(e, key).unwrap_or(0.0);
            }
        }
    }
    Ok(StCut {
        source_side,
        edges,
        value,
        flow_value: result.flow_value(),
    })
}
