//! Alpha step → binary MRF → undirected s-t graph.
//!
//! For a fixed `alpha`, label 0 of the binary problem means "keep the current
//! label" and label 1 means "switch to alpha". Nodes that end on the sink side
//! of the min cut switch.

use crate::energy::shift_to_zero;
use crate::flow::{FlowError, UndirectedGraph, VertexId};
use crate::mrf::MrfGraph;

/// Name of the source terminal.
pub const SOURCE: &str = "S";
/// Name of the sink terminal.
pub const SINK: &str = "T";

/// Name of the terminal edge `S-node`.
#[inline]
pub fn source_edge_name(index: usize) -> String {
    format!("{SOURCE}_{index}")
}

/// Binary node: energies for `[keep, switch]`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryNode {
    pub index: usize,
    pub energies: [f64; 2],
}

impl BinaryNode {
    fn new(index: usize, mut energies: [f64; 2]) -> Self {
        shift_to_zero(&mut energies);
        Self { index, energies }
    }

    /// Add `delta` to the "switch" energy and re-shift.
    fn absorb(&mut self, delta: f64) {
        self.energies[1] += delta;
        shift_to_zero(&mut self.energies);
    }
}

/// Binary edge between node positions; energies in layout `[00, 01, 10, 11]`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryEdge {
    pub first: usize,
    pub second: usize,
    pub energies: [f64; 4],
}

impl BinaryEdge {
    /// `e01 + e10 >= e00 + e11`.
    #[inline]
    pub fn is_submodular(&self) -> bool {
        let [e00, e01, e10, e11] = self.energies;
        e01 + e10 >= e00 + e11
    }

    /// Capacity of the `first-second` edge in the s-t graph.
    #[inline]
    pub fn capacity(&self) -> f64 {
        let [e00, e01, e10, e11] = self.energies;
        e01 + e10 - e00 - e11
    }
}

/// Two-label sub-problem of one alpha step. Node order follows the MRF.
#[derive(Clone, Debug, Default)]
pub struct BinaryMrf {
    pub nodes: Vec<BinaryNode>,
    pub edges: Vec<BinaryEdge>,
}

/// s-t graph with its terminals.
#[derive(Clone, Debug)]
pub struct StGraph {
    pub graph: UndirectedGraph,
    pub source: VertexId,
    pub sink: VertexId,
}

/// Build the binary sub-problem of expanding `alpha` from `assignment`.
///
/// Pre: `assignment` has one label per node and all labels (and `alpha`) are
/// covered by the energy tables (see `MrfGraph::validate`).
pub fn alpha_graph<P>(mrf: &MrfGraph<P>, assignment: &[usize], alpha: usize) -> BinaryMrf {
    let nodes = mrf
        .nodes()
        .iter()
        .zip(assignment)
        .map(|(node, &cur)| BinaryNode::new(node.index(), [node.energy(cur), node.energy(alpha)]))
        .collect();
    let edges = mrf
        .edges()
        .iter()
        .map(|edge| {
            let (first, second) = mrf.endpoints(edge);
            let (cu, cv) = (assignment[first], assignment[second]);
            let mut energies = [
                edge.energy(cu, cv),
                edge.energy(cu, alpha),
                edge.energy(alpha, cv),
                edge.energy(alpha, alpha),
            ];
            shift_to_zero(&mut energies);
            BinaryEdge {
                first,
                second,
                energies,
            }
        })
        .collect();
    BinaryMrf { nodes, edges }
}

impl BinaryMrf {
    /// Number of edges whose table is not submodular. The reduction does not
    /// reject them; the resulting cut is then not guaranteed optimal.
    pub fn non_submodular_edges(&self) -> usize {
        self.edges.iter().filter(|e| !e.is_submodular()).count()
    }

    /// Build the s-t graph. Pairwise terms are folded into the nodes'
    /// "switch" energies (first `+= e10 - e00`, second `+= e11 - e10`), leaving
    /// one edge of capacity `e01 + e10 - e00 - e11` per pair; each node then
    /// gets a terminal edge carrying the difference of its two energies.
    pub fn st_graph(&mut self) -> Result<StGraph, FlowError> {
        let mut graph = UndirectedGraph::new();
        let source = graph.add_vertex(SOURCE);
        let sink = graph.add_vertex(SINK);
        let vertices: Vec<VertexId> = self
            .nodes
            .iter()
            .map(|n| graph.add_vertex(n.index.to_string()))
            .collect();

        for edge in &self.edges {
            let [e00, _, e10, e11] = edge.energies;
            self.nodes[edge.first].absorb(e10 - e00);
            self.nodes[edge.second].absorb(e11 - e10);
            let name = format!(
                "{}_{}",
                self.nodes[edge.first].index, self.nodes[edge.second].index
            );
            graph.add_edge(
                vertices[edge.first],
                vertices[edge.second],
                name,
                edge.capacity(),
            )?;
        }

        for (node, &v) in self.nodes.iter().zip(&vertices) {
            let [a0, a1] = node.energies;
            let (to_source, to_sink) = if a1 > a0 { (a1 - a0, 0.0) } else { (0.0, a0 - a1) };
            graph.add_edge(source, v, source_edge_name(node.index), to_source)?;
            graph.add_edge(v, sink, format!("{}_{SINK}", node.index), to_sink)?;
        }
        Ok(StGraph {
            graph,
            source,
            sink,
        })
    }

    /// Release node and edge storage.
    pub fn clear(&mut self) {
        self.nodes = Vec::new();
        self.edges = Vec::new();
    }
}
