//! Node, edge and graph records of a pairwise MRF.
//!
//! Kept as plain owned data: the graph validates endpoints when an edge is
//! inserted, so downstream code can index without re-checking.

use std::collections::HashMap;

use nalgebra::DMatrix;

use crate::energy::{
    energies_from_potentials, is_valid_potential, zero_normalize, IMPOSSIBLE_ENERGY,
};

use super::MrfError;

/// MRF node: per-label potentials and their zero-normalized energies.
///
/// `P` is an opaque payload carried for callers (e.g. the candidate objects a
/// label stands for); the solver never looks at it.
#[derive(Clone, Debug)]
pub struct MrfNode<P = ()> {
    index: usize,
    potentials: Vec<Option<f64>>,
    energies: Vec<f64>,
    payload: Option<P>,
}

impl<P> MrfNode<P> {
    pub fn new(index: usize, potentials: Vec<Option<f64>>) -> Result<Self, MrfError> {
        check_potentials(&potentials)?;
        let energies = energies_from_potentials(&potentials);
        Ok(Self {
            index,
            potentials,
            energies,
            payload: None,
        })
    }

    /// Convenience for fully specified potentials.
    pub fn from_potentials(index: usize, potentials: &[f64]) -> Result<Self, MrfError> {
        Self::new(index, potentials.iter().copied().map(Some).collect())
    }

    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn potentials(&self) -> &[Option<f64>] {
        &self.potentials
    }

    #[inline]
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    #[inline]
    pub fn energy(&self, label: usize) -> f64 {
        self.energies[label]
    }

    /// Replace the energies; the result is re-normalized. `+inf` marks an
    /// impossible label; NaN and `-inf` are rejected.
    pub fn set_energies(&mut self, mut energies: Vec<f64>) -> Result<(), MrfError> {
        if energies.len() != self.potentials.len() {
            return Err(MrfError::EnergyLength {
                node: self.index,
                expected: self.potentials.len(),
                got: energies.len(),
            });
        }
        for e in energies.iter_mut() {
            if e.is_nan() || *e == f64::NEG_INFINITY {
                return Err(MrfError::InvalidEnergy {
                    node: self.index,
                    value: *e,
                });
            }
            if *e > IMPOSSIBLE_ENERGY {
                *e = IMPOSSIBLE_ENERGY;
            }
        }
        self.energies = energies;
        zero_normalize(&mut self.energies);
        Ok(())
    }

    #[inline]
    pub fn num_labels(&self) -> usize {
        self.energies.len()
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }
}

/// MRF edge between two nodes (by node index). The pairwise table is indexed
/// `(label of first, label of second)`; the order of the endpoints matters.
#[derive(Clone, Debug)]
pub struct MrfEdge {
    first: usize,
    second: usize,
    potentials: Vec<Option<f64>>,
    table: DMatrix<f64>,
}

impl MrfEdge {
    /// Build from a row-major `L*L` potential table (`i*L + j`).
    pub fn new(
        first: usize,
        second: usize,
        potentials: Vec<Option<f64>>,
    ) -> Result<Self, MrfError> {
        let side = (potentials.len() as f64).sqrt().round() as usize;
        if side * side != potentials.len() || side == 0 {
            return Err(MrfError::NonSquareTable {
                edge: (first, second),
                len: potentials.len(),
            });
        }
        check_potentials(&potentials)?;
        let energies = energies_from_potentials(&potentials);
        Ok(Self {
            first,
            second,
            potentials,
            table: DMatrix::from_row_slice(side, side, &energies),
        })
    }

    pub fn from_potentials(
        first: usize,
        second: usize,
        potentials: &[f64],
    ) -> Result<Self, MrfError> {
        Self::new(first, second, potentials.iter().copied().map(Some).collect())
    }

    #[inline]
    pub fn first(&self) -> usize {
        self.first
    }

    #[inline]
    pub fn second(&self) -> usize {
        self.second
    }

    #[inline]
    pub fn potentials(&self) -> &[Option<f64>] {
        &self.potentials
    }

    /// Pairwise energy for labels `(a, b)` on `(first, second)`.
    #[inline]
    pub fn energy(&self, a: usize, b: usize) -> f64 {
        self.table[(a, b)]
    }

    /// Energies as an `L×L` matrix.
    #[inline]
    pub fn table(&self) -> &DMatrix<f64> {
        &self.table
    }

    /// Energies in the row-major flat layout of the potentials.
    pub fn energies(&self) -> Vec<f64> {
        self.table.transpose().as_slice().to_vec()
    }

    /// Label count `L` of the table.
    #[inline]
    pub fn num_labels(&self) -> usize {
        self.table.nrows()
    }
}

/// Pairwise MRF: nodes in insertion order plus edges between them.
///
/// Invariants
/// - Node indices are unique; the insertion position is the node's slot in
///   every assignment vector.
/// - Every edge endpoint is a node of this graph.
#[derive(Clone, Debug)]
pub struct MrfGraph<P = ()> {
    nodes: Vec<MrfNode<P>>,
    edges: Vec<MrfEdge>,
    position: HashMap<usize, usize>,
}

impl<P> Default for MrfGraph<P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            position: HashMap::new(),
        }
    }
}

impl<P> MrfGraph<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node; returns its position.
    pub fn add_node(&mut self, node: MrfNode<P>) -> Result<usize, MrfError> {
        if self.position.contains_key(&node.index) {
            return Err(MrfError::DuplicateNode { node: node.index });
        }
        let pos = self.nodes.len();
        self.position.insert(node.index, pos);
        self.nodes.push(node);
        Ok(pos)
    }

    /// Append an edge after checking both endpoints exist.
    pub fn add_edge(&mut self, edge: MrfEdge) -> Result<(), MrfError> {
        for endpoint in [edge.first, edge.second] {
            if !self.position.contains_key(&endpoint) {
                return Err(MrfError::UnknownNode {
                    node: endpoint,
                    edge: (edge.first, edge.second),
                });
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    #[inline]
    pub fn nodes(&self) -> &[MrfNode<P>] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[MrfEdge] {
        &self.edges
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Position (assignment slot) of the node with the given index.
    #[inline]
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.position.get(&index).copied()
    }

    pub fn node_by_index(&self, index: usize) -> Option<&MrfNode<P>> {
        self.position_of(index).map(|p| &self.nodes[p])
    }

    /// Positions of both endpoints of an edge. Endpoints were validated on insert.
    #[inline]
    pub(crate) fn endpoints(&self, edge: &MrfEdge) -> (usize, usize) {
        (self.position[&edge.first], self.position[&edge.second])
    }

    /// Check every energy table covers `num_labels` labels.
    pub fn validate(&self, num_labels: usize) -> Result<(), MrfError> {
        for n in &self.nodes {
            if n.num_labels() < num_labels {
                return Err(MrfError::TooFewLabels {
                    what: format!("node {}", n.index),
                    have: n.num_labels(),
                    need: num_labels,
                });
            }
        }
        for e in &self.edges {
            if e.num_labels() < num_labels {
                return Err(MrfError::TooFewLabels {
                    what: format!("edge {}-{}", e.first, e.second),
                    have: e.num_labels(),
                    need: num_labels,
                });
            }
        }
        Ok(())
    }

    /// Drop all nodes and edges, releasing their storage.
    pub fn clear(&mut self) {
        self.nodes = Vec::new();
        self.edges = Vec::new();
        self.position = HashMap::new();
    }
}

fn check_potentials(potentials: &[Option<f64>]) -> Result<(), MrfError> {
    match potentials
        .iter()
        .flatten()
        .copied()
        .find(|&p| !is_valid_potential(p))
    {
        Some(value) => Err(MrfError::InvalidPotential { value }),
        None => Ok(()),
    }
}
