//! Pairwise Markov Random Field model.
//!
//! Purpose
//! - Hold per-node label energies and per-edge label-pair energies derived
//!   from potentials, with the structural checks the solver relies on.
//!
//! Layout
//! - `types.rs`: `MrfNode`, `MrfEdge`, `MrfGraph`.
//! - `check.rs`: the expansion precondition on pairwise tables.

mod check;
mod types;

use std::fmt;

pub use check::{check_expandable, expansion_violation};
pub use types::{MrfEdge, MrfGraph, MrfNode};

/// Errors raised while building or validating an MRF.
#[derive(Debug, Clone, PartialEq)]
pub enum MrfError {
    /// A potential is negative, NaN or infinite.
    InvalidPotential { value: f64 },
    /// Pairwise potentials do not form an `L×L` table.
    NonSquareTable { edge: (usize, usize), len: usize },
    /// Two nodes share an index.
    DuplicateNode { node: usize },
    /// An edge references a node that is not in the graph.
    UnknownNode { node: usize, edge: (usize, usize) },
    /// A replacement energy is NaN or negative infinity.
    InvalidEnergy { node: usize, value: f64 },
    /// Replacement energies do not match the label count.
    EnergyLength { node: usize, expected: usize, got: usize },
    /// A node or edge table is smaller than the requested label count.
    TooFewLabels { what: String, have: usize, need: usize },
    /// Some alpha step of an edge would be non-submodular.
    NotExpandable {
        edge: (usize, usize),
        labels: (usize, usize),
        alpha: usize,
    },
}

impl fmt::Display for MrfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MrfError::InvalidPotential { value } => {
                write!(f, "potential {value} is not a finite non-negative number")
            }
            MrfError::NonSquareTable { edge, len } => write!(
                f,
                "edge {}-{} has {len} pairwise potentials (need L*L entries)",
                edge.0, edge.1
            ),
            MrfError::DuplicateNode { node } => write!(f, "node index {node} is already present"),
            MrfError::UnknownNode { node, edge } => write!(
                f,
                "edge {}-{} references unknown node {node}",
                edge.0, edge.1
            ),
            MrfError::InvalidEnergy { node, value } => {
                write!(f, "node {node} got energy {value}, expected a number or +inf")
            }
            MrfError::EnergyLength {
                node,
                expected,
                got,
            } => write!(f, "node {node} expects {expected} energies, got {got}"),
            MrfError::TooFewLabels { what, have, need } => {
                write!(f, "{what} has {have} labels, expansion needs {need}")
            }
            MrfError::NotExpandable { edge, labels, alpha } => write!(
                f,
                "edge {}-{} is not submodular for labels {:?} expanding to {alpha}",
                edge.0, edge.1, labels
            ),
        }
    }
}

impl std::error::Error for MrfError {}
