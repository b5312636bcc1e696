//! Alpha-expansion over a pairwise MRF.
//!
//! Purpose
//! - Approximate a minimum-energy labeling by repeatedly solving a binary
//!   "keep or switch to alpha" problem for every label alpha, each exactly via
//!   an s-t min cut.
//!
//! Why this design
//! - Each alpha step builds its own binary MRF and s-t graph and drops both
//!   afterwards; nothing is shared between steps except the assignment.
//! - Moves are accepted by [`score`], which sums endpoint node energies per edge.
//!   [`total_energy`] (unary + pairwise) is reported alongside for callers that
//!   want the conventional objective.
//!
//! Layout
//! - `reduce.rs`: binary MRF of an alpha step and its s-t graph.
//! - `score.rs`: move score and total energy.
//! - `expander.rs`: the sweep loop and its configuration.
//!
//! References
//! - Boykov, Veksler, Zabih, "Fast approximate energy minimization via graph cuts", PAMI 2001.
//! - Kolmogorov, Zabih, "What energy functions can be minimized via graph cuts?", PAMI 2004.

mod expander;
mod reduce;
mod score;

use std::fmt;

use crate::flow::FlowError;
use crate::mrf::MrfError;

pub use expander::{expand, AlphaExpander, Expansion, ExpansionCfg, DEFAULT_MAX_SWEEPS};
pub use reduce::{
    alpha_graph, source_edge_name, BinaryEdge, BinaryMrf, BinaryNode, StGraph, SINK, SOURCE,
};
pub use score::{score, total_energy};

/// Errors raised by the expansion loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpansionError {
    /// The label count is zero.
    NoLabels,
    /// The start assignment does not have one label per node.
    StartLength { expected: usize, got: usize },
    /// A start label is not below the label count.
    LabelOutOfRange {
        position: usize,
        label: usize,
        num_labels: usize,
    },
    /// Alpha given to a single step is not a label.
    AlphaOutOfRange { alpha: usize, num_labels: usize },
    /// A terminal cut edge name does not carry a known node index.
    MalformedCutEdge { name: String },
    Mrf(MrfError),
    Flow(FlowError),
}

impl fmt::Display for ExpansionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionError::NoLabels => write!(f, "label count must be at least 1"),
            ExpansionError::StartLength { expected, got } => {
                write!(f, "start assignment has {got} labels, graph has {expected} nodes")
            }
            ExpansionError::LabelOutOfRange {
                position,
                label,
                num_labels,
            } => write!(
                f,
                "start label {label} at position {position} is not below {num_labels}"
            ),
            ExpansionError::AlphaOutOfRange { alpha, num_labels } => {
                write!(f, "alpha {alpha} is not below {num_labels}")
            }
            ExpansionError::MalformedCutEdge { name } => {
                write!(f, "cut edge {name:?} does not name a node")
            }
            ExpansionError::Mrf(e) => write!(f, "invalid MRF: {e}"),
            ExpansionError::Flow(e) => write!(f, "min cut failed: {e}"),
        }
    }
}

impl std::error::Error for ExpansionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExpansionError::Mrf(e) => Some(e),
            ExpansionError::Flow(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MrfError> for ExpansionError {
    fn from(e: MrfError) -> Self {
        ExpansionError::Mrf(e)
    }
}

impl From<FlowError> for ExpansionError {
    fn from(e: FlowError) -> Self {
        ExpansionError::Flow(e)
    }
}

#[cfg(test)]
mod tests;
