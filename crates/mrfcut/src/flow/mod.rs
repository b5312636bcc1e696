//! Capacitated graphs and the Edmonds-Karp s-t min-cut.
//!
//! Purpose
//! - A minimal directed graph with named numeric arc attributes and a scratch
//!   value per vertex, enough for augmenting-path labeling.
//! - An undirected variant that is lowered to the directed one (each edge
//!   becomes two opposite arcs of equal capacity) before solving.
//!
//! Layout
//! - `graph.rs`: `FlowGraph` (directed).
//! - `undirected.rs`: `UndirectedGraph` and its lowering.
//! - `mincut.rs`: Edmonds-Karp labeling on a `FlowGraph`.
//! - `st.rs`: s-t min-cut on an `UndirectedGraph`.

mod graph;
mod mincut;
mod st;
mod undirected;

use std::fmt;

pub use graph::{Arc, FlowGraph, Vertex, DEFAULT_CAPACITY_KEY};
pub use mincut::{min_cut, MinCutCfg, MinCutResult, DEFAULT_INFINITY};
pub use st::{st_min_cut, StCut};
pub use undirected::{Edge, UndirectedGraph};

/// Vertex handle (position in the owning graph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

/// Arc handle of a `FlowGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId(pub usize);

/// Edge handle of an `UndirectedGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Errors raised by graph construction and the min-cut solver.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowError {
    /// Vertex handle does not belong to the graph.
    UnknownVertex { vertex: VertexId },
    /// Source and sink are the same vertex.
    SourceIsSink { vertex: VertexId },
    /// An arc lacks the capacity attribute the solver was told to read.
    MissingCapacity { arc: ArcId, key: String },
    /// A capacity is NaN.
    InvalidCapacity { value: f64 },
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::UnknownVertex { vertex } => write!(f, "unknown vertex {}", vertex.0),
            FlowError::SourceIsSink { vertex } => {
                write!(f, "source and sink are the same vertex ({})", vertex.0)
            }
            FlowError::MissingCapacity { arc, key } => {
                write!(f, "arc {} has no numeric attribute {key:?}", arc.0)
            }
            FlowError::InvalidCapacity { value } => write!(f, "capacity {value} is not a number"),
        }
    }
}

impl std::error::Error for FlowError {}
