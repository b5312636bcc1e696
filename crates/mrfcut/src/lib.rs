//! Alpha-expansion labeling over pairwise MRFs, solved through s-t min cuts.
//!
//! Layers, leaves first:
//! - `energy`: potentials → zero-normalized energies.
//! - `mrf`: nodes, edges and the graph container.
//! - `flow`: capacitated graphs and the Edmonds-Karp min cut.
//! - `expansion`: binary reduction of an alpha step and the sweep loop.
//! - `generate`: reproducible random Potts instances.
//!
//! API Policy
//! - Project-internal crate; no stable public API. `api` collects the
//!   re-exports callers (CLI, Python bindings) are expected to use.

pub mod api;
pub mod energy;
pub mod expansion;
pub mod flow;
pub mod generate;
pub mod mrf;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use expansion::{AlphaExpander, Expansion, ExpansionCfg, ExpansionError};
pub use mrf::{MrfEdge, MrfError, MrfGraph, MrfNode};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::energy::{energies_from_potentials, zero_normalize, IMPOSSIBLE_ENERGY};
    pub use crate::expansion::{expand, score, total_energy, AlphaExpander, ExpansionCfg};
    pub use crate::flow::{min_cut, st_min_cut, FlowGraph, MinCutCfg, UndirectedGraph, VertexId};
    pub use crate::mrf::{MrfEdge, MrfGraph, MrfNode};
}
