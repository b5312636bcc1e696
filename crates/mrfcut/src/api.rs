//! Curated internal API (UNSTABLE).
//!
//! Important
//! - Not a public API. A convenience surface for the CLI, the Python bindings
//!   and benches. Breaking changes are allowed.

// Energy model
pub use crate::energy::{
    energies_from_potentials, energy_of, is_impossible, zero_normalize, IMPOSSIBLE_ENERGY,
    IMPOSSIBLE_PENALTY,
};
// MRF
pub use crate::mrf::{check_expandable, MrfEdge, MrfError, MrfGraph, MrfNode};
// Flow
pub use crate::flow::{
    min_cut, st_min_cut, ArcId, EdgeId, FlowError, FlowGraph, MinCutCfg, MinCutResult, StCut,
    UndirectedGraph, VertexId, DEFAULT_CAPACITY_KEY,
};
// Expansion
pub use crate::expansion::{
    alpha_graph, expand, score, total_energy, AlphaExpander, BinaryMrf, Expansion, ExpansionCfg,
    ExpansionError,
};
// Random instances
pub use crate::generate::{
    GeneratorError, MrfGenerator, PottsGenerator, PottsParams, SeedReplay, Topology,
};
