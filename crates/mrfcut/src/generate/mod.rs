//! Random Potts MRFs for tests, benches and the CLI.
//!
//! Purpose
//! - Produce reproducible labeling problems: random unary potentials plus a
//!   Potts pairwise table (`1` on equal labels, `1 - smoothness` otherwise).
//!
//! Why this design
//! - Every sample carries the params snapshot plus a seed replay token.
//! - `MrfGenerator` exposes both streaming (`generate_next`) and replay
//!   (`regenerate`) so callers can store seeds instead of graphs.
//! - Potts tables satisfy the expansion precondition for any smoothness in
//!   `[0, 1)`, so generated graphs pass `check_expandable`.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::mrf::{MrfEdge, MrfError, MrfGraph, MrfNode};

/// Error type shared by all generators.
#[derive(Debug)]
pub enum GeneratorError {
    InvalidParams { reason: String },
    DegenerateSample { reason: String },
}

impl GeneratorError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl From<MrfError> for GeneratorError {
    fn from(e: MrfError) -> Self {
        Self::DegenerateSample {
            reason: e.to_string(),
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid generator params: {reason}"),
            Self::DegenerateSample { reason } => write!(f, "degenerate sample: {reason}"),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// A generated MRF plus replay metadata.
#[derive(Clone, Debug)]
pub struct MrfSample<P, R> {
    pub mrf: MrfGraph,
    pub params: P,
    pub replay: R,
}

/// Common trait for reproducible MRF sources.
pub trait MrfGenerator {
    type Params: Clone;
    type Replay: Clone;

    fn params(&self) -> &Self::Params;

    fn generate_next(&mut self) -> Result<MrfSample<Self::Params, Self::Replay>, GeneratorError>;

    fn regenerate(&self, replay: &Self::Replay) -> Result<MrfGraph, GeneratorError>;
}

/// Edge layout of a generated MRF. Node indices run `0..nodes`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Topology {
    /// `i - i+1`.
    Chain,
    /// 4-neighbour grid with rows of `width` nodes.
    Grid { width: usize },
    /// Each pair `i < j` independently with probability `edge_prob`.
    Random { edge_prob: f64 },
}

/// Parameters for random Potts MRFs.
#[derive(Clone, Debug)]
pub struct PottsParams {
    pub nodes: usize,
    pub labels: usize,
    pub topology: Topology,
    /// Pairwise potential of unequal labels is `1 - smoothness`.
    pub smoothness: f64,
    /// Probability that a unary potential is missing (impossible label).
    pub missing_prob: f64,
}

impl Default for PottsParams {
    fn default() -> Self {
        Self {
            nodes: 16,
            labels: 3,
            topology: Topology::Chain,
            smoothness: 0.3,
            missing_prob: 0.0,
        }
    }
}

impl PottsParams {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.nodes == 0 {
            return Err(GeneratorError::invalid("need at least one node"));
        }
        if self.labels == 0 {
            return Err(GeneratorError::invalid("need at least one label"));
        }
        if !(0.0..1.0).contains(&self.smoothness) {
            return Err(GeneratorError::invalid("smoothness must lie in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.missing_prob) {
            return Err(GeneratorError::invalid("missing_prob must lie in [0, 1]"));
        }
        match self.topology {
            Topology::Grid { width } if width == 0 => {
                Err(GeneratorError::invalid("grid width must be > 0"))
            }
            Topology::Random { edge_prob } if !(0.0..=1.0).contains(&edge_prob) => {
                Err(GeneratorError::invalid("edge_prob must lie in [0, 1]"))
            }
            _ => Ok(()),
        }
    }

    /// Row-major `labels × labels` Potts table.
    pub fn pairwise_potentials(&self) -> Vec<f64> {
        let l = self.labels;
        (0..l * l)
            .map(|k| if k / l == k % l { 1.0 } else { 1.0 - self.smoothness })
            .collect()
    }

    fn edge_pairs(&self, rng: &mut StdRng) -> Vec<(usize, usize)> {
        let n = self.nodes;
        match self.topology {
            Topology::Chain => (1..n).map(|i| (i - 1, i)).collect(),
            Topology::Grid { width } => {
                let mut pairs = Vec::new();
                for i in 0..n {
                    if (i + 1) % width != 0 && i + 1 < n {
                        pairs.push((i, i + 1));
                    }
                    if i + width < n {
                        pairs.push((i, i + width));
                    }
                }
                pairs
            }
            Topology::Random { edge_prob } => {
                let mut pairs = Vec::new();
                for i in 0..n {
                    for j in i + 1..n {
                        if rng.gen_bool(edge_prob) {
                            pairs.push((i, j));
                        }
                    }
                }
                pairs
            }
        }
    }
}

/// Replay token storing the seed that regenerates the same sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedReplay {
    pub seed: u64,
}

/// Generator for random Potts MRFs.
pub struct PottsGenerator {
    params: PottsParams,
    master_rng: StdRng,
}

impl PottsGenerator {
    pub fn new(params: PottsParams, seed: u64) -> Result<Self, GeneratorError> {
        params.validate()?;
        Ok(Self {
            params,
            master_rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn generate_single(params: &PottsParams, seed: u64) -> Result<MrfGraph, GeneratorError> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut mrf = MrfGraph::new();
        for index in 0..params.nodes {
            let potentials: Vec<Option<f64>> = (0..params.labels)
                .map(|_| {
                    if params.missing_prob > 0.0 && rng.gen_bool(params.missing_prob) {
                        None
                    } else {
                        Some(rng.gen_range(0.05..1.0))
                    }
                })
                .collect();
            mrf.add_node(MrfNode::new(index, potentials)?)?;
        }
        let table = params.pairwise_potentials();
        for (first, second) in params.edge_pairs(&mut rng) {
            mrf.add_edge(MrfEdge::from_potentials(first, second, &table)?)?;
        }
        Ok(mrf)
    }
}

impl MrfGenerator for PottsGenerator {
    type Params = PottsParams;
    type Replay = SeedReplay;

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn generate_next(&mut self) -> Result<MrfSample<Self::Params, Self::Replay>, GeneratorError> {
        let seed = self.master_rng.next_u64();
        let mrf = Self::generate_single(&self.params, seed)?;
        Ok(MrfSample {
            mrf,
            params: self.params.clone(),
            replay: SeedReplay { seed },
        })
    }

    fn regenerate(&self, replay: &Self::Replay) -> Result<MrfGraph, GeneratorError> {
        Self::generate_single(&self.params, replay.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mrf::check_expandable;

    #[test]
    fn grid_has_four_neighbour_edges() {
        let params = PottsParams {
            nodes: 6,
            topology: Topology::Grid { width: 3 },
            ..PottsParams::default()
        };
        let mrf = PottsGenerator::generate_single(&params, 1).unwrap();
        // 2 rows × 2 horizontal + 3 vertical.
        assert_eq!(mrf.edge_count(), 7);
        assert_eq!(mrf.node_count(), 6);
    }

    #[test]
    fn replay_reproduces_sample() {
        let params = PottsParams {
            nodes: 10,
            topology: Topology::Random { edge_prob: 0.4 },
            missing_prob: 0.1,
            ..PottsParams::default()
        };
        let mut generator = PottsGenerator::new(params, 7).unwrap();
        let sample = generator.generate_next().unwrap();
        let again = generator.regenerate(&sample.replay).unwrap();
        assert_eq!(sample.mrf.edge_count(), again.edge_count());
        for (a, b) in sample.mrf.nodes().iter().zip(again.nodes()) {
            assert_eq!(a.potentials(), b.potentials());
        }
    }

    #[test]
    fn potts_tables_are_expandable() {
        let params = PottsParams {
            nodes: 5,
            labels: 4,
            smoothness: 0.9,
            ..PottsParams::default()
        };
        let mrf = PottsGenerator::generate_single(&params, 3).unwrap();
        assert!(check_expandable(&mrf, 4).is_ok());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let bad = [
            PottsParams {
                nodes: 0,
                ..PottsParams::default()
            },
            PottsParams {
                smoothness: 1.0,
                ..PottsParams::default()
            },
            PottsParams {
                topology: Topology::Grid { width: 0 },
                ..PottsParams::default()
            },
            PottsParams {
                topology: Topology::Random { edge_prob: 1.5 },
                ..PottsParams::default()
            },
        ];
        for params in bad {
            assert!(matches!(
                PottsGenerator::new(params, 0),
                Err(GeneratorError::InvalidParams { .. })
            ));
        }
    }
}
