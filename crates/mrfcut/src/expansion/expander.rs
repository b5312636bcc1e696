//! Sweep loop: one alpha step per label, repeated until the assignment settles.

use crate::flow::{st_min_cut, MinCutCfg, DEFAULT_INFINITY};
use crate::mrf::{check_expandable, MrfGraph};

use super::reduce::{alpha_graph, SOURCE};
use super::score::{score, total_energy};
use super::ExpansionError;

/// Upper bound on sweeps unless configured otherwise.
pub const DEFAULT_MAX_SWEEPS: usize = 1000;

/// Expansion parameters.
#[derive(Clone, Debug)]
pub struct ExpansionCfg {
    /// Labels are `0..num_labels`; every energy table must cover them.
    pub num_labels: usize,
    /// Reject MRFs whose pairwise tables admit a non-submodular alpha step.
    pub check_expandable: bool,
    /// Ties in the move score can make sweeps cycle; stop after this many.
    pub max_sweeps: usize,
    /// Source label of the min-cut solver; must exceed any terminal capacity.
    pub infinity: f64,
}

impl ExpansionCfg {
    pub fn new(num_labels: usize) -> Self {
        Self {
            num_labels,
            check_expandable: false,
            max_sweeps: DEFAULT_MAX_SWEEPS,
            infinity: DEFAULT_INFINITY,
        }
    }
}

/// Final assignment and a short trace of how it was reached.
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion {
    /// One label per node, in node insertion order.
    pub assignment: Vec<usize>,
    pub score: f64,
    pub initial_score: f64,
    /// Unary + pairwise energy of `assignment`.
    pub energy: f64,
    pub sweeps: usize,
    /// Score after each accepted move; non-increasing.
    pub history: Vec<f64>,
}

/// Alpha-expansion solver.
#[derive(Clone, Debug)]
pub struct AlphaExpander {
    cfg: ExpansionCfg,
}

impl AlphaExpander {
    pub fn new(cfg: ExpansionCfg) -> Self {
        Self { cfg }
    }

    #[inline]
    pub fn cfg(&self) -> &ExpansionCfg {
        &self.cfg
    }

    /// Run expansion from `start` (one label per node, in insertion order).
    ///
    /// Each sweep tries every alpha in `0..num_labels`. A candidate replaces
    /// the current assignment iff it differs and does not raise the score.
    /// The loop ends after a sweep without accepted moves, or when the last
    /// candidate of a sweep (accepted or not) equals the last candidate of the
    /// previous sweep.
    pub fn expand<P>(
        &self,
        mrf: &MrfGraph<P>,
        start: &[usize],
    ) -> Result<Expansion, ExpansionError> {
        self.validate(mrf, start)?;
        let mut current = start.to_vec();
        let mut current_score = score(mrf, &current);
        let initial_score = current_score;
        let mut history = Vec::new();
        let mut previous_last: Option<Vec<usize>> = None;
        let mut sweeps = 0usize;

        loop {
            sweeps += 1;
            let mut changed = false;
            let mut last_candidate = current.clone();
            for alpha in 0..self.cfg.num_labels {
                let candidate = self.alpha_move(mrf, &current, alpha)?;
                if candidate == current {
                    tracing::trace!(sweep = sweeps, alpha, "no move");
                    last_candidate = candidate;
                    continue;
                }
                let candidate_score = score(mrf, &candidate);
                let accepted = candidate_score <= current_score;
                tracing::debug!(
                    sweep = sweeps,
                    alpha,
                    score = candidate_score,
                    current = current_score,
                    accepted,
                    "alpha move"
                );
                if accepted {
                    current = candidate.clone();
                    current_score = candidate_score;
                    history.push(candidate_score);
                    changed = true;
                }
                last_candidate = candidate;
            }
            if !changed {
                break;
            }
            if previous_last.as_ref() == Some(&last_candidate) {
                tracing::debug!(sweep = sweeps, "sweep repeated previous candidate");
                break;
            }
            if sweeps >= self.cfg.max_sweeps {
                tracing::warn!(sweeps, "expansion stopped at sweep limit");
                break;
            }
            previous_last = Some(last_candidate);
        }

        let energy = total_energy(mrf, &current);
        tracing::info!(
            sweeps,
            moves = history.len(),
            score = current_score,
            energy,
            "expansion finished"
        );
        Ok(Expansion {
            assignment: current,
            score: current_score,
            initial_score,
            energy,
            sweeps,
            history,
        })
    }

    /// Candidate of a single alpha step: nodes on the sink side of the min
    /// cut switch to `alpha`, all others keep their label.
    pub fn step<P>(
        &self,
        mrf: &MrfGraph<P>,
        current: &[usize],
        alpha: usize,
    ) -> Result<Vec<usize>, ExpansionError> {
        self.validate(mrf, current)?;
        if alpha >= self.cfg.num_labels {
            return Err(ExpansionError::AlphaOutOfRange {
                alpha,
                num_labels: self.cfg.num_labels,
            });
        }
        self.alpha_move(mrf, current, alpha)
    }

    /// `step` without input checks; `current` and `alpha` are in range.
    fn alpha_move<P>(
        &self,
        mrf: &MrfGraph<P>,
        current: &[usize],
        alpha: usize,
    ) -> Result<Vec<usize>, ExpansionError> {
        let mut binary = alpha_graph(mrf, current, alpha);
        let violations = binary.non_submodular_edges();
        if violations > 0 {
            tracing::warn!(
                alpha,
                violations,
                "non-submodular binary edges, cut may be suboptimal"
            );
        }
        let mut st = binary.st_graph()?;
        binary.clear();
        let cut_cfg = MinCutCfg {
            infinity: self.cfg.infinity,
            ..MinCutCfg::default()
        };
        let cut = st_min_cut(&st.graph, st.source, st.sink, &cut_cfg)?;

        let prefix = format!("{SOURCE}_");
        let mut candidate = current.to_vec();
        for &e in cut.edge_set_cut_min() {
            let name = st.graph.edge(e).name.as_str();
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let position = rest
                .parse::<usize>()
                .ok()
                .and_then(|index| mrf.position_of(index))
                .ok_or_else(|| ExpansionError::MalformedCutEdge {
                    name: name.to_string(),
                })?;
            candidate[position] = alpha;
        }
        st.graph.clear();
        Ok(candidate)
    }

    fn validate<P>(&self, mrf: &MrfGraph<P>, start: &[usize]) -> Result<(), ExpansionError> {
        let num_labels = self.cfg.num_labels;
        if num_labels == 0 {
            return Err(ExpansionError::NoLabels);
        }
        if start.len() != mrf.node_count() {
            return Err(ExpansionError::StartLength {
                expected: mrf.node_count(),
                got: start.len(),
            });
        }
        let out_of_range = start.iter().enumerate().find(|(_, &l)| l >= num_labels);
        if let Some((position, &label)) = out_of_range {
            return Err(ExpansionError::LabelOutOfRange {
                position,
                label,
                num_labels,
            });
        }
        mrf.validate(num_labels)?;
        if self.cfg.check_expandable {
            check_expandable(mrf, num_labels)?;
        }
        Ok(())
    }
}

/// Expand with default settings and return only the assignment.
pub fn expand<P>(
    mrf: &MrfGraph<P>,
    start: &[usize],
    num_labels: usize,
) -> Result<Vec<usize>, ExpansionError> {
    AlphaExpander::new(ExpansionCfg::new(num_labels))
        .expand(mrf, start)
        .map(|e| e.assignment)
}
