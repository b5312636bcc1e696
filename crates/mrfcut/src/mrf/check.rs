//! Expansion precondition on pairwise tables.
//!
//! An alpha step on edge `(u, v)` with current labels `(a, b)` produces the
//! binary table `[E(a,b), E(a,α), E(α,b), E(α,α)]`. The cut is exact only if
//! that table is submodular: `E(a,b) + E(α,α) <= E(a,α) + E(α,b)`.

use crate::energy::is_impossible;

use super::{MrfEdge, MrfError, MrfGraph};

/// Slack for rounding in the submodularity inequality.
const SUBMODULAR_EPS: f64 = 1e-9;

/// First `(labels, alpha)` for which the edge's binary table would be
/// non-submodular, if any. Impossible entries are skipped.
pub fn expansion_violation(edge: &MrfEdge, num_labels: usize) -> Option<((usize, usize), usize)> {
    for a in 0..num_labels {
        for b in 0..num_labels {
            for alpha in 0..num_labels {
                let e00 = edge.energy(a, b);
                let e01 = edge.energy(a, alpha);
                let e10 = edge.energy(alpha, b);
                let e11 = edge.energy(alpha, alpha);
                if [e00, e01, e10, e11].into_iter().any(is_impossible) {
                    continue;
                }
                if e00 + e11 > e01 + e10 + SUBMODULAR_EPS {
                    return Some(((a, b), alpha));
                }
            }
        }
    }
    None
}

/// Check that every alpha step on every edge reduces to an exact cut.
pub fn check_expandable<P>(graph: &MrfGraph<P>, num_labels: usize) -> Result<(), MrfError> {
    for edge in graph.edges() {
        if let Some((labels, alpha)) = expansion_violation(edge, num_labels) {
            return Err(MrfError::NotExpandable {
                edge: (edge.first(), edge.second()),
                labels,
                alpha,
            });
        }
    }
    Ok(())
}
