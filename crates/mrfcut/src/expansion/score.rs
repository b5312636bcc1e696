//! Assignment scores.

use crate::energy::{is_impossible, IMPOSSIBLE_PENALTY};
use crate::mrf::MrfGraph;

#[inline]
fn charged(e: f64) -> f64 {
    if is_impossible(e) {
        IMPOSSIBLE_PENALTY
    } else {
        e
    }
}

/// Score used to accept or reject expansion moves.
///
/// For every edge, the node energies of both endpoints at their assigned
/// labels are added. Nodes thus count once per incident edge and isolated
/// nodes not at all; pairwise energies do not enter. Impossible energies add
/// [`IMPOSSIBLE_PENALTY`].
pub fn score<P>(mrf: &MrfGraph<P>, assignment: &[usize]) -> f64 {
    mrf.edges()
        .iter()
        .map(|edge| {
            let (first, second) = mrf.endpoints(edge);
            let nodes = mrf.nodes();
            charged(nodes[first].energy(assignment[first]))
                + charged(nodes[second].energy(assignment[second]))
        })
        .sum()
}

/// Conventional MRF energy: each node's unary energy once plus each edge's
/// pairwise energy. Reported next to [`score`]; the expansion loop does not use it.
pub fn total_energy<P>(mrf: &MrfGraph<P>, assignment: &[usize]) -> f64 {
    let unary: f64 = mrf
        .nodes()
        .iter()
        .zip(assignment)
        .map(|(node, &label)| charged(node.energy(label)))
        .sum();
    let pairwise: f64 = mrf
        .edges()
        .iter()
        .map(|edge| {
            let (first, second) = mrf.endpoints(edge);
            charged(edge.energy(assignment[first], assignment[second]))
        })
        .sum();
    unary + pairwise
}
