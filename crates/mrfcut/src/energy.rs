//! Energies from potentials (`E = -ln p`) and zero-normalization.
//!
//! Purpose
//! - Turn un-normalized potentials into energies that the binary reduction and
//!   the scorer can compare without non-finite arithmetic.
//!
//! Conventions
//! - A missing or zero potential stands for `-ln 0 = +∞`. We store the finite
//!   sentinel [`IMPOSSIBLE_ENERGY`] instead so capacities and deltas never turn
//!   into NaN; the scorer charges a fixed penalty for it.
//! - Normalization subtracts the minimum over possible entries so the smallest
//!   entry is exactly 0. Sentinel entries are left untouched, which keeps the
//!   operation idempotent.

/// Finite stand-in for the energy of a zero (or missing) potential.
pub const IMPOSSIBLE_ENERGY: f64 = 1e9;

/// Score contribution charged for an impossible energy instead of the sentinel.
pub const IMPOSSIBLE_PENALTY: f64 = 1.0;

/// True if `e` is the impossible-energy sentinel.
#[inline]
pub fn is_impossible(e: f64) -> bool {
    e >= IMPOSSIBLE_ENERGY
}

/// Potential is usable as `-ln p`: finite and non-negative. Zero is allowed
/// (it maps to the sentinel); negative, NaN and infinite values are not.
#[inline]
pub fn is_valid_potential(p: f64) -> bool {
    p.is_finite() && p >= 0.0
}

/// Energy of a single potential. `None` and `0` map to [`IMPOSSIBLE_ENERGY`].
#[inline]
pub fn energy_of(potential: Option<f64>) -> f64 {
    match potential {
        Some(p) if p > 0.0 => (-p.ln()).min(IMPOSSIBLE_ENERGY),
        _ => IMPOSSIBLE_ENERGY,
    }
}

/// Map potentials to zero-normalized energies.
///
/// Higher potential gives lower energy; the minimum of the result is 0.
pub fn energies_from_potentials(potentials: &[Option<f64>]) -> Vec<f64> {
    let mut energies: Vec<f64> = potentials.iter().map(|&p| energy_of(p)).collect();
    zero_normalize(&mut energies);
    energies
}

/// Shift possible entries so their minimum becomes 0, in place.
///
/// If every entry is impossible the slice is set to all zeros: the labels are
/// then equally (im)plausible and only their differences matter downstream.
pub fn zero_normalize(energies: &mut [f64]) {
    let min = energies
        .iter()
        .copied()
        .filter(|&e| !is_impossible(e))
        .fold(f64::INFINITY, f64::min);
    if min.is_finite() {
        for e in energies.iter_mut().filter(|e| !is_impossible(**e)) {
            *e -= min;
        }
    } else {
        energies.iter_mut().for_each(|e| *e = 0.0);
    }
}

/// Plain min-shift used for the transient binary tables. No sentinel handling:
/// only differences between entries feed the capacities.
#[inline]
pub(crate) fn shift_to_zero(energies: &mut [f64]) {
    let min = energies.iter().copied().fold(f64::INFINITY, f64::min);
    if min.is_finite() {
        energies.iter_mut().for_each(|e| *e -= min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn potentials_strategy() -> impl Strategy<Value = Vec<Option<f64>>> {
        prop::collection::vec(prop::option::weighted(0.9, 1e-6f64..10.0), 1..12)
    }

    #[test]
    fn missing_and_zero_potentials_map_to_sentinel() {
        let e = energies_from_potentials(&[Some(0.5), None, Some(0.0)]);
        assert_eq!(e[0], 0.0);
        assert!(is_impossible(e[1]));
        assert!(is_impossible(e[2]));
    }

    #[test]
    fn two_label_node_prefers_higher_potential() {
        let e = energies_from_potentials(&[Some(0.9), Some(0.1)]);
        assert_eq!(e[0], 0.0);
        let expected = (-(0.1f64).ln()) - (-(0.9f64).ln());
        assert!((e[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn all_impossible_collapses_to_zero() {
        let e = energies_from_potentials(&[None, Some(0.0)]);
        assert_eq!(e, vec![0.0, 0.0]);
    }

    #[test]
    fn shift_to_zero_keeps_differences() {
        let mut pair = [3.5, -1.0];
        shift_to_zero(&mut pair);
        assert_eq!(pair, [4.5, 0.0]);
    }

    proptest! {
        #[test]
        fn normalized_minimum_is_zero(p in potentials_strategy()) {
            let e = energies_from_potentials(&p);
            prop_assert_eq!(e.len(), p.len());
            let min = e.iter().copied().fold(f64::INFINITY, f64::min);
            prop_assert_eq!(min, 0.0);
        }

        #[test]
        fn normalization_is_idempotent(p in potentials_strategy()) {
            let once = energies_from_potentials(&p);
            let mut twice = once.clone();
            zero_normalize(&mut twice);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn energy_order_inverts_potential_order(
            p in prop::collection::vec(1e-6f64..10.0, 2..12)
        ) {
            let wrapped: Vec<Option<f64>> = p.iter().copied().map(Some).collect();
            let e = energies_from_potentials(&wrapped);
            for i in 0..p.len() {
                for j in 0..p.len() {
                    if p[i] > p[j] {
                        prop_assert!(e[i] <= e[j]);
                    }
                }
            }
        }
    }
}
