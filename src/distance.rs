//! # Orbital similarity distance
//!
//! Closed-form distance between two Keplerian orbits, combining the angle between
//! the orbital planes and the agreement of the perigee directions, scaled by the
//! semi-latus rectum of each orbit. Smaller values mean more similar orbits; the
//! distance of an orbit to itself is zero up to rounding.
//!
//! ## Formula
//! -----------------
//! For orbits 1 and 2, with `cᵢ = cos iᵢ`, `sᵢ = sin iᵢ`, `Δ = Ω₁ − Ω₂`:
//!
//! ```text
//! cos I = c₁c₂ + s₁s₂ cos Δ
//! cos P = s₁s₂ sin ω₁ sin ω₂
//!       + (cos ω₁ cos ω₂ + c₁c₂ sin ω₁ sin ω₂) cos Δ
//!       + (c₂ cos ω₁ sin ω₂ − c₁ sin ω₁ cos ω₂) sin Δ
//! D     = (1 + e₁²) p₁ + (1 + e₂²) p₂ − 2 √(p₁p₂) (cos I + e₁e₂ cos P)
//! ```
//!
//! `cos I` is the cosine of the angle between the two orbit normals and `cos P` the
//! cosine of the angle between the two perigee directions. `D` only depends on the
//! node difference `Δ`, so a common rotation of all nodes leaves it unchanged.
//!
//! ## Evaluation
//! -----------------
//! [`distance_matrix`] precomputes the trigonometric terms of each batch once, then
//! fills the `N × M` matrix one column (one orbit of the second batch) at a time.
//! With the `parallel` feature the columns are distributed over the `rayon` thread
//! pool. Each entry is produced by the same scalar expression as [`pair_distance`],
//! so the matrix does not depend on the number of threads and matches the
//! single-pair evaluation bit for bit.
//!
//! Degenerate inputs (`e ≥ 1`, `p ≤ 0`, NaN) are not rejected: the formula yields
//! NaN or nonsense values that callers can filter. See
//! [`OrbitalElementSet::check_physical`].
use itertools::izip;
use nalgebra::DVector;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    constants::DistanceMatrix, orbit_batch::OrbitBatch,
    orbit_type::orbital_element_set::OrbitalElementSet,
};

/// Per-orbit terms entering the distance.
#[derive(Debug, Clone, Copy)]
struct PlaneTerms {
    cos_i: f64,
    sin_i: f64,
    cos_w: f64,
    sin_w: f64,
    node: f64,
    ecc: f64,
    p: f64,
    /// `(1 + e²) p`
    shape: f64,
}

impl PlaneTerms {
    fn from_set(elements: &OrbitalElementSet) -> Self {
        PlaneTerms {
            cos_i: elements.inclination.cos(),
            sin_i: elements.inclination.sin(),
            cos_w: elements.periapsis_argument.cos(),
            sin_w: elements.periapsis_argument.sin(),
            node: elements.ascending_node,
            ecc: elements.eccentricity,
            p: elements.semi_latus_rectum,
            shape: shape_term(elements.eccentricity, elements.semi_latus_rectum),
        }
    }
}

#[inline]
fn shape_term(ecc: f64, p: f64) -> f64 {
    (1.0 + ecc * ecc) * p
}

/// Distance between two orbits given their precomputed terms.
#[inline]
fn kernel(o1: &PlaneTerms, o2: &PlaneTerms) -> f64 {
    let delta = o1.node - o2.node;
    let cos_d = delta.cos();
    let sin_d = delta.sin();

    let cos_inc = o1.cos_i * o2.cos_i + o1.sin_i * o2.sin_i * cos_d;
    let cos_per = o1.sin_i * o2.sin_i * o1.sin_w * o2.sin_w
        + (o1.cos_w * o2.cos_w + o1.cos_i * o2.cos_i * o1.sin_w * o2.sin_w) * cos_d
        + (o2.cos_i * o1.cos_w * o2.sin_w - o1.cos_i * o1.sin_w * o2.cos_w) * sin_d;

    o1.shape + o2.shape - 2.0 * (o1.p * o2.p).sqrt() * (cos_inc + o1.ecc * o2.ecc * cos_per)
}

/// Column-wise terms of a whole batch.
struct PlaneColumns {
    cos_i: DVector<f64>,
    sin_i: DVector<f64>,
    cos_w: DVector<f64>,
    sin_w: DVector<f64>,
    node: DVector<f64>,
    ecc: DVector<f64>,
    p: DVector<f64>,
    shape: DVector<f64>,
}

impl PlaneColumns {
    fn new(batch: &OrbitBatch) -> Self {
        let ecc = batch.eccentricity().clone();
        let p = batch.semi_latus_rectum().clone();
        let shape = ecc.zip_map(&p, shape_term);
        PlaneColumns {
            cos_i: batch.inclination().map(f64::cos),
            sin_i: batch.inclination().map(f64::sin),
            cos_w: batch.periapsis_argument().map(f64::cos),
            sin_w: batch.periapsis_argument().map(f64::sin),
            node: batch.ascending_node().clone(),
            ecc,
            p,
            shape,
        }
    }

    fn terms(&self, index: usize) -> PlaneTerms {
        PlaneTerms {
            cos_i: self.cos_i[index],
            sin_i: self.sin_i[index],
            cos_w: self.cos_w[index],
            sin_w: self.sin_w[index],
            node: self.node[index],
            ecc: self.ecc[index],
            p: self.p[index],
            shape: self.shape[index],
        }
    }

    /// Distances from every orbit of this batch to `other`, written into `out`.
    ///
    /// Only the first `out.len()` orbits are evaluated.
    fn fill_column(&self, other: &PlaneTerms, out: &mut [f64]) {
        for (d, &cos_i, &sin_i, &cos_w, &sin_w, &node, &ecc, &p, &shape) in izip!(
            out.iter_mut(),
            self.cos_i.iter(),
            self.sin_i.iter(),
            self.cos_w.iter(),
            self.sin_w.iter(),
            self.node.iter(),
            self.ecc.iter(),
            self.p.iter(),
            self.shape.iter()
        ) {
            let terms = PlaneTerms {
                cos_i,
                sin_i,
                cos_w,
                sin_w,
                node,
                ecc,
                p,
                shape,
            };
            *d = kernel(&terms, other);
        }
    }
}

/// Distance between two individual orbits.
///
/// Reference single-pair evaluation; [`distance_matrix`] returns exactly the same values.
///
/// Arguments
/// ---------
/// * `first`, `second` – The two element sets.
///
/// Return
/// ------
/// * The distance (km), NaN for degenerate inputs.
pub fn pair_distance(first: &OrbitalElementSet, second: &OrbitalElementSet) -> f64 {
    kernel(&PlaneTerms::from_set(first), &PlaneTerms::from_set(second))
}

/// Distance matrix between every orbit of `rows` and every orbit of `cols`.
///
/// Arguments
/// ---------
/// * `rows` – First batch (`N` orbits), indexes the matrix rows.
/// * `cols` – Second batch (`M` orbits), indexes the matrix columns.
///
/// Return
/// ------
/// * An `N × M` [`DistanceMatrix`]; empty (`0 × M` or `N × 0`) if either batch is empty.
///
/// See also
/// --------
/// * [`self_distance_matrix`] – Symmetric self-comparison computing each pair once.
pub fn distance_matrix(rows: &OrbitBatch, cols: &OrbitBatch) -> DistanceMatrix {
    let (n, m) = (rows.len(), cols.len());
    let mut matrix = DistanceMatrix::zeros(n, m);
    if n == 0 || m == 0 {
        return matrix;
    }

    let row_terms = PlaneColumns::new(rows);
    let col_terms = PlaneColumns::new(cols);
    let fill = |(j, column): (usize, &mut [f64])| {
        row_terms.fill_column(&col_terms.terms(j), column);
    };

    #[cfg(feature = "parallel")]
    matrix.as_mut_slice().par_chunks_mut(n).enumerate().for_each(fill);
    #[cfg(not(feature = "parallel"))]
    matrix.as_mut_slice().chunks_mut(n).enumerate().for_each(fill);

    matrix
}

/// Distance matrix of a batch against itself.
///
/// Only the upper triangle (diagonal included) is evaluated; the lower triangle is
/// mirrored from it, so the result is exactly symmetric. Entries may differ from
/// [`distance_matrix`]`(batch, batch)` in the last bits below the diagonal.
pub fn self_distance_matrix(batch: &OrbitBatch) -> DistanceMatrix {
    let n = batch.len();
    let mut matrix = DistanceMatrix::zeros(n, n);
    if n == 0 {
        return matrix;
    }

    let terms = PlaneColumns::new(batch);
    let fill = |(j, column): (usize, &mut [f64])| {
        terms.fill_column(&terms.terms(j), &mut column[..=j]);
    };

    #[cfg(feature = "parallel")]
    matrix.as_mut_slice().par_chunks_mut(n).enumerate().for_each(fill);
    #[cfg(not(feature = "parallel"))]
    matrix.as_mut_slice().chunks_mut(n).enumerate().for_each(fill);

    matrix.fill_lower_triangle_with_upper_triangle();
    matrix
}

#[cfg(test)]
mod distance_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_elements() -> Vec<OrbitalElementSet> {
        vec![
            OrbitalElementSet::new(7000.0, 0.001, 0.9, 0.0, 0.0),
            OrbitalElementSet::new(7000.0, 0.001, 0.9, 0.0, 0.001),
            OrbitalElementSet::new(7200.0, 0.02, 2.5, 1.2, 3.0),
            OrbitalElementSet::new(26_560.0, 0.01, 0.96, 4.0, 5.5),
            OrbitalElementSet::new(42_164.0, 0.0002, 0.001, 2.0, 1.0),
            OrbitalElementSet::new(24_500.0, 0.73, 0.5, 4.71, 0.3),
        ]
    }

    #[test]
    fn test_matrix_matches_pairwise_loop_exactly() {
        let elements = sample_elements();
        let batch = OrbitBatch::from_elements(&elements);
        let other = batch.select(&[5, 2, 0]).unwrap();

        let matrix = distance_matrix(&batch, &other);
        assert_eq!(matrix.shape(), (6, 3));
        for (i, a) in batch.iter().enumerate() {
            for (j, b) in other.iter().enumerate() {
                assert_eq!(matrix[(i, j)].to_bits(), pair_distance(&a, &b).to_bits());
            }
        }
    }

    #[test]
    fn test_self_distance_is_zero() {
        let batch = OrbitBatch::from_elements(&sample_elements());
        let matrix = distance_matrix(&batch, &batch);
        for i in 0..batch.len() {
            assert_abs_diff_eq!(matrix[(i, i)], 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_coplanar_circular_orbits() {
        // e = 0 and identical planes: D = p₁ + p₂ − 2√(p₁p₂) = (√p₁ − √p₂)²
        let a = OrbitalElementSet::new(7000.0, 0.0, 0.5, 0.0, 1.0);
        let b = OrbitalElementSet::new(8000.0, 0.0, 0.5, 2.0, 1.0);
        let expected = (7000.0_f64.sqrt() - 8000.0_f64.sqrt()).powi(2);
        assert_abs_diff_eq!(pair_distance(&a, &b), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_orthogonal_planes() {
        // cos I = 0 for equatorial vs polar circular orbits: D = p₁ + p₂
        let a = OrbitalElementSet::new(7000.0, 0.0, 0.0, 0.0, 0.0);
        let b = OrbitalElementSet::new(7000.0, 0.0, std::f64::consts::FRAC_PI_2, 0.0, 0.0);
        assert_abs_diff_eq!(pair_distance(&a, &b), 14_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_self_matrix_is_symmetric_and_consistent() {
        let batch = OrbitBatch::from_elements(&sample_elements());
        let full = distance_matrix(&batch, &batch);
        let sym = self_distance_matrix(&batch);

        assert_eq!(sym, sym.transpose());
        for i in 0..batch.len() {
            for j in 0..batch.len() {
                assert_abs_diff_eq!(sym[(i, j)], full[(i, j)], epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_empty_batches() {
        let batch = OrbitBatch::from_elements(&sample_elements());
        let empty = OrbitBatch::default();

        assert_eq!(distance_matrix(&batch, &empty).shape(), (6, 0));
        assert_eq!(distance_matrix(&empty, &batch).shape(), (0, 6));
        assert_eq!(self_distance_matrix(&empty).shape(), (0, 0));
    }

    #[test]
    fn test_degenerate_input_propagates_nan() {
        let bad = OrbitalElementSet::new(f64::NAN, 0.1, 0.9, 0.0, 0.0);
        let good = OrbitalElementSet::new(7000.0, 0.1, 0.9, 0.0, 0.0);
        let batch = OrbitBatch::from_elements(&[bad, good]);

        let matrix = distance_matrix(&batch, &batch);
        assert!(matrix[(0, 1)].is_nan());
        assert!(matrix[(1, 0)].is_nan());
        assert_abs_diff_eq!(matrix[(1, 1)], 0.0, epsilon = 1e-9);
    }
}
