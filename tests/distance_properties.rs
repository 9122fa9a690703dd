mod common;

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{random_batch, random_elements};
use unique_orbits::distance::{distance_matrix, pair_distance, self_distance_matrix};
use unique_orbits::orbit_batch::{OrbitBatch, OrbitColumns};

/// Absolute tolerance scaled to the magnitude of the compared distances (km).
fn tolerance(value: f64) -> f64 {
    1e-9 * value.abs().max(1_000.0)
}

#[test]
fn test_self_distance_is_zero() {
    let mut rng = StdRng::seed_from_u64(42);
    let batch = random_batch(&mut rng, 64);

    let full = distance_matrix(&batch, &batch);
    let symmetric = self_distance_matrix(&batch);
    for i in 0..batch.len() {
        assert_abs_diff_eq!(full[(i, i)], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(symmetric[(i, i)], 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_swap_symmetry() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_batch(&mut rng, 23);
    let b = random_batch(&mut rng, 31);

    let ab = distance_matrix(&a, &b);
    let ba = distance_matrix(&b, &a);
    assert_eq!(ab.shape(), (23, 31));
    assert_eq!(ba.shape(), (31, 23));

    for i in 0..a.len() {
        for j in 0..b.len() {
            assert_abs_diff_eq!(ab[(i, j)], ba[(j, i)], epsilon = tolerance(ab[(i, j)]));
        }
    }
}

#[test]
fn test_invariant_under_global_node_rotation() {
    let mut rng = StdRng::seed_from_u64(2024);
    let a = random_batch(&mut rng, 20);
    let b = random_batch(&mut rng, 15);

    let rotate = |batch: &OrbitBatch, offset: f64| {
        let columns = batch.clone().into_columns();
        OrbitBatch::from_columns(OrbitColumns {
            ascending_node: columns.ascending_node.add_scalar(offset),
            ..columns
        })
        .unwrap()
    };

    let reference = distance_matrix(&a, &b);
    for offset in [0.3, 1.7, -2.9] {
        let rotated = distance_matrix(&rotate(&a, offset), &rotate(&b, offset));
        for (r, o) in reference.iter().zip(rotated.iter()) {
            assert_abs_diff_eq!(*r, *o, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_bulk_matches_pairwise_reference() {
    let mut rng = StdRng::seed_from_u64(99);
    let rows = random_elements(&mut rng, 17);
    let cols = random_elements(&mut rng, 40);

    let matrix = distance_matrix(
        &OrbitBatch::from_elements(&rows),
        &OrbitBatch::from_elements(&cols),
    );
    for (i, first) in rows.iter().enumerate() {
        for (j, second) in cols.iter().enumerate() {
            assert_eq!(
                matrix[(i, j)].to_bits(),
                pair_distance(first, second).to_bits()
            );
        }
    }
}

#[test]
fn test_distances_are_non_negative() {
    let mut rng = StdRng::seed_from_u64(5);
    let batch = random_batch(&mut rng, 50);
    let matrix = self_distance_matrix(&batch);
    assert!(matrix.iter().all(|d| *d >= -1e-9));
}
