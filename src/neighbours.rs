//! # Nearest-neighbour lookup
//!
//! For each object of a group, extract the `k` closest other objects of the same
//! distance matrix, closest first.
//!
//! Ordering is fully deterministic: distances sort ascending, every NaN distance
//! (degenerate elements give NaN of either sign) after every number, and equal
//! distances keep their input order. The object itself (the diagonal entry) is
//! never one of its own neighbours, whatever its distance.
use std::cmp::Ordering;

use serde::Serialize;

use crate::{
    constants::{CatalogId, DistanceMatrix},
    unique_orbits_errors::UniqueOrbitsError,
};

/// One entry of a neighbour list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbour {
    #[serde(rename = "satNo")]
    pub id: CatalogId,
    pub distance: f64,
}

/// Nearest neighbours of one object, closest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighbourList {
    pub id: CatalogId,
    pub neighbours: Vec<Neighbour>,
}

/// Ascending order on distances with NaN last, whatever its sign bit.
pub(crate) fn distance_order(a: f64, b: f64) -> Ordering {
    a.is_nan()
        .cmp(&b.is_nan())
        .then_with(|| a.total_cmp(&b))
}

/// Row indices of the `k` nearest other entries of `row`, closest first.
///
/// `skip` is the index of the object itself.
pub(crate) fn nearest_indices(
    row: impl Iterator<Item = f64>,
    skip: usize,
    k: usize,
) -> Vec<(usize, f64)> {
    if k == 0 {
        return Vec::new();
    }
    let mut candidates: Vec<(usize, f64)> =
        row.enumerate().filter(|&(j, _)| j != skip).collect();

    let by_distance_then_index =
        |a: &(usize, f64), b: &(usize, f64)| distance_order(a.1, b.1).then(a.0.cmp(&b.0));

    if candidates.len() > k {
        candidates.select_nth_unstable_by(k - 1, by_distance_then_index);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(by_distance_then_index);
    candidates
}

/// Top-`k` nearest neighbours of every object of a group.
///
/// Arguments
/// -----------------
/// * `distances` – Square distance matrix of the group (row `i` = object `ids[i]`).
/// * `ids` – Identifiers of the objects, aligned with the matrix rows.
/// * `k` – Maximum number of neighbours per object.
///
/// Return
/// ----------
/// * One [`NeighbourList`] per identifier, in input order, each holding
///   `min(k, N − 1)` neighbours sorted by ascending distance.
///
/// Errors
/// ----------
/// * [`UniqueOrbitsError::NonSquareDistanceMatrix`] if the matrix is not square.
/// * [`UniqueOrbitsError::IdentifierCountMismatch`] if `ids.len()` differs from the matrix size.
pub fn nearest_neighbours(
    distances: &DistanceMatrix,
    ids: &[CatalogId],
    k: usize,
) -> Result<Vec<NeighbourList>, UniqueOrbitsError> {
    let (rows, cols) = distances.shape();
    if rows != cols {
        return Err(UniqueOrbitsError::NonSquareDistanceMatrix { rows, cols });
    }
    neighbours_against(distances, ids, ids, |i| i, k)
}

/// Top-`k` neighbours of a subset of objects searched in a larger population.
///
/// `distances` is `ids.len() × population.len()`; `self_column(i)` gives the column
/// of row `i`'s own object in the population, excluded from its neighbours.
pub(crate) fn neighbours_against(
    distances: &DistanceMatrix,
    ids: &[CatalogId],
    population: &[CatalogId],
    self_column: impl Fn(usize) -> usize,
    k: usize,
) -> Result<Vec<NeighbourList>, UniqueOrbitsError> {
    let (rows, cols) = distances.shape();
    if ids.len() != rows || population.len() != cols {
        return Err(UniqueOrbitsError::IdentifierCountMismatch {
            ids: ids.len(),
            rows,
        });
    }

    Ok(ids
        .iter()
        .enumerate()
        .map(|(i, id)| NeighbourList {
            id: id.clone(),
            neighbours: nearest_indices(distances.row(i).iter().copied(), self_column(i), k)
                .into_iter()
                .map(|(j, distance)| Neighbour {
                    id: population[j].clone(),
                    distance,
                })
                .collect(),
        })
        .collect())
}
