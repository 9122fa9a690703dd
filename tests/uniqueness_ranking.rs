use approx::assert_abs_diff_eq;

use unique_orbits::constants::CatalogId;
use unique_orbits::distance::self_distance_matrix;
use unique_orbits::neighbours::nearest_neighbours;
use unique_orbits::orbit_batch::OrbitBatch;
use unique_orbits::orbit_type::orbital_element_set::OrbitalElementSet;
use unique_orbits::uniqueness::{UniquenessRange, UniquenessScorer};

#[test]
fn test_four_object_scenario() {
    let elements = [
        OrbitalElementSet::new(7000.0, 0.001, 0.9, 0.0, 0.0),
        OrbitalElementSet::new(7000.0, 0.001, 0.9, 0.0, 0.001),
        OrbitalElementSet::new(7000.0, 0.001, 2.5, 0.0, 0.0),
        OrbitalElementSet::new(7000.0, 0.001, 2.5, 0.0, 1.0),
    ];
    let ids: Vec<CatalogId> = ["00001", "00002", "00003", "00004"]
        .into_iter()
        .map(CatalogId::from)
        .collect();

    let batch = OrbitBatch::from_elements(&elements);
    let distances = self_distance_matrix(&batch);

    let neighbours = nearest_neighbours(&distances, &ids, 10).unwrap();
    assert!(neighbours.iter().all(|list| list.neighbours.len() == 3));
    assert_eq!(neighbours[0].neighbours[0].id, ids[1]);
    assert_eq!(neighbours[1].neighbours[0].id, ids[0]);
    assert!(neighbours[0].neighbours[0].distance < 0.01);
    assert_abs_diff_eq!(
        neighbours[0].neighbours[0].distance,
        neighbours[1].neighbours[0].distance,
        epsilon = 1e-12
    );

    let ranking = UniquenessScorer::new(1, 2.71).score(&distances).unwrap();
    assert!(ranking.rejected.is_empty());
    assert_eq!(ranking.results.len(), 4);

    let first = ranking.result_of(0).unwrap();
    let second = ranking.result_of(1).unwrap();
    let third = ranking.result_of(2).unwrap();
    let fourth = ranking.result_of(3).unwrap();

    assert_abs_diff_eq!(first.uniqueness, second.uniqueness, epsilon = 1e-6);
    assert!(first.uniqueness < 1e-3);
    assert!(third.uniqueness > first.uniqueness);
    assert!(fourth.uniqueness > second.uniqueness);
    assert_eq!(third.rank, 1);
    assert_eq!(fourth.rank, 2);
    assert!(ranking
        .results
        .iter()
        .all(|r| r.range == UniquenessRange::Unknown));
}

#[test]
fn test_outlier_is_excluded() {
    // 200 orbits spread along the node, plus one retrograde orbit far from all of them
    let mut elements: Vec<OrbitalElementSet> = (0..200)
        .map(|j| OrbitalElementSet::new(7000.0, 0.001, 0.9, 0.0, f64::from(j) * 0.01))
        .collect();
    elements.push(OrbitalElementSet::new(7000.0, 0.001, 2.5, 0.0, 0.0));

    let distances = self_distance_matrix(&OrbitBatch::from_elements(&elements));
    let scorer = UniquenessScorer::new(5, 2.71);

    let raw = scorer.raw_scores(&distances);
    let ranking = scorer.score(&distances).unwrap();
    let stats = ranking.statistics.unwrap();
    let outlier_z = (raw[200].unwrap() - stats.mean) / stats.variance.sqrt();
    assert!(outlier_z > 10.0, "z = {outlier_z}");

    assert_eq!(ranking.rejected, vec![200]);
    assert_eq!(ranking.results.len(), 200);
    assert!(ranking.result_of(200).is_none());

    let ranks: Vec<usize> = ranking.results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=200).collect::<Vec<_>>());
    assert!(ranking
        .results
        .iter()
        .all(|r| (0.0..=1.0).contains(&r.uniqueness)));

    let most = ranking
        .results
        .iter()
        .filter(|r| r.range == UniquenessRange::Most)
        .count();
    let least = ranking
        .results
        .iter()
        .filter(|r| r.range == UniquenessRange::Least)
        .count();
    assert_eq!((most, least), (5, 5));
}
