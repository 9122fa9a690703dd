#![allow(dead_code)]

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::Rng;
use unique_orbits::orbit_batch::OrbitBatch;
use unique_orbits::orbit_type::orbital_element_set::OrbitalElementSet;
use unique_orbits::tle::compute_checksum;

/// Minimal mean elements of a synthetic TLE (degrees, rev/day).
#[derive(Debug, Clone, Copy)]
pub struct SyntheticTle {
    pub catalog_number: u32,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub periapsis_argument_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion: f64,
}

impl SyntheticTle {
    /// Near-circular LEO at 51.6° with the given node.
    pub fn leo(catalog_number: u32, raan_deg: f64) -> Self {
        SyntheticTle {
            catalog_number,
            inclination_deg: 51.6,
            raan_deg,
            eccentricity: 0.0005,
            periapsis_argument_deg: 90.0,
            mean_anomaly_deg: 0.0,
            mean_motion: 15.5,
        }
    }

    /// Near-geostationary orbit with the given node.
    pub fn geo(catalog_number: u32, raan_deg: f64) -> Self {
        SyntheticTle {
            catalog_number,
            inclination_deg: 0.05,
            raan_deg,
            eccentricity: 0.0002,
            periapsis_argument_deg: 0.0,
            mean_anomaly_deg: 0.0,
            mean_motion: 1.0027,
        }
    }

    /// Both lines, 69 columns each, with valid checksums.
    pub fn lines(&self) -> (String, String) {
        let line1 = format!(
            "1 {:05}U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  999",
            self.catalog_number
        );
        let line2 = format!(
            "2 {:05} {:8.4} {:8.4} {:07} {:8.4} {:8.4} {:11.8}{:5}",
            self.catalog_number,
            self.inclination_deg,
            self.raan_deg,
            (self.eccentricity * 1e7).round() as u64,
            self.periapsis_argument_deg,
            self.mean_anomaly_deg,
            self.mean_motion,
            1
        );
        (with_checksum(line1), with_checksum(line2))
    }
}

fn with_checksum(line: String) -> String {
    let checksum = compute_checksum(&line);
    format!("{line}{checksum}")
}

/// Random closed orbits between LEO and GEO.
pub fn random_elements(rng: &mut StdRng, n: usize) -> Vec<OrbitalElementSet> {
    let tau = std::f64::consts::TAU;
    (0..n)
        .map(|_| {
            OrbitalElementSet::new(
                rng.random_range(6_700.0..45_000.0),
                rng.random_range(0.0..0.8),
                rng.random_range(0.0..std::f64::consts::PI),
                rng.random::<f64>() * tau,
                rng.random::<f64>() * tau,
            )
        })
        .collect()
}

pub fn random_batch(rng: &mut StdRng, n: usize) -> OrbitBatch {
    OrbitBatch::from_elements(&random_elements(rng, n))
}

pub fn assert_elements_close(actual: &OrbitalElementSet, expected: &OrbitalElementSet, epsilon: f64) {
    assert_relative_eq!(
        actual.semi_major_axis,
        expected.semi_major_axis,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.eccentricity,
        expected.eccentricity,
        epsilon = epsilon
    );
    assert_relative_eq!(actual.inclination, expected.inclination, epsilon = epsilon);
    assert_relative_eq!(
        actual.periapsis_argument,
        expected.periapsis_argument,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.ascending_node,
        expected.ascending_node,
        epsilon = epsilon
    );
}
