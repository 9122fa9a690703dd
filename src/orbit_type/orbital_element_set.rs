//! # Orbital element set
//!
//! [`OrbitalElementSet`] is the orbit representation consumed by the similarity
//! metric: the five classical elements that fix the size, shape and orientation of
//! the orbit (the position along the orbit is irrelevant here), plus two derived
//! quantities.
//!
//! | Field                  | Symbol | Unit    | Notes                               |
//! |------------------------|--------|---------|-------------------------------------|
//! | `semi_major_axis`      | a      | km      | Brouwer axis from the TLE           |
//! | `eccentricity`         | e      | –       | `[0, 1)` for valid inputs           |
//! | `inclination`          | i      | rad     | `[0, π]`                            |
//! | `periapsis_argument`   | ω      | rad     |                                     |
//! | `ascending_node`       | Ω      | rad     | RAAN                                |
//! | `perigee_altitude`     | q      | km      | `a(1 − e) − R⊕` (WGS-72)            |
//! | `semi_latus_rectum`    | p      | km      | `a(1 − e²)`                         |
//!
//! `p` and `q` are always derived from `a` and `e` by the constructors of this type.

use std::fmt;

use serde::Serialize;

use crate::{
    constants::{Kilometer, Radian, EARTH_RADIUS_WGS72},
    orbit_type::brouwer_semi_major_axis,
    tle::TwoLineElement,
    unique_orbits_errors::UniqueOrbitsError,
};

/// Classical elements of one tracked object, with derived `p` and `q`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalElementSet {
    pub semi_major_axis: Kilometer,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub periapsis_argument: Radian,
    pub ascending_node: Radian,
    pub perigee_altitude: Kilometer,
    pub semi_latus_rectum: Kilometer,
}

impl OrbitalElementSet {
    /// Build an element set from `(a, e, i, ω, Ω)`, deriving `p` and `q`.
    ///
    /// No validation is performed: degenerate inputs propagate as NaN/Inf
    /// through the metric. Use [`OrbitalElementSet::check_physical`] to filter them.
    pub fn new(
        semi_major_axis: Kilometer,
        eccentricity: f64,
        inclination: Radian,
        periapsis_argument: Radian,
        ascending_node: Radian,
    ) -> Self {
        OrbitalElementSet {
            semi_major_axis,
            eccentricity,
            inclination,
            periapsis_argument,
            ascending_node,
            perigee_altitude: perigee_altitude(semi_major_axis, eccentricity),
            semi_latus_rectum: semi_latus_rectum(semi_major_axis, eccentricity),
        }
    }

    /// Derive the element set of a parsed TLE.
    ///
    /// The semi-major axis is the Brouwer axis used by SGP4 (WGS-72), in km.
    pub fn from_tle(tle: &TwoLineElement) -> Self {
        let a = brouwer_semi_major_axis(tle.mean_motion, tle.eccentricity, tle.inclination)
            * EARTH_RADIUS_WGS72;
        OrbitalElementSet::new(
            a,
            tle.eccentricity,
            tle.inclination,
            tle.periapsis_argument,
            tle.raan,
        )
    }

    /// Check that the elements describe a closed, physical orbit.
    ///
    /// Errors
    /// ------
    /// Returns [`UniqueOrbitsError::DegenerateInput`] when an element is not finite,
    /// `a ≤ 0`, or `e ∉ [0, 1)`.
    pub fn check_physical(&self, id: &str) -> Result<(), UniqueOrbitsError> {
        let degenerate = |reason: String| {
            Err(UniqueOrbitsError::DegenerateInput {
                id: id.to_string(),
                reason,
            })
        };

        let values = [
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.periapsis_argument,
            self.ascending_node,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return degenerate("non-finite element".into());
        }
        if self.semi_major_axis <= 0.0 {
            return degenerate(format!(
                "semi-major axis must be positive, got {} km",
                self.semi_major_axis
            ));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return degenerate(format!(
                "eccentricity must be in [0, 1), got {}",
                self.eccentricity
            ));
        }
        Ok(())
    }
}

/// Semi-latus rectum `p = a(1 − e²)`.
#[inline]
pub fn semi_latus_rectum(semi_major_axis: Kilometer, eccentricity: f64) -> Kilometer {
    semi_major_axis * (1.0 - eccentricity * eccentricity)
}

/// Perigee altitude above the WGS-72 equatorial radius, `a(1 − e) − R⊕`.
#[inline]
pub fn perigee_altitude(semi_major_axis: Kilometer, eccentricity: f64) -> Kilometer {
    semi_major_axis * (1.0 - eccentricity) - EARTH_RADIUS_WGS72
}

impl fmt::Display for OrbitalElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Orbital element set")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.3} km",
            self.semi_major_axis
        )?;
        writeln!(f, "  e   (eccentricity)          = {:.7}", self.eccentricity)?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.4}°)",
            self.inclination,
            self.inclination.to_degrees()
        )?;
        writeln!(
            f,
            "  ω   (argument of perigee)   = {:.6} rad ({:.4}°)",
            self.periapsis_argument,
            self.periapsis_argument.to_degrees()
        )?;
        writeln!(
            f,
            "  Ω   (ascending node)        = {:.6} rad ({:.4}°)",
            self.ascending_node,
            self.ascending_node.to_degrees()
        )?;
        writeln!(
            f,
            "  q   (perigee altitude)      = {:.3} km",
            self.perigee_altitude
        )?;
        write!(
            f,
            "  p   (semi-latus rectum)     = {:.3} km",
            self.semi_latus_rectum
        )
    }
}

#[cfg(test)]
mod orbital_element_set_test {
    use super::*;
    use crate::tle::tle_test::{ISS_LINE1, ISS_LINE2};
    use approx::assert_relative_eq;

    #[test]
    fn test_from_tle_iss() {
        let tle = TwoLineElement::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let elements = OrbitalElementSet::from_tle(&tle);

        assert_relative_eq!(elements.semi_major_axis, 6731.470970158624, epsilon = 1e-6);
        assert_relative_eq!(elements.perigee_altitude, 348.82386516732697, epsilon = 1e-6);
        assert_relative_eq!(
            elements.semi_latus_rectum,
            elements.semi_major_axis * (1.0 - 0.0006703_f64.powi(2))
        );
        assert_eq!(elements.inclination, tle.inclination);
        assert_eq!(elements.ascending_node, tle.raan);
        assert_eq!(elements.periapsis_argument, tle.periapsis_argument);
        assert!(elements.check_physical("25544").is_ok());
    }

    #[test]
    fn test_derived_quantities_follow_a_and_e() {
        let elements = OrbitalElementSet::new(7000.0, 0.1, 0.9, 0.0, 0.0);
        assert_relative_eq!(elements.semi_latus_rectum, 6930.0, epsilon = 1e-9);
        assert_relative_eq!(
            elements.perigee_altitude,
            6300.0 - EARTH_RADIUS_WGS72,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_check_physical_rejects_open_orbits() {
        let hyperbolic = OrbitalElementSet::new(7000.0, 1.2, 0.9, 0.0, 0.0);
        assert!(matches!(
            hyperbolic.check_physical("99999"),
            Err(UniqueOrbitsError::DegenerateInput { .. })
        ));

        let negative_axis = OrbitalElementSet::new(-7000.0, 0.1, 0.9, 0.0, 0.0);
        assert!(negative_axis.check_physical("99999").is_err());

        let nan_node = OrbitalElementSet::new(7000.0, 0.1, 0.9, 0.0, f64::NAN);
        assert!(nan_node.check_physical("99999").is_err());
    }
}
