//! # Orbital element representations
//!
//! This module holds the per-object orbit representation used by the similarity
//! metric, [`OrbitalElementSet`](crate::orbit_type::orbital_element_set::OrbitalElementSet),
//! and the conversion of a TLE mean motion into a semi-major axis.
//!
//! ## Mean motion and semi-major axis
//!
//! The mean motion written in a TLE is a **Kozai** mean motion fitted for SGP4. The
//! semi-major axis consistent with that propagation model is obtained the way SGP4
//! initializes itself: recover the **Brouwer** mean motion by removing the first-order
//! J2 secular correction, then apply Kepler's third law in canonical units
//! (Earth radii, minutes). See [`brouwer_semi_major_axis`].
//!
//! ## Units
//!
//! - Lengths: **km** (unless stated otherwise)
//! - Angles: **radians**
//!
//! ## See also
//!
//! - Hoots & Roehrich, *Spacetrack Report No. 3* (1980).
//! - Vallado et al., *Revisiting Spacetrack Report #3* (2006).

use crate::constants::{J2_WGS72, XKE_WGS72, XPDOTP};

/// Per-object classical elements and derived shape parameters.
pub mod orbital_element_set;

/// Brouwer (un-Kozai'd) semi-major axis, in Earth radii.
///
/// Arguments
/// ---------
/// * `mean_motion_rev_day` – Kozai mean motion from the TLE (rev/day).
/// * `eccentricity` – Mean eccentricity.
/// * `inclination` – Mean inclination (radians).
///
/// Return
/// ------
/// * The semi-major axis in Earth radii (WGS-72), as computed by the SGP4 initialization.
pub fn brouwer_semi_major_axis(mean_motion_rev_day: f64, eccentricity: f64, inclination: f64) -> f64 {
    const X2O3: f64 = 2.0 / 3.0;

    let no_kozai = mean_motion_rev_day / XPDOTP;
    let omeosq = 1.0 - eccentricity * eccentricity;
    let rteosq = omeosq.sqrt();
    let cosio = inclination.cos();
    let cosio2 = cosio * cosio;

    let ak = (XKE_WGS72 / no_kozai).powf(X2O3);
    let d1 = 0.75 * J2_WGS72 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
    let del = d1 / (ak * ak);
    let adel = ak * (1.0 - del * del - del * (1.0 / 3.0 + 134.0 * del * del / 81.0));
    let del = d1 / (adel * adel);
    let no_unkozai = no_kozai / (1.0 + del);

    (no_unkozai / XKE_WGS72).powf(-X2O3)
}
