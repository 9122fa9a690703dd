//! # Constants and type definitions for unique-orbits
//!
//! This module centralizes the **geophysical constants**, **conversion factors**, and
//! **common type definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - WGS-72 gravity model constants, as used by the SGP4 initialization that turns a
//!   TLE mean motion into a semi-major axis
//! - Unit conversions (degrees ↔ radians, rev/day ↔ rad/min)
//! - Core type aliases used across the crate
//! - The [`CatalogId`] identifier carried by every tracked object
//!
//! The gravity model must match the one implied by the propagation model of the
//! element sets. TLEs are mean elements fitted against SGP4 with WGS-72 constants,
//! so these are the ones used here even though WGS-84 is more recent.

use serde::{Deserialize, Serialize};
use std::fmt;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Minutes in a day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Conversion factor from rev/day to rad/min (SGP4 `xpdotp`)
pub const XPDOTP: f64 = MINUTES_PER_DAY / DPI;

/// Earth gravitational parameter μ in km³/s² (WGS-72)
pub const MU_EARTH_WGS72: f64 = 398_600.8;

/// Earth equatorial radius in km (WGS-72)
pub const EARTH_RADIUS_WGS72: Kilometer = 6_378.135;

/// Second zonal harmonic J2 (WGS-72)
pub const J2_WGS72: f64 = 0.001_082_616;

/// sqrt(μ) expressed in Earth radii^1.5 per minute (SGP4 `xke`),
/// i.e. `60 / sqrt(R⊕³ / μ)` with the WGS-72 values above
pub const XKE_WGS72: f64 = 0.074_366_916_133_173_41;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;

/// Orbit-to-orbit distances in km (rows: first batch, columns: second batch).
pub type DistanceMatrix = nalgebra::DMatrix<f64>;

// -------------------------------------------------------------------------------------------------
// Identifiers
// -------------------------------------------------------------------------------------------------

/// Fixed-width catalog identifier of a tracked object.
///
/// The identifier is the five-character catalog number field of TLE line 1
/// (columns 3–7), with blanks replaced by `0`, e.g. `"00005"` or `"25544"`.
/// Alpha-5 identifiers such as `"A0001"` are kept verbatim; use
/// [`CatalogId::catalog_number`] to decode them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    /// Build an identifier from a raw catalog field, padding blanks with zeros.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim_end();
        let padded = format!("{trimmed:>5}");
        CatalogId(padded.replace(' ', "0"))
    }

    /// The identifier as stored (five characters for well-formed inputs).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the numeric catalog number, including the Alpha-5 extension.
    ///
    /// Alpha-5 replaces the leading digit with a letter (`A` = 10 … `Z` = 33,
    /// skipping `I` and `O`), so `"A0001"` decodes to `100001`.
    ///
    /// Return
    /// ------
    /// * `Some(number)` for a valid numeric or Alpha-5 identifier, `None` otherwise.
    pub fn catalog_number(&self) -> Option<u32> {
        let mut chars = self.0.chars();
        let first = chars.next()?;
        let rest = chars.as_str();
        if !rest.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let rest_value: u32 = if rest.is_empty() { 0 } else { rest.parse().ok()? };
        let scale = 10u32.pow(rest.len() as u32);

        let lead = match first {
            '0'..='9' => first.to_digit(10)?,
            'I' | 'O' => return None,
            'A'..='H' => 10 + (first as u32 - 'A' as u32),
            'J'..='N' => 18 + (first as u32 - 'J' as u32),
            'P'..='Z' => 23 + (first as u32 - 'P' as u32),
            _ => return None,
        };
        Some(lead * scale + rest_value)
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CatalogId {
    fn from(value: &str) -> Self {
        CatalogId::new(value)
    }
}

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn catalog_id_pads_blanks_with_zeros() {
        assert_eq!(CatalogId::new("    5").as_str(), "00005");
        assert_eq!(CatalogId::new("5").as_str(), "00005");
        assert_eq!(CatalogId::new("25544").as_str(), "25544");
    }

    #[test]
    fn catalog_number_decodes_alpha5() {
        assert_eq!(CatalogId::new("25544").catalog_number(), Some(25544));
        assert_eq!(CatalogId::new("A0001").catalog_number(), Some(100_001));
        assert_eq!(CatalogId::new("H9999").catalog_number(), Some(179_999));
        assert_eq!(CatalogId::new("J0000").catalog_number(), Some(180_000));
        assert_eq!(CatalogId::new("P0000").catalog_number(), Some(230_000));
        assert_eq!(CatalogId::new("Z9999").catalog_number(), Some(339_999));
        assert_eq!(CatalogId::new("I0000").catalog_number(), None);
        assert_eq!(CatalogId::new("1A000").catalog_number(), None);
    }

    #[test]
    fn xke_matches_wgs72_gravity_model() {
        let xke = 60.0 / (EARTH_RADIUS_WGS72.powi(3) / MU_EARTH_WGS72).sqrt();
        approx::assert_relative_eq!(XKE_WGS72, xke, epsilon = 1e-15);
    }
}
