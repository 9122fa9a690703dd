//! # Orbital regimes
//!
//! Coarse classification of orbits used to partition a catalog before scoring.
//! Uniqueness scores and (by default) neighbour lists are only ever computed
//! between objects of the same regime.
//!
//! Regime assignments come from an external satellite catalog, where the
//! operational orbit column holds labels such as `LEO`, `LEO/S`, `GEO/D` or
//! `HEO/M`. [`OrbitalRegime::from_operational_orbit`] reduces such a label to
//! a regime by substring, checking the four main regimes first.
//!
//! ## See also
//!
//! * [`rank_catalog`](crate::catalog_ranking::rank_catalog) – consumes a [`RegimeMap`].
use std::{collections::HashMap, fmt, str::FromStr};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use crate::{constants::CatalogId, unique_orbits_errors::UniqueOrbitsError};

/// Regime assignment of each catalog identifier.
pub type RegimeMap = HashMap<CatalogId, OrbitalRegime, RandomState>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrbitalRegime {
    /// Low Earth orbit
    Leo,
    /// Medium Earth orbit
    Meo,
    /// Highly elliptical orbit
    Heo,
    /// Geosynchronous orbit
    Geo,
    /// Geosynchronous transfer orbit
    Gto,
    /// Deep space orbit
    Dso,
    /// Cislunar orbit
    Clo,
    /// Extremely eccentric orbit
    Eeo,
    /// Heliocentric orbit
    Hco,
    /// Planetocentric orbit
    Pco,
    /// Sun-Earth Lagrange point orbit
    Sse,
}

impl OrbitalRegime {
    /// Every regime, main regimes first.
    pub const ALL: [OrbitalRegime; 11] = [
        OrbitalRegime::Leo,
        OrbitalRegime::Meo,
        OrbitalRegime::Heo,
        OrbitalRegime::Geo,
        OrbitalRegime::Gto,
        OrbitalRegime::Dso,
        OrbitalRegime::Clo,
        OrbitalRegime::Eeo,
        OrbitalRegime::Hco,
        OrbitalRegime::Pco,
        OrbitalRegime::Sse,
    ];

    /// Three-letter code of the regime.
    pub fn code(&self) -> &'static str {
        match self {
            OrbitalRegime::Leo => "LEO",
            OrbitalRegime::Meo => "MEO",
            OrbitalRegime::Heo => "HEO",
            OrbitalRegime::Geo => "GEO",
            OrbitalRegime::Gto => "GTO",
            OrbitalRegime::Dso => "DSO",
            OrbitalRegime::Clo => "CLO",
            OrbitalRegime::Eeo => "EEO",
            OrbitalRegime::Hco => "HCO",
            OrbitalRegime::Pco => "PCO",
            OrbitalRegime::Sse => "SSE",
        }
    }

    /// Regime of a catalog operational-orbit label.
    ///
    /// The label matches the first regime whose code it contains, in the order of
    /// [`OrbitalRegime::ALL`]; the comparison ignores ASCII case.
    ///
    /// Return
    /// ----------
    /// * `None` if the label contains no regime code.
    pub fn from_operational_orbit(label: &str) -> Option<OrbitalRegime> {
        let label = label.to_ascii_uppercase();
        OrbitalRegime::ALL
            .into_iter()
            .find(|regime| label.contains(regime.code()))
    }
}

impl FromStr for OrbitalRegime {
    type Err = UniqueOrbitsError;

    /// Parse an exact regime code (case-insensitive, surrounding blanks ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        OrbitalRegime::ALL
            .into_iter()
            .find(|regime| regime.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UniqueOrbitsError::UnknownRegime(s.to_string()))
    }
}

impl fmt::Display for OrbitalRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Build a [`RegimeMap`] from `(identifier, operational orbit label)` rows.
///
/// Rows whose label maps to no regime are left out. When an identifier appears
/// several times, the last classified row wins.
pub fn regimes_from_operational_orbits<'a, I>(rows: I) -> RegimeMap
where
    I: IntoIterator<Item = (CatalogId, &'a str)>,
{
    rows.into_iter()
        .filter_map(|(id, label)| OrbitalRegime::from_operational_orbit(label).map(|r| (id, r)))
        .collect()
}

#[cfg(test)]
mod regime_test {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("LEO".parse::<OrbitalRegime>(), Ok(OrbitalRegime::Leo));
        assert_eq!(" geo ".parse::<OrbitalRegime>(), Ok(OrbitalRegime::Geo));
        assert_eq!(
            "XYZ".parse::<OrbitalRegime>(),
            Err(UniqueOrbitsError::UnknownRegime("XYZ".into()))
        );
        for regime in OrbitalRegime::ALL {
            assert_eq!(regime.to_string().parse::<OrbitalRegime>(), Ok(regime));
        }
    }

    #[test]
    fn test_operational_orbit_labels() {
        assert_eq!(
            OrbitalRegime::from_operational_orbit("LEO/S"),
            Some(OrbitalRegime::Leo)
        );
        assert_eq!(
            OrbitalRegime::from_operational_orbit("GEO/D"),
            Some(OrbitalRegime::Geo)
        );
        assert_eq!(
            OrbitalRegime::from_operational_orbit("HEO/M"),
            Some(OrbitalRegime::Heo)
        );
        assert_eq!(
            OrbitalRegime::from_operational_orbit("GTO"),
            Some(OrbitalRegime::Gto)
        );
        assert_eq!(OrbitalRegime::from_operational_orbit("-"), None);
    }

    #[test]
    fn test_regime_map() {
        let map = regimes_from_operational_orbits([
            (CatalogId::new("25544"), "LEO/I"),
            (CatalogId::new("28884"), "GEO/S"),
            (CatalogId::new("99999"), "?"),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&CatalogId::new("25544")], OrbitalRegime::Leo);
        assert_eq!(map[&CatalogId::new("28884")], OrbitalRegime::Geo);
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(
            serde_json::to_string(&OrbitalRegime::Meo).unwrap(),
            "\"MEO\""
        );
        let regime: OrbitalRegime = serde_json::from_str("\"SSE\"").unwrap();
        assert_eq!(regime, OrbitalRegime::Sse);
    }
}
