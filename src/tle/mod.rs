//! # Two-line element sets
//!
//! Fixed-column parsing of NORAD two-line element sets (TLEs) into
//! [`TwoLineElement`] values, with angles converted to **radians** and the epoch
//! converted to a [`hifitime::Epoch`] in UTC.
//!
//! ## Field layout (0-based byte ranges)
//! -----------------
//! ```text
//! Line 1: 1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN
//!         0 2..7 catalog, 7 class, 9..17 designator, 18..20 year, 20..32 day,
//!         33..43 ṅ/2, 44..52 n̈/6, 53..61 B*, 62 ephemeris type, 64..68 set number
//! Line 2: 2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN
//!         0 2..7 catalog, 8..16 i, 17..25 Ω, 26..33 e, 34..42 ω, 43..51 M,
//!         52..63 n (rev/day), 63..68 revolution number
//! ```
//! Column 68 of both lines holds a mod-10 checksum. It is only verified by
//! [`TwoLineElement::parse_checked`] with `verify_checksum = true`, since catalog
//! exports regularly carry stale checksums and SGP4 ignores them.
//!
//! ## Error Handling
//! -----------------
//! Every failure is described by a [`ParseTleError`] naming the offending line or
//! field. Batch constructors wrap it with the record index
//! (see [`crate::unique_orbits_errors::UniqueOrbitsError::ParseError`]).
//!
//! ## See also
//! ------------
//! * [`catalog`] – Three-line catalog text and ingestion filters.
//! * [`crate::orbit_type::orbital_element_set::OrbitalElementSet::from_tle`] – Derivation of `a`, `p`, `q`.

pub mod catalog;

use std::ops::Range;

use hifitime::{Epoch, Unit};
use thiserror::Error;

use crate::constants::{CatalogId, Radian, RADEG};

/// Shortest accepted line: everything up to the revolution number.
const MIN_LINE_LEN: usize = 68;
/// Full line length, checksum included.
const FULL_LINE_LEN: usize = 69;

/// Line-level parsing errors for two-line element sets.
///
/// Variants
/// -----------------
/// * `TooShortLine` – The line does not reach the required number of columns.
/// * `NonAsciiLine` – The line contains non-ASCII characters (fixed columns cannot be sliced).
/// * `WrongLineNumber` – Column 1 is not `1` (resp. `2`).
/// * `CatalogMismatch` – Lines 1 and 2 carry different catalog numbers.
/// * `InvalidCatalogNumber` – The catalog field is neither numeric nor Alpha-5.
/// * `InvalidField` – A numeric field failed to parse; payload carries the field name and slice.
/// * `ChecksumMismatch` – The mod-10 checksum in column 69 does not match.
/// * `NonPositiveMeanMotion` – Mean motion must be strictly positive to derive a semi-major axis.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ParseTleError {
    #[error("Line {line} is too short: {len} columns")]
    TooShortLine { line: u8, len: usize },
    #[error("Line {0} contains non-ASCII characters")]
    NonAsciiLine(u8),
    #[error("Line {line} must start with '{line}', got '{found}'")]
    WrongLineNumber { line: u8, found: char },
    #[error("Catalog numbers differ between lines: {0} vs {1}")]
    CatalogMismatch(String, String),
    #[error("Invalid catalog number: {0:?}")]
    InvalidCatalogNumber(String),
    #[error("Invalid {field} field: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("Checksum failed on line {line}: expected {expected}, computed {computed}")]
    ChecksumMismatch { line: u8, expected: u8, computed: u8 },
    #[error("Mean motion must be positive, got {0} rev/day")]
    NonPositiveMeanMotion(f64),
}

/// A parsed two-line element set.
///
/// Units
/// -----
/// * angles: radians
/// * `mean_motion`: revolutions per day (Kozai mean motion, as written in the TLE)
/// * `mean_motion_dot`: rev/day² (already halved in the TLE)
/// * `mean_motion_ddot`: rev/day³ (already divided by six in the TLE)
/// * `bstar`: 1 / Earth radii
#[derive(Debug, Clone, PartialEq)]
pub struct TwoLineElement {
    pub catalog_id: CatalogId,
    pub classification: char,
    pub international_designator: String,
    pub epoch: Epoch,
    pub mean_motion_dot: f64,
    pub mean_motion_ddot: f64,
    pub bstar: f64,
    pub element_set_number: u16,
    pub inclination: Radian,
    pub raan: Radian,
    pub eccentricity: f64,
    pub periapsis_argument: Radian,
    pub mean_anomaly: Radian,
    pub mean_motion: f64,
    pub revolution_number: u32,
}

impl TwoLineElement {
    /// Parse a two-line element set without checksum verification.
    ///
    /// This is the lenient path matching what SGP4 itself accepts.
    ///
    /// See also
    /// ------------
    /// * [`TwoLineElement::parse_checked`] – Same, with optional checksum verification.
    pub fn parse(line1: &str, line2: &str) -> Result<Self, ParseTleError> {
        Self::parse_checked(line1, line2, false)
    }

    /// Parse a two-line element set.
    ///
    /// Arguments
    /// -----------------
    /// * `line1`, `line2` – The two element lines. Trailing whitespace (including `\r`) is ignored.
    /// * `verify_checksum` – When true, both lines must be 69 columns long and carry a valid
    ///   mod-10 checksum.
    ///
    /// Return
    /// ----------
    /// * The parsed [`TwoLineElement`], or the first [`ParseTleError`] encountered.
    pub fn parse_checked(
        line1: &str,
        line2: &str,
        verify_checksum: bool,
    ) -> Result<Self, ParseTleError> {
        let min_len = if verify_checksum {
            FULL_LINE_LEN
        } else {
            MIN_LINE_LEN
        };
        let l1 = check_line(line1, 1, min_len)?;
        let l2 = check_line(line2, 2, min_len)?;

        if verify_checksum {
            verify_line_checksum(l1, 1)?;
            verify_line_checksum(l2, 2)?;
        }

        // ── Line 1 ──
        let catalog_1 = CatalogId::new(&l1[2..7]);
        if catalog_1.catalog_number().is_none() {
            return Err(ParseTleError::InvalidCatalogNumber(l1[2..7].to_string()));
        }
        let classification = l1.as_bytes()[7] as char;
        let international_designator = l1[9..17].trim().to_string();

        let epoch_year: i32 = parse_field(l1, 18..20, "epoch year")?;
        let epoch_year = if epoch_year < 57 {
            2000 + epoch_year
        } else {
            1900 + epoch_year
        };
        let epoch_day: f64 = parse_field(l1, 20..32, "epoch day")?;
        let epoch =
            Epoch::from_gregorian_utc_at_midnight(epoch_year, 1, 1) + Unit::Day * (epoch_day - 1.0);

        let mean_motion_dot: f64 = parse_field(l1, 33..43, "mean motion derivative")?;
        let mean_motion_ddot = parse_implied_decimal(l1, 44..52, "mean motion second derivative")?;
        let bstar = parse_implied_decimal(l1, 53..61, "bstar")?;
        let element_set_number = l1[64..68].trim().parse::<u16>().unwrap_or(0);

        // ── Line 2 ──
        let catalog_2 = CatalogId::new(&l2[2..7]);
        if catalog_1 != catalog_2 {
            return Err(ParseTleError::CatalogMismatch(
                catalog_1.to_string(),
                catalog_2.to_string(),
            ));
        }

        let inclination: f64 = parse_field(l2, 8..16, "inclination")?;
        let raan: f64 = parse_field(l2, 17..25, "right ascension of the ascending node")?;

        let ecc_digits = l2[26..33].trim();
        if ecc_digits.is_empty() || !ecc_digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseTleError::InvalidField {
                field: "eccentricity",
                value: ecc_digits.to_string(),
            });
        }
        let eccentricity: f64 =
            format!("0.{ecc_digits}")
                .parse()
                .map_err(|_| ParseTleError::InvalidField {
                    field: "eccentricity",
                    value: ecc_digits.to_string(),
                })?;

        let periapsis_argument: f64 = parse_field(l2, 34..42, "argument of perigee")?;
        let mean_anomaly: f64 = parse_field(l2, 43..51, "mean anomaly")?;
        let mean_motion: f64 = parse_field(l2, 52..63, "mean motion")?;
        if mean_motion.is_nan() || mean_motion <= 0.0 {
            return Err(ParseTleError::NonPositiveMeanMotion(mean_motion));
        }
        let revolution_number = l2[63..68].trim().parse::<u32>().unwrap_or(0);

        Ok(TwoLineElement {
            catalog_id: catalog_1,
            classification,
            international_designator,
            epoch,
            mean_motion_dot,
            mean_motion_ddot,
            bstar,
            element_set_number,
            inclination: inclination * RADEG,
            raan: raan * RADEG,
            eccentricity,
            periapsis_argument: periapsis_argument * RADEG,
            mean_anomaly: mean_anomaly * RADEG,
            mean_motion,
            revolution_number,
        })
    }
}

/// Compute the mod-10 checksum of the first 68 columns of a TLE line.
///
/// Digits count for their value, each `-` counts for one, everything else is ignored.
pub fn compute_checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .take(MIN_LINE_LEN)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

fn check_line(line: &str, number: u8, min_len: usize) -> Result<&str, ParseTleError> {
    let line = line.trim_end();
    if !line.is_ascii() {
        return Err(ParseTleError::NonAsciiLine(number));
    }
    if line.len() < min_len {
        return Err(ParseTleError::TooShortLine {
            line: number,
            len: line.len(),
        });
    }
    let first = line.as_bytes()[0] as char;
    if first != char::from(b'0' + number) {
        return Err(ParseTleError::WrongLineNumber {
            line: number,
            found: first,
        });
    }
    Ok(line)
}

fn verify_line_checksum(line: &str, number: u8) -> Result<(), ParseTleError> {
    let found = line.as_bytes()[MIN_LINE_LEN];
    if !found.is_ascii_digit() {
        return Err(ParseTleError::InvalidField {
            field: "checksum",
            value: (found as char).to_string(),
        });
    }
    let expected = found - b'0';
    let computed = compute_checksum(line);
    if expected != computed {
        return Err(ParseTleError::ChecksumMismatch {
            line: number,
            expected,
            computed,
        });
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(
    line: &str,
    range: Range<usize>,
    field: &'static str,
) -> Result<T, ParseTleError> {
    let raw = line[range].trim();
    raw.parse().map_err(|_| ParseTleError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

/// Parse the TLE "implied decimal" notation, e.g. `"-11606-4"` → `-0.11606e-4`.
fn parse_implied_decimal(
    line: &str,
    range: Range<usize>,
    field: &'static str,
) -> Result<f64, ParseTleError> {
    let raw = line[range].trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let invalid = || ParseTleError::InvalidField {
        field,
        value: raw.to_string(),
    };

    let (mantissa, exponent) = match raw.rfind(['+', '-']) {
        Some(pos) if pos > 0 => (&raw[..pos], &raw[pos..]),
        _ => (raw, "0"),
    };
    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(digits) => (-1.0, digits),
        None => (1.0, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let mantissa: f64 = format!("0.{digits}").parse().map_err(|_| invalid())?;
    let exponent: i32 = exponent.parse().map_err(|_| invalid())?;
    Ok(sign * mantissa * 10f64.powi(exponent))
}
