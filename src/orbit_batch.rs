//! # Orbit batches
//!
//! This module provides the [`OrbitBatch`] type, a column-oriented container holding
//! the element arrays of `N` tracked objects. It is the input of the vectorized
//! distance metric ([`crate::distance::distance_matrix`]).
//!
//! ## Invariants
//! -----------------
//! - Every column has the same length `N`; index `i` refers to the same object in
//!   every column.
//! - `N = 0` is a valid, empty batch. Every downstream operation returns an empty
//!   result for it.
//! - A batch exclusively owns its columns: sub-selection copies, it never aliases
//!   the parent batch.
//!
//! ## Construction Paths
//! -----------------
//! - [`OrbitBatch::from_tle_pairs`] — parse raw element pairs, **skipping** malformed
//!   records and reporting them in [`BatchIngestion::skipped`].
//! - [`OrbitBatch::try_from_tle_pairs`] — same, but the first malformed record fails
//!   the whole batch.
//! - [`OrbitBatch::from_tles`] / [`OrbitBatch::from_elements`] — from already parsed values.
//! - [`OrbitBatch::from_columns`] — reuse precomputed columns verbatim (`p` and `q`
//!   are **not** recomputed), used to rebuild filtered or reordered views.
//! - [`OrbitBatch::select`] / [`OrbitBatch::select_mask`] — independent sub-batches.
//!
//! ## Example
//! -----------------
//! ```rust
//! use unique_orbits::orbit_batch::OrbitBatch;
//!
//! let pairs = [(
//!     "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927",
//!     "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537",
//! )];
//! let ingestion = OrbitBatch::from_tle_pairs(&pairs, false);
//! assert_eq!(ingestion.batch.len(), 1);
//! assert!(ingestion.skipped.is_empty());
//! ```
use nalgebra::DVector;
use tracing::warn;

use crate::{
    orbit_type::orbital_element_set::OrbitalElementSet,
    tle::{ParseTleError, TwoLineElement},
    unique_orbits_errors::UniqueOrbitsError,
};

/// Precomputed element columns, in the units of [`OrbitalElementSet`].
///
/// This is the raw material of [`OrbitBatch::from_columns`] and the output of
/// [`OrbitBatch::into_columns`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrbitColumns {
    pub semi_major_axis: DVector<f64>,
    pub eccentricity: DVector<f64>,
    pub inclination: DVector<f64>,
    pub periapsis_argument: DVector<f64>,
    pub ascending_node: DVector<f64>,
    pub perigee_altitude: DVector<f64>,
    pub semi_latus_rectum: DVector<f64>,
}

impl OrbitColumns {
    fn lengths(&self) -> [usize; 7] {
        [
            self.semi_major_axis.len(),
            self.eccentricity.len(),
            self.inclination.len(),
            self.periapsis_argument.len(),
            self.ascending_node.len(),
            self.perigee_altitude.len(),
            self.semi_latus_rectum.len(),
        ]
    }
}

/// Element arrays of `N` objects, index-aligned across columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrbitBatch {
    columns: OrbitColumns,
}

/// A record rejected while building a batch from raw element pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position of the record in the input.
    pub index: usize,
    pub error: ParseTleError,
}

impl From<SkippedRecord> for UniqueOrbitsError {
    fn from(skipped: SkippedRecord) -> Self {
        UniqueOrbitsError::ParseError {
            index: skipped.index,
            source: skipped.error,
        }
    }
}

/// Outcome of a skip-and-report batch construction.
///
/// Fields
/// -----------------
/// * `batch` – Orbits of the records that parsed.
/// * `source_indices` – For each row of `batch`, the position of its record in the input.
/// * `skipped` – Records that failed to parse, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchIngestion {
    pub batch: OrbitBatch,
    pub source_indices: Vec<usize>,
    pub skipped: Vec<SkippedRecord>,
}

impl OrbitBatch {
    /// Parse raw `(line 1, line 2)` pairs, skipping malformed records.
    ///
    /// Arguments
    /// -----------------
    /// * `pairs` – Element pairs, one per object.
    /// * `verify_checksum` – Forwarded to [`TwoLineElement::parse_checked`].
    ///
    /// Return
    /// ----------
    /// * A [`BatchIngestion`] with the batch of valid records, the mapping of batch rows
    ///   to input positions, and the list of skipped records.
    pub fn from_tle_pairs<S: AsRef<str>>(pairs: &[(S, S)], verify_checksum: bool) -> BatchIngestion {
        let mut tles = Vec::with_capacity(pairs.len());
        let mut source_indices = Vec::with_capacity(pairs.len());
        let mut skipped = Vec::new();

        for (index, (line1, line2)) in pairs.iter().enumerate() {
            match TwoLineElement::parse_checked(line1.as_ref(), line2.as_ref(), verify_checksum) {
                Ok(tle) => {
                    tles.push(tle);
                    source_indices.push(index);
                }
                Err(error) => {
                    warn!(index, %error, "skipping malformed element set");
                    skipped.push(SkippedRecord { index, error });
                }
            }
        }

        BatchIngestion {
            batch: OrbitBatch::from_tles(&tles),
            source_indices,
            skipped,
        }
    }

    /// Parse raw `(line 1, line 2)` pairs, failing on the first malformed record.
    ///
    /// Errors
    /// ------
    /// Returns [`UniqueOrbitsError::ParseError`] carrying the index of the offending record.
    pub fn try_from_tle_pairs<S: AsRef<str>>(
        pairs: &[(S, S)],
        verify_checksum: bool,
    ) -> Result<Self, UniqueOrbitsError> {
        let tles = pairs
            .iter()
            .enumerate()
            .map(|(index, (line1, line2))| {
                TwoLineElement::parse_checked(line1.as_ref(), line2.as_ref(), verify_checksum)
                    .map_err(|source| UniqueOrbitsError::ParseError { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OrbitBatch::from_tles(&tles))
    }

    /// Build a batch from parsed TLEs, deriving every column.
    pub fn from_tles(tles: &[TwoLineElement]) -> Self {
        let elements: Vec<OrbitalElementSet> = tles.iter().map(OrbitalElementSet::from_tle).collect();
        OrbitBatch::from_elements(&elements)
    }

    /// Build a batch from element sets, keeping their `p` and `q` as they are.
    pub fn from_elements(elements: &[OrbitalElementSet]) -> Self {
        let column = |field: fn(&OrbitalElementSet) -> f64| {
            DVector::from_iterator(elements.len(), elements.iter().map(field))
        };
        OrbitBatch {
            columns: OrbitColumns {
                semi_major_axis: column(|e| e.semi_major_axis),
                eccentricity: column(|e| e.eccentricity),
                inclination: column(|e| e.inclination),
                periapsis_argument: column(|e| e.periapsis_argument),
                ascending_node: column(|e| e.ascending_node),
                perigee_altitude: column(|e| e.perigee_altitude),
                semi_latus_rectum: column(|e| e.semi_latus_rectum),
            },
        }
    }

    /// Wrap precomputed columns without recomputing anything.
    ///
    /// Errors
    /// ------
    /// Returns [`UniqueOrbitsError::ColumnLengthMismatch`] if the columns differ in length.
    pub fn from_columns(columns: OrbitColumns) -> Result<Self, UniqueOrbitsError> {
        let lengths = columns.lengths();
        if lengths.iter().any(|&len| len != lengths[0]) {
            return Err(UniqueOrbitsError::ColumnLengthMismatch(lengths.to_vec()));
        }
        Ok(OrbitBatch { columns })
    }

    /// Give the columns back to the caller.
    pub fn into_columns(self) -> OrbitColumns {
        self.columns
    }

    /// Number of orbits in the batch.
    pub fn len(&self) -> usize {
        self.columns.semi_major_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn semi_major_axis(&self) -> &DVector<f64> {
        &self.columns.semi_major_axis
    }

    pub fn eccentricity(&self) -> &DVector<f64> {
        &self.columns.eccentricity
    }

    pub fn inclination(&self) -> &DVector<f64> {
        &self.columns.inclination
    }

    pub fn periapsis_argument(&self) -> &DVector<f64> {
        &self.columns.periapsis_argument
    }

    pub fn ascending_node(&self) -> &DVector<f64> {
        &self.columns.ascending_node
    }

    pub fn perigee_altitude(&self) -> &DVector<f64> {
        &self.columns.perigee_altitude
    }

    pub fn semi_latus_rectum(&self) -> &DVector<f64> {
        &self.columns.semi_latus_rectum
    }

    /// Element set of row `index`, if any.
    pub fn get(&self, index: usize) -> Option<OrbitalElementSet> {
        (index < self.len()).then(|| self.row(index))
    }

    /// Iterate over the rows as element sets.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = OrbitalElementSet> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }

    fn row(&self, index: usize) -> OrbitalElementSet {
        let c = &self.columns;
        OrbitalElementSet {
            semi_major_axis: c.semi_major_axis[index],
            eccentricity: c.eccentricity[index],
            inclination: c.inclination[index],
            periapsis_argument: c.periapsis_argument[index],
            ascending_node: c.ascending_node[index],
            perigee_altitude: c.perigee_altitude[index],
            semi_latus_rectum: c.semi_latus_rectum[index],
        }
    }

    /// Copy the rows at `indices`, in that order, into a new batch.
    ///
    /// Indices may repeat; the copy shares nothing with `self`.
    ///
    /// Errors
    /// ------
    /// Returns [`UniqueOrbitsError::SelectionOutOfBounds`] for the first index `>= len()`.
    pub fn select(&self, indices: &[usize]) -> Result<Self, UniqueOrbitsError> {
        let len = self.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(UniqueOrbitsError::SelectionOutOfBounds { index, len });
        }

        let c = &self.columns;
        Ok(OrbitBatch {
            columns: OrbitColumns {
                semi_major_axis: c.semi_major_axis.select_rows(indices),
                eccentricity: c.eccentricity.select_rows(indices),
                inclination: c.inclination.select_rows(indices),
                periapsis_argument: c.periapsis_argument.select_rows(indices),
                ascending_node: c.ascending_node.select_rows(indices),
                perigee_altitude: c.perigee_altitude.select_rows(indices),
                semi_latus_rectum: c.semi_latus_rectum.select_rows(indices),
            },
        })
    }

    /// Copy the rows whose mask entry is `true` into a new batch.
    ///
    /// Errors
    /// ------
    /// Returns [`UniqueOrbitsError::MaskLengthMismatch`] if `mask.len() != len()`.
    pub fn select_mask(&self, mask: &[bool]) -> Result<Self, UniqueOrbitsError> {
        if mask.len() != self.len() {
            return Err(UniqueOrbitsError::MaskLengthMismatch {
                mask: mask.len(),
                len: self.len(),
            });
        }
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        self.select(&indices)
    }
}

#[cfg(test)]
mod orbit_batch_test {
    use super::*;
    use crate::tle::tle_test::{ISS_LINE1, ISS_LINE2};

    const VANGUARD_LINE1: &str =
        "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
    const VANGUARD_LINE2: &str =
        "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

    #[test]
    fn test_skip_and_report() {
        let pairs = [
            (ISS_LINE1, ISS_LINE2),
            ("1 garbage", ISS_LINE2),
            (VANGUARD_LINE1, VANGUARD_LINE2),
        ];
        let ingestion = OrbitBatch::from_tle_pairs(&pairs, false);

        assert_eq!(ingestion.batch.len(), 2);
        assert_eq!(ingestion.source_indices, vec![0, 2]);
        assert_eq!(ingestion.skipped.len(), 1);
        assert_eq!(ingestion.skipped[0].index, 1);
        assert!(matches!(
            ingestion.skipped[0].error,
            ParseTleError::TooShortLine { line: 1, .. }
        ));
    }

    #[test]
    fn test_strict_construction_reports_index() {
        let pairs = [(ISS_LINE1, ISS_LINE2), (ISS_LINE2, ISS_LINE1)];
        let err = OrbitBatch::try_from_tle_pairs(&pairs, false).unwrap_err();
        assert_eq!(
            err,
            UniqueOrbitsError::ParseError {
                index: 1,
                source: ParseTleError::WrongLineNumber {
                    line: 1,
                    found: '2'
                }
            }
        );
    }

    #[test]
    fn test_empty_batch() {
        let pairs: [(&str, &str); 0] = [];
        let batch = OrbitBatch::try_from_tle_pairs(&pairs, true).unwrap();
        assert!(batch.is_empty());
        assert!(batch.get(0).is_none());
        assert!(batch.select(&[]).unwrap().is_empty());
        assert!(batch.select_mask(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_from_columns_keeps_values_verbatim() {
        let columns = OrbitColumns {
            semi_major_axis: DVector::from_vec(vec![7000.0]),
            eccentricity: DVector::from_vec(vec![0.1]),
            inclination: DVector::from_vec(vec![0.9]),
            periapsis_argument: DVector::from_vec(vec![0.0]),
            ascending_node: DVector::from_vec(vec![0.0]),
            // deliberately inconsistent with a and e
            perigee_altitude: DVector::from_vec(vec![1.0]),
            semi_latus_rectum: DVector::from_vec(vec![2.0]),
        };
        let batch = OrbitBatch::from_columns(columns.clone()).unwrap();
        assert_eq!(batch.semi_latus_rectum()[0], 2.0);
        assert_eq!(batch.perigee_altitude()[0], 1.0);
        assert_eq!(batch.into_columns(), columns);
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let columns = OrbitColumns {
            semi_major_axis: DVector::from_vec(vec![7000.0, 7100.0]),
            ..Default::default()
        };
        assert_eq!(
            OrbitBatch::from_columns(columns),
            Err(UniqueOrbitsError::ColumnLengthMismatch(vec![
                2, 0, 0, 0, 0, 0, 0
            ]))
        );
    }

    #[test]
    fn test_select_is_an_independent_copy() {
        let pairs = [(ISS_LINE1, ISS_LINE2), (VANGUARD_LINE1, VANGUARD_LINE2)];
        let batch = OrbitBatch::try_from_tle_pairs(&pairs, false).unwrap();

        let reordered = batch.select(&[1, 0, 1]).unwrap();
        assert_eq!(reordered.len(), 3);
        assert_eq!(reordered.get(0), batch.get(1));
        assert_eq!(reordered.get(1), batch.get(0));
        assert_eq!(reordered.get(2), batch.get(1));

        let mut columns = reordered.into_columns();
        columns.eccentricity[0] = 0.5;
        assert_ne!(batch.eccentricity()[1], 0.5);

        assert_eq!(
            batch.select(&[0, 2]),
            Err(UniqueOrbitsError::SelectionOutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_select_mask() {
        let pairs = [(ISS_LINE1, ISS_LINE2), (VANGUARD_LINE1, VANGUARD_LINE2)];
        let batch = OrbitBatch::try_from_tle_pairs(&pairs, false).unwrap();

        let masked = batch.select_mask(&[false, true]).unwrap();
        assert_eq!(masked.len(), 1);
        assert_eq!(masked.get(0), batch.get(1));

        assert_eq!(
            batch.select_mask(&[true]),
            Err(UniqueOrbitsError::MaskLengthMismatch { mask: 1, len: 2 })
        );
    }
}
