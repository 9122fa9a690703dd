//! # Ranking parameters
//!
//! This module defines the [`RankingParams`](crate::ranking_params::RankingParams)
//! configuration struct and its builder, which control how a catalog is scored and
//! how nearest-neighbour lists are built.
//!
//! ## Purpose
//!
//! [`RankingParams`] centralizes all tunable parameters used by
//! [`rank_catalog`](crate::catalog_ranking::rank_catalog). It allows you to:
//!
//! - Choose how many neighbours are averaged into the uniqueness score (`scoring_k`),
//! - Tune the outlier filter applied before normalization (`outlier_z2`),
//! - Control the "most" / "least" labelling (`label_count`, `min_labelled_group`),
//! - Choose how many neighbours are reported per object and where they are searched
//!   (`top_k`, `neighbour_scope`),
//! - Decide what happens to outlier-rejected objects in the final report (`rejected_policy`),
//! - Enable TLE checksum verification at ingestion (`verify_checksum`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use unique_orbits::ranking_params::{NeighbourScope, RankingParams};
//!
//! let params = RankingParams::builder()
//!     .scoring_k(50)
//!     .top_k(5)
//!     .neighbour_scope(NeighbourScope::Catalog)
//!     .build()
//!     .unwrap();
//! ```
//!
//! [`RankingParams`] also implements `serde::Deserialize`; missing fields take
//! their default value, so a host application can load a partial configuration
//! from any serde format.
use std::cmp::Ordering::Greater;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::unique_orbits_errors::UniqueOrbitsError;

/// Where nearest neighbours are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighbourScope {
    /// Only objects of the same orbital regime.
    #[default]
    Regime,
    /// Every parsed object of the catalog, whatever its regime.
    Catalog,
}

/// What the catalog report does with objects rejected by the outlier filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectedPolicy {
    /// Rejected objects are absent from the report.
    #[default]
    Omit,
    /// Rejected objects are reported without score or rank, labelled `none`.
    KeepUnscored,
}

/// Configuration of the uniqueness ranking and neighbour lookup.
///
/// Invariants (enforced by [`RankingParamsBuilder::build`])
/// -----------------
/// * `scoring_k ≥ 1`, `top_k ≥ 1`, `label_count ≥ 1`.
/// * `outlier_z2 > 0` (NaN rejected).
/// * `min_labelled_group ≥ 2 · label_count`, so the "most" and "least" sets never overlap.
///
/// See also
/// -----------------
/// * [`UniquenessScorer`](crate::uniqueness::UniquenessScorer) – consumes the scoring fields.
/// * [`nearest_neighbours`](crate::neighbours::nearest_neighbours) – consumes `top_k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingParams {
    /// Number of neighbours reported per object.
    pub top_k: usize,
    /// Number of nearest neighbours averaged into the raw uniqueness score.
    pub scoring_k: usize,
    /// Maximum squared z-score of a raw score; objects at or above it are rejected.
    pub outlier_z2: f64,
    /// Number of objects labelled "most" (and "least") in a group.
    pub label_count: usize,
    /// Minimum number of surviving objects for labels to be assigned at all.
    pub min_labelled_group: usize,
    pub neighbour_scope: NeighbourScope,
    pub rejected_policy: RejectedPolicy,
    /// Verify the modulo-10 checksum of both TLE lines at ingestion.
    pub verify_checksum: bool,
}

impl RankingParams {
    /// Construct a new [`RankingParams`] with the default values.
    ///
    /// This is equivalent to calling [`RankingParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`RankingParamsBuilder`] starting from the defaults.
    pub fn builder() -> RankingParamsBuilder {
        RankingParamsBuilder::new()
    }
}

impl Default for RankingParams {
    fn default() -> Self {
        RankingParams {
            top_k: 10,
            scoring_k: 100,
            outlier_z2: 2.71,
            label_count: 5,
            min_labelled_group: 10,
            neighbour_scope: NeighbourScope::Regime,
            rejected_policy: RejectedPolicy::Omit,
            verify_checksum: false,
        }
    }
}

/// Builder for [`RankingParams`], with validation.
#[derive(Debug, Clone)]
pub struct RankingParamsBuilder {
    params: RankingParams,
}

impl Default for RankingParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: RankingParams::default(),
        }
    }

    // --- Scoring ---
    pub fn scoring_k(mut self, v: usize) -> Self {
        self.params.scoring_k = v;
        self
    }
    pub fn outlier_z2(mut self, v: f64) -> Self {
        self.params.outlier_z2 = v;
        self
    }
    pub fn label_count(mut self, v: usize) -> Self {
        self.params.label_count = v;
        self
    }
    pub fn min_labelled_group(mut self, v: usize) -> Self {
        self.params.min_labelled_group = v;
        self
    }

    // --- Neighbours ---
    pub fn top_k(mut self, v: usize) -> Self {
        self.params.top_k = v;
        self
    }
    pub fn neighbour_scope(mut self, v: NeighbourScope) -> Self {
        self.params.neighbour_scope = v;
        self
    }

    // --- Report / ingestion ---
    pub fn rejected_policy(mut self, v: RejectedPolicy) -> Self {
        self.params.rejected_policy = v;
        self
    }
    pub fn verify_checksum(mut self, v: bool) -> Self {
        self.params.verify_checksum = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    pub(crate) fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder and produce a [`RankingParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `scoring_k ≥ 1` – at least one neighbour must enter the raw score.
    /// * `top_k ≥ 1` – neighbour lists cannot be requested empty.
    /// * `outlier_z2 > 0.0` – a zero or NaN threshold would reject every object.
    /// * `label_count ≥ 1`.
    /// * `min_labelled_group ≥ 2 · label_count`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(RankingParams)` if all values are valid.
    /// * `Err(UniqueOrbitsError::InvalidRankingParameter)` naming the first failing rule.
    pub fn build(self) -> Result<RankingParams, UniqueOrbitsError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl RankingParams {
    /// Check the invariants listed on [`RankingParams`].
    ///
    /// Parameters obtained through serde deserialization bypass the builder;
    /// [`rank_catalog`](crate::catalog_ranking::rank_catalog) calls this before using them.
    pub fn validate(&self) -> Result<(), UniqueOrbitsError> {
        if self.scoring_k == 0 {
            return Err(UniqueOrbitsError::InvalidRankingParameter(
                "scoring_k must be >= 1".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(UniqueOrbitsError::InvalidRankingParameter(
                "top_k must be >= 1".into(),
            ));
        }
        if !RankingParamsBuilder::gt0(self.outlier_z2) {
            return Err(UniqueOrbitsError::InvalidRankingParameter(
                "outlier_z2 must be > 0".into(),
            ));
        }
        if self.label_count == 0 {
            return Err(UniqueOrbitsError::InvalidRankingParameter(
                "label_count must be >= 1".into(),
            ));
        }
        if self.min_labelled_group < 2 * self.label_count {
            return Err(UniqueOrbitsError::InvalidRankingParameter(
                "min_labelled_group must be >= 2 * label_count".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RankingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 32; // width reserved for "name = value"
            writeln!(f, "Ranking Parameters")?;
            writeln!(f, "------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = " ".repeat(PARAM_COL.saturating_sub(s.len()).max(1));
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Uniqueness scoring]")?;
            line!(
                "scoring_k          = {}",
                self.scoring_k,
                "Neighbours averaged per score"
            )?;
            line!(
                "outlier_z2         = {:.2}",
                self.outlier_z2,
                "Squared z-score rejection threshold"
            )?;
            line!(
                "label_count        = {}",
                self.label_count,
                "Objects labelled most / least"
            )?;
            line!(
                "min_labelled_group = {}",
                self.min_labelled_group,
                "Survivors required for labels"
            )?;

            writeln!(f, "[Neighbours]")?;
            line!(
                "top_k              = {}",
                self.top_k,
                "Neighbours reported per object"
            )?;
            line!(
                "neighbour_scope    = {:?}",
                self.neighbour_scope,
                "Where neighbours are searched"
            )?;

            writeln!(f, "[Report / ingestion]")?;
            line!(
                "rejected_policy    = {:?}",
                self.rejected_policy,
                "Fate of outlier-rejected objects"
            )?;
            line!(
                "verify_checksum    = {}",
                self.verify_checksum,
                "TLE checksum verification"
            )?;

            Ok(())
        } else {
            write!(
                f,
                "RankingParams(scoring_k={}, outlier_z2={:.2}, labels={}/{}, top_k={}, scope={:?}, rejected={:?}, checksum={})",
                self.scoring_k,
                self.outlier_z2,
                self.label_count,
                self.min_labelled_group,
                self.top_k,
                self.neighbour_scope,
                self.rejected_policy,
                self.verify_checksum,
            )
        }
    }
}
