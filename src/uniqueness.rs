//! # Uniqueness scoring
//!
//! Rank the objects of one homogeneous group (one orbital regime) by how isolated
//! their orbits are, from the group's self distance matrix.
//!
//! ## Algorithm
//!
//! 1. **Raw score** – for each row, leave out the diagonal entry (the object
//!    itself), sort the other distances ascending with NaN last and average the first
//!    `k` (fewer when the group has fewer than `k + 1` members).
//! 2. **Statistics** – mean and population variance of the finite raw scores.
//! 3. **Outlier rejection** – objects whose squared deviation divided by the variance
//!    is `≥ outlier_z2` are rejected. A zero (or non-finite) variance rejects nothing.
//!    Non-finite raw scores (degenerate elements) are always rejected.
//! 4. **Normalization** – min-max scaling of the surviving scores to `[0, 1]`; all
//!    survivors get `0` when the scores are all equal.
//! 5. **Rank** – ordinal rank by descending uniqueness, `1` = most unique, ties kept
//!    in row order.
//! 6. **Labels** – the first `label_count` ranks are labelled [`UniquenessRange::Most`],
//!    the last `label_count` [`UniquenessRange::Least`], the others
//!    [`UniquenessRange::None`]. Groups with fewer than `min_labelled_group` survivors
//!    are labelled [`UniquenessRange::Unknown`] as a whole.
//!
//! Group-size shortfalls never fail: they are reported as [`GroupSizeWarning`]s.
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    constants::DistanceMatrix,
    neighbours::nearest_indices,
    ranking_params::{RankingParams, RankingParamsBuilder},
    unique_orbits_errors::UniqueOrbitsError,
};

/// Categorical uniqueness label of a scored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UniquenessRange {
    Most,
    Least,
    None,
    Unknown,
}

impl fmt::Display for UniquenessRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UniquenessRange::Most => "most",
            UniquenessRange::Least => "least",
            UniquenessRange::None => "none",
            UniquenessRange::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Score of one surviving object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UniquenessResult {
    /// Row of the object in the scored distance matrix.
    pub index: usize,
    /// Mean distance to the `k` nearest neighbours.
    pub raw_score: f64,
    /// Min-max normalized score in `[0, 1]`.
    pub uniqueness: f64,
    /// Ordinal rank, `1` = most unique.
    pub rank: usize,
    pub range: UniquenessRange,
}

/// Mean and population variance of the finite raw scores, before rejection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreStatistics {
    pub mean: f64,
    pub variance: f64,
}

/// Non-fatal group-size shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupSizeWarning {
    /// Fewer neighbours than `k`: all available neighbours were averaged.
    FewerNeighboursThanK { available: usize, requested: usize },
    /// Too few survivors to assign labels: the whole group is labelled "unknown".
    TooFewForLabels { survivors: usize, required: usize },
}

impl fmt::Display for GroupSizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSizeWarning::FewerNeighboursThanK {
                available,
                requested,
            } => write!(
                f,
                "only {available} neighbours available for k = {requested}, averaging all of them"
            ),
            GroupSizeWarning::TooFewForLabels {
                survivors,
                required,
            } => write!(
                f,
                "{survivors} survivors, at least {required} needed for labels; group labelled unknown"
            ),
        }
    }
}

/// Outcome of [`UniquenessScorer::score`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UniquenessRanking {
    /// Surviving objects sorted by rank.
    pub results: Vec<UniquenessResult>,
    /// Rows removed by the outlier filter (including non-finite scores), ascending.
    pub rejected: Vec<usize>,
    /// Rows without any neighbour to score against (a group of one).
    pub unscored: Vec<usize>,
    /// `None` when no row produced a finite score.
    pub statistics: Option<ScoreStatistics>,
    pub warnings: Vec<GroupSizeWarning>,
}

impl UniquenessRanking {
    /// Result of row `index`, if it survived.
    pub fn result_of(&self, index: usize) -> Option<&UniquenessResult> {
        self.results.iter().find(|r| r.index == index)
    }
}

/// k-nearest-neighbour uniqueness scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniquenessScorer {
    pub k: usize,
    pub outlier_z2: f64,
    pub label_count: usize,
    pub min_labelled_group: usize,
}

impl Default for UniquenessScorer {
    fn default() -> Self {
        UniquenessScorer::from(&RankingParams::default())
    }
}

impl From<&RankingParams> for UniquenessScorer {
    fn from(params: &RankingParams) -> Self {
        UniquenessScorer {
            k: params.scoring_k,
            outlier_z2: params.outlier_z2,
            label_count: params.label_count,
            min_labelled_group: params.min_labelled_group,
        }
    }
}

impl UniquenessScorer {
    /// Scorer averaging `k` neighbours and rejecting squared z-scores `≥ outlier_z2`,
    /// with the default labelling (top/bottom 5, at least 10 survivors).
    ///
    /// The values are not checked here; [`UniquenessScorer::score`] refuses an
    /// invalid configuration.
    pub fn new(k: usize, outlier_z2: f64) -> Self {
        UniquenessScorer {
            k,
            outlier_z2,
            ..UniquenessScorer::default()
        }
    }

    /// Override the labelling policy.
    pub fn with_labels(mut self, label_count: usize, min_labelled_group: usize) -> Self {
        self.label_count = label_count;
        self.min_labelled_group = min_labelled_group;
        self
    }

    /// Mean of the `k` smallest off-diagonal distances of each row.
    ///
    /// Return
    /// ----------
    /// * One score per row; `None` for rows with no other entry.
    pub fn raw_scores(&self, distances: &DistanceMatrix) -> Vec<Option<f64>> {
        (0..distances.nrows())
            .map(|i| {
                let nearest = nearest_indices(distances.row(i).iter().copied(), i, self.k);
                if nearest.is_empty() {
                    None
                } else {
                    let total: f64 = nearest.iter().map(|(_, d)| d).sum();
                    Some(total / nearest.len() as f64)
                }
            })
            .collect()
    }

    /// Check the scorer configuration.
    ///
    /// Errors
    /// ----------
    /// * [`UniqueOrbitsError::InvalidRankingParameter`] unless `k ≥ 1`, `outlier_z2 > 0`,
    ///   `label_count ≥ 1` and `min_labelled_group ≥ 2 · label_count`.
    pub fn validate(&self) -> Result<(), UniqueOrbitsError> {
        if self.k == 0 {
            return Err(UniqueOrbitsError::InvalidRankingParameter(
                "k must be >= 1".into(),
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

    /// Score a group from its square self distance matrix.
    ///
    /// Arguments
    /// -----------------
    /// * `distances` – Self distance matrix of the group, zero on the diagonal.
    ///
    /// Return
    /// ----------
    /// * A [`UniquenessRanking`]; empty for a group of zero or one object.
    ///
    /// Errors
    /// ----------
    /// * [`UniqueOrbitsError::InvalidRankingParameter`] if the configuration is invalid,
    ///   see [`UniquenessScorer::validate`].
    /// * [`UniqueOrbitsError::NonSquareDistanceMatrix`] if the matrix is not square.
    pub fn score(
        &self,
        distances: &DistanceMatrix,
    ) -> Result<UniquenessRanking, UniqueOrbitsError> {
        self.validate()?;
        let (rows, cols) = distances.shape();
        if rows != cols {
            return Err(UniqueOrbitsError::NonSquareDistanceMatrix { rows, cols });
        }

        let mut ranking = UniquenessRanking::default();
        if rows == 0 {
            return Ok(ranking);
        }

        let available = rows - 1;
        if available < self.k {
            ranking.warnings.push(GroupSizeWarning::FewerNeighboursThanK {
                available,
                requested: self.k,
            });
        }

        let mut finite = Vec::with_capacity(rows);
        for (index, score) in self.raw_scores(distances).into_iter().enumerate() {
            match score {
                None => ranking.unscored.push(index),
                Some(s) if s.is_finite() => finite.push((index, s)),
                Some(_) => ranking.rejected.push(index),
            }
        }

        if finite.is_empty() {
            self.log_warnings(&ranking.warnings);
            return Ok(ranking);
        }

        let count = finite.len() as f64;
        let mean = finite.iter().map(|(_, s)| s).sum::<f64>() / count;
        let variance = finite.iter().map(|(_, s)| (s - mean).powi(2)).sum::<f64>() / count;
        ranking.statistics = Some(ScoreStatistics { mean, variance });

        let filter_active = variance.is_finite() && variance > 0.0;
        let (survivors, outliers): (Vec<_>, Vec<_>) = finite.into_iter().partition(|(_, s)| {
            !filter_active || (s - mean).powi(2) / variance < self.outlier_z2
        });
        ranking.rejected.extend(outliers.iter().map(|(i, _)| *i));
        ranking.rejected.sort_unstable();

        let (min, max) = survivors
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, s)| {
                (lo.min(*s), hi.max(*s))
            });
        let span = max - min;

        let mut results: Vec<UniquenessResult> = survivors
            .into_iter()
            .map(|(index, raw_score)| UniquenessResult {
                index,
                raw_score,
                uniqueness: if span > 0.0 { (raw_score - min) / span } else { 0.0 },
                rank: 0,
                range: UniquenessRange::None,
            })
            .collect();

        // stable: equal uniqueness keeps row order
        results.sort_by(|a, b| b.uniqueness.total_cmp(&a.uniqueness));

        let n_survivors = results.len();
        let labelled = n_survivors >= self.min_labelled_group;
        if !labelled && n_survivors > 0 {
            ranking.warnings.push(GroupSizeWarning::TooFewForLabels {
                survivors: n_survivors,
                required: self.min_labelled_group,
            });
        }
        for (position, result) in results.iter_mut().enumerate() {
            result.rank = position + 1;
            result.range = if !labelled {
                UniquenessRange::Unknown
            } else if position < self.label_count {
                UniquenessRange::Most
            } else if position >= n_survivors.saturating_sub(self.label_count) {
                UniquenessRange::Least
            } else {
                UniquenessRange::None
            };
        }

        debug!(
            members = rows,
            survivors = n_survivors,
            rejected = ranking.rejected.len(),
            mean,
            variance,
            "uniqueness scores computed"
        );
        self.log_warnings(&ranking.warnings);

        ranking.results = results;
        Ok(ranking)
    }

    fn log_warnings(&self, warnings: &[GroupSizeWarning]) {
        for warning in warnings {
            warn!("{warning}");
        }
    }
}
