//! # Catalog ranking
//!
//! End-to-end ranking of a catalog of element sets: every record is parsed,
//! partitioned by orbital regime, and each regime is scored independently.
//!
//! ## Pipeline
//!
//! 1. **Ingestion** – each [`ElementRecord`] is parsed with
//!    [`TwoLineElement::parse_checked`]; malformed records are skipped and reported.
//! 2. **Partition** – parsed objects are grouped with the [`RegimeMap`]; objects
//!    without a regime are listed as unclassified and never scored.
//! 3. **Per regime** – the regime sub-batch is compared with itself
//!    ([`self_distance_matrix`]), scored ([`UniquenessScorer`]) and given its
//!    nearest neighbours, searched either within the regime or across every parsed
//!    object ([`NeighbourScope`]).
//! 4. **Join** – results are joined by [`CatalogId`] into [`SatelliteReport`]s.
//!
//! The result is a fresh value; nothing is cached between calls.
use std::collections::{BTreeMap, HashSet};

use ahash::RandomState;
use hifitime::Epoch;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::{
    constants::CatalogId,
    distance::{distance_matrix, self_distance_matrix},
    neighbours::{nearest_neighbours, neighbours_against, Neighbour},
    orbit_batch::{OrbitBatch, SkippedRecord},
    orbit_type::orbital_element_set::OrbitalElementSet,
    ranking_params::{NeighbourScope, RankingParams, RejectedPolicy},
    regime::{OrbitalRegime, RegimeMap},
    tle::{catalog::ElementRecord, TwoLineElement},
    unique_orbits_errors::UniqueOrbitsError,
    uniqueness::{GroupSizeWarning, ScoreStatistics, UniquenessRange, UniquenessScorer},
};

/// Everything known about one ranked object.
///
/// `uniqueness`, `raw_score` and `rank` are `None` for objects that could not be
/// scored (alone in their regime) or that were rejected as outliers and kept
/// through [`RejectedPolicy::KeepUnscored`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteReport {
    pub id: CatalogId,
    pub name: String,
    pub regime: OrbitalRegime,
    #[serde(serialize_with = "serialize_epoch")]
    pub epoch: Epoch,
    pub elements: OrbitalElementSet,
    pub raw_score: Option<f64>,
    pub uniqueness: Option<f64>,
    pub rank: Option<usize>,
    pub range: UniquenessRange,
    pub neighbours: Vec<Neighbour>,
}

fn serialize_epoch<S: Serializer>(epoch: &Epoch, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(epoch)
}

/// Per-regime outcome of the scoring step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeSummary {
    pub regime: OrbitalRegime,
    /// Parsed objects assigned to the regime.
    pub members: usize,
    /// Objects that received a uniqueness score.
    pub survivors: usize,
    /// Objects removed by the outlier filter.
    pub rejected: Vec<CatalogId>,
    pub statistics: Option<ScoreStatistics>,
    pub warnings: Vec<GroupSizeWarning>,
}

/// Result of [`rank_catalog`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRanking {
    /// Reports keyed by catalog identifier.
    pub reports: BTreeMap<CatalogId, SatelliteReport>,
    /// One summary per regime present in the input, in regime order.
    pub regimes: Vec<RegimeSummary>,
    /// Records that failed to parse; `index` refers to the input slice.
    pub skipped: Vec<SkippedRecord>,
    /// Parsed objects with no regime assignment.
    pub unclassified: Vec<CatalogId>,
}

impl CatalogRanking {
    /// Report of one object, if it was ranked.
    pub fn report(&self, id: &CatalogId) -> Option<&SatelliteReport> {
        self.reports.get(id)
    }

    /// Reports of one regime, by ascending rank; unscored objects come last.
    pub fn ranked(&self, regime: OrbitalRegime) -> Vec<&SatelliteReport> {
        let mut reports: Vec<&SatelliteReport> = self
            .reports
            .values()
            .filter(|r| r.regime == regime)
            .collect();
        reports.sort_by_key(|r| (r.rank.is_none(), r.rank));
        reports
    }

    /// Summary of one regime, if any object was assigned to it.
    pub fn summary(&self, regime: OrbitalRegime) -> Option<&RegimeSummary> {
        self.regimes.iter().find(|s| s.regime == regime)
    }
}

fn check_unique_ids(records: &[ElementRecord]) -> Result<(), UniqueOrbitsError> {
    let mut seen: HashSet<&CatalogId, RandomState> =
        HashSet::with_capacity_and_hasher(records.len(), RandomState::new());
    for record in records {
        if !seen.insert(&record.id) {
            return Err(UniqueOrbitsError::DuplicateCatalogId(record.id.clone()));
        }
    }
    Ok(())
}

/// Rank every object of a catalog against the other objects of its regime.
///
/// Arguments
/// -----------------
/// * `records` – Element sets of the catalog, one per object.
/// * `regimes` – Orbital regime of each catalog identifier.
/// * `params` – Scoring, neighbour and report settings.
///
/// Return
/// ----------
/// * A [`CatalogRanking`] with one [`SatelliteReport`] per ranked object, one
///   [`RegimeSummary`] per regime, the skipped records and the unclassified objects.
///
/// Errors
/// ----------
/// * [`UniqueOrbitsError::InvalidRankingParameter`] if `params` fails validation.
/// * [`UniqueOrbitsError::DuplicateCatalogId`] if two records share an identifier.
///
/// Malformed records, degenerate elements and undersized regimes are not errors;
/// they are reported in the result.
///
/// See also
/// ------------
/// * [`UniquenessScorer::score`] – per-regime scoring.
/// * [`nearest_neighbours`] – per-regime neighbour lists.
pub fn rank_catalog(
    records: &[ElementRecord],
    regimes: &RegimeMap,
    params: &RankingParams,
) -> Result<CatalogRanking, UniqueOrbitsError> {
    params.validate()?;
    check_unique_ids(records)?;

    let mut parsed: Vec<(&ElementRecord, TwoLineElement)> = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match TwoLineElement::parse_checked(&record.line1, &record.line2, params.verify_checksum) {
            Ok(tle) => parsed.push((record, tle)),
            Err(error) => {
                warn!(index, id = %record.id, %error, "skipping malformed element set");
                skipped.push(SkippedRecord { index, error });
            }
        }
    }

    let elements: Vec<OrbitalElementSet> = parsed
        .iter()
        .map(|(_, tle)| OrbitalElementSet::from_tle(tle))
        .collect();
    let catalog = OrbitBatch::from_elements(&elements);
    let catalog_ids: Vec<CatalogId> = parsed.iter().map(|(r, _)| r.id.clone()).collect();

    let mut groups: BTreeMap<OrbitalRegime, Vec<usize>> = BTreeMap::new();
    let mut unclassified = Vec::new();
    for (row, (record, _)) in parsed.iter().enumerate() {
        match regimes.get(&record.id) {
            Some(regime) => groups.entry(*regime).or_default().push(row),
            None => unclassified.push(record.id.clone()),
        }
    }
    if !unclassified.is_empty() {
        warn!(
            count = unclassified.len(),
            "objects without an orbital regime are not ranked"
        );
    }

    let scorer = UniquenessScorer::from(params);
    let mut reports = BTreeMap::new();
    let mut summaries = Vec::with_capacity(groups.len());

    for (regime, members) in groups {
        let group = catalog.select(&members)?;
        let ids: Vec<CatalogId> = members.iter().map(|&row| catalog_ids[row].clone()).collect();

        let distances = self_distance_matrix(&group);
        let ranking = scorer.score(&distances)?;
        let neighbour_lists = match params.neighbour_scope {
            NeighbourScope::Regime => nearest_neighbours(&distances, &ids, params.top_k)?,
            NeighbourScope::Catalog => {
                let against_catalog = distance_matrix(&group, &catalog);
                neighbours_against(
                    &against_catalog,
                    &ids,
                    &catalog_ids,
                    |i| members[i],
                    params.top_k,
                )?
            }
        };

        debug!(
            %regime,
            members = members.len(),
            survivors = ranking.results.len(),
            rejected = ranking.rejected.len(),
            "regime ranked"
        );

        let mut scores = vec![None; members.len()];
        for result in &ranking.results {
            scores[result.index] = Some(result);
        }

        for (position, (&row, list)) in members.iter().zip(neighbour_lists).enumerate() {
            let is_rejected = ranking.rejected.binary_search(&position).is_ok();
            if is_rejected && params.rejected_policy == RejectedPolicy::Omit {
                continue;
            }
            let score = scores[position];
            let range = match score {
                Some(result) => result.range,
                None if is_rejected => UniquenessRange::None,
                None => UniquenessRange::Unknown,
            };
            let (record, tle) = &parsed[row];
            reports.insert(
                record.id.clone(),
                SatelliteReport {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    regime,
                    epoch: tle.epoch,
                    elements: elements[row],
                    raw_score: score.map(|r| r.raw_score),
                    uniqueness: score.map(|r| r.uniqueness),
                    rank: score.map(|r| r.rank),
                    range,
                    neighbours: list.neighbours,
                },
            );
        }

        summaries.push(RegimeSummary {
            regime,
            members: members.len(),
            survivors: ranking.results.len(),
            rejected: ranking.rejected.iter().map(|&i| ids[i].clone()).collect(),
            statistics: ranking.statistics,
            warnings: ranking.warnings,
        });
    }

    info!(
        records = records.len(),
        parsed = parsed.len(),
        skipped = skipped.len(),
        unclassified = unclassified.len(),
        reported = reports.len(),
        regimes = summaries.len(),
        "catalog ranked"
    );

    Ok(CatalogRanking {
        reports,
        regimes: summaries,
        skipped,
        unclassified,
    })
}
