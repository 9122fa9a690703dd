//! # unique_orbits
//!
//! Orbital uniqueness ranking of a satellite catalog from two-line element sets.
//!
//! Each object's TLE is reduced to its classical orbital elements; every pair of
//! objects is compared with a closed-form distance between their orbital planes,
//! shapes and perigee directions; and, within each orbital regime, objects are
//! ranked by how far their nearest neighbours are.
//!
//! ## Modules
//!
//! * [`tle`] – two-line element parsing, catalog splitting and name filtering.
//! * [`orbit_type`] – per-object orbital elements derived from a TLE.
//! * [`orbit_batch`] – column-oriented batches of elements, with sub-selection.
//! * [`distance`] – the orbit distance kernel, single pair and bulk matrices.
//! * [`uniqueness`] – k-nearest-neighbour scoring, outlier rejection, ranks and labels.
//! * [`neighbours`] – per-object nearest-neighbour lists.
//! * [`regime`] – orbital regimes and their catalog labels.
//! * [`ranking_params`] – tunable parameters of the ranking.
//! * [`catalog_ranking`] – the end-to-end pipeline producing per-object reports.
//!
//! ## Example
//!
//! ```rust,no_run
//! use unique_orbits::{
//!     catalog_ranking::rank_catalog,
//!     ranking_params::RankingParams,
//!     regime::regimes_from_operational_orbits,
//!     tle::catalog::{parse_three_line_catalog, NameFilter},
//! };
//!
//! let text = std::fs::read_to_string("elset_current.txt").unwrap();
//! let parsed = parse_three_line_catalog(&text);
//! let (records, _placeholders) = NameFilter::default().partition(parsed.records);
//!
//! let regimes = regimes_from_operational_orbits(
//!     records.iter().map(|r| (r.id.clone(), "LEO")),
//! );
//! let ranking = rank_catalog(&records, &regimes, &RankingParams::default()).unwrap();
//! for report in ranking.reports.values() {
//!     println!("{} {:?} {:?}", report.id, report.rank, report.range);
//! }
//! ```
//!
//! ## Features
//!
//! * `parallel` (default) – fill distance matrices with `rayon`. Results are
//!   bit-for-bit identical with and without it.
pub mod catalog_ranking;
pub mod constants;
pub mod distance;
pub mod neighbours;
pub mod orbit_batch;
pub mod orbit_type;
pub mod ranking_params;
pub mod regime;
pub mod tle;
pub mod unique_orbits_errors;
pub mod uniqueness;
