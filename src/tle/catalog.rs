//! # Element catalog ingestion
//!
//! Glue between raw catalog exports and the core: splits "three-line" element text
//! (name line, line 1, line 2) into [`ElementRecord`]s and provides the
//! [`NameFilter`] predicate that drops placeholder objects before they ever reach
//! the orbit batch.
//!
//! The catalog text is typically the content of an element-set export:
//!
//! ```text
//! 0 ISS (ZARYA)
//! 1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
//! 2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
//! ```
//!
//! The `0 ` prefix of the name line is optional, and bare two-line records (no name
//! line) are accepted with an empty name. The identifier of every record is
//! derived from columns 3–7 of line 1 (see [`CatalogId::new`]).

use regex::RegexSet;
use serde::Serialize;
use tracing::debug;

use crate::{constants::CatalogId, unique_orbits_errors::UniqueOrbitsError};

/// Name used by catalogs for objects awaiting an official designation.
pub const PLACEHOLDER_NAME_PATTERN: &str = "TBA - TO BE ASSIGNED";

/// One tracked object as handed over by the element-set acquisition step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementRecord {
    pub id: CatalogId,
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl ElementRecord {
    /// Build a record, deriving the identifier from line 1.
    pub fn new(name: impl Into<String>, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        let line1 = line1.into();
        let id = CatalogId::new(line1.get(2..7).unwrap_or_default());
        ElementRecord {
            id,
            name: name.into(),
            line1,
            line2: line2.into(),
        }
    }
}

/// Records extracted from a catalog text, plus the 1-based line numbers that
/// could not be attached to any record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCatalog {
    pub records: Vec<ElementRecord>,
    pub unrecognized_lines: Vec<usize>,
}

/// Split a three-line (or two-line) element catalog into [`ElementRecord`]s.
///
/// Only the line structure is checked here; element fields are parsed later,
/// record by record, by the orbit batch.
pub fn parse_three_line_catalog(text: &str) -> ParsedCatalog {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(n, l)| (n + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let is_line = |l: &str, digit: char| l.starts_with(digit) && l.chars().nth(1) == Some(' ');

    let mut catalog = ParsedCatalog::default();
    let mut i = 0;
    while i < lines.len() {
        let (number, line) = lines[i];
        if is_line(line, '1') && i + 1 < lines.len() && is_line(lines[i + 1].1, '2') {
            catalog
                .records
                .push(ElementRecord::new("", line, lines[i + 1].1));
            i += 2;
        } else if i + 2 < lines.len() && is_line(lines[i + 1].1, '1') && is_line(lines[i + 2].1, '2')
        {
            let name = line.strip_prefix("0 ").unwrap_or(line).trim();
            catalog
                .records
                .push(ElementRecord::new(name, lines[i + 1].1, lines[i + 2].1));
            i += 3;
        } else {
            catalog.unrecognized_lines.push(number);
            i += 1;
        }
    }

    debug!(
        records = catalog.records.len(),
        unrecognized = catalog.unrecognized_lines.len(),
        "split element catalog"
    );
    catalog
}

/// Ingestion predicate dropping objects whose name matches a placeholder pattern.
///
/// Patterns are regular expressions matched anywhere in the name.
#[derive(Debug, Clone)]
pub struct NameFilter {
    patterns: RegexSet,
}

impl NameFilter {
    /// Build a filter from a list of regular expressions.
    ///
    /// Errors
    /// ------
    /// Returns [`UniqueOrbitsError::InvalidNamePattern`] if a pattern does not compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, UniqueOrbitsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(NameFilter {
            patterns: RegexSet::new(patterns)?,
        })
    }

    /// True if the name matches one of the placeholder patterns.
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.patterns.is_match(name)
    }

    /// Split records into `(kept, dropped)` while preserving input order.
    pub fn partition(
        &self,
        records: impl IntoIterator<Item = ElementRecord>,
    ) -> (Vec<ElementRecord>, Vec<ElementRecord>) {
        records
            .into_iter()
            .partition(|record| !self.is_placeholder(&record.name))
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        NameFilter {
            patterns: RegexSet::new([regex::escape(PLACEHOLDER_NAME_PATTERN)])
                .unwrap_or_else(|_| RegexSet::empty()),
        }
    }
}
