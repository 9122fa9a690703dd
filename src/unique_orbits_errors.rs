use thiserror::Error;

use crate::{constants::CatalogId, tle::ParseTleError};

#[derive(Error, Debug)]
pub enum UniqueOrbitsError {
    #[error("Unable to parse element set #{index}: {source}")]
    ParseError {
        index: usize,
        #[source]
        source: ParseTleError,
    },

    #[error("Element columns have mismatched lengths: {0:?}")]
    ColumnLengthMismatch(Vec<usize>),

    #[error("Selection index {index} out of bounds for a batch of {len} orbits")]
    SelectionOutOfBounds { index: usize, len: usize },

    #[error("Selection mask of length {mask} does not match a batch of {len} orbits")]
    MaskLengthMismatch { mask: usize, len: usize },

    #[error("Distance matrix must be square, got {rows}x{cols}")]
    NonSquareDistanceMatrix { rows: usize, cols: usize },

    #[error("Got {ids} identifiers for a distance matrix of {rows} rows")]
    IdentifierCountMismatch { ids: usize, rows: usize },

    #[error("Invalid ranking parameter: {0}")]
    InvalidRankingParameter(String),

    #[error("Degenerate orbital elements for {id}: {reason}")]
    DegenerateInput { id: String, reason: String },

    #[error("Invalid name filter pattern: {0}")]
    InvalidNamePattern(#[from] regex::Error),

    #[error("Unknown orbital regime label: {0}")]
    UnknownRegime(String),

    #[error("Duplicate catalog identifier in input: {0}")]
    DuplicateCatalogId(CatalogId),
}

impl PartialEq for UniqueOrbitsError {
    fn eq(&self, other: &Self) -> bool {
        use UniqueOrbitsError::*;
        match (self, other) {
            (
                ParseError {
                    index: a,
                    source: sa,
                },
                ParseError {
                    index: b,
                    source: sb,
                },
            ) => a == b && sa == sb,
            (ColumnLengthMismatch(a), ColumnLengthMismatch(b)) => a == b,
            (
                SelectionOutOfBounds { index: a, len: la },
                SelectionOutOfBounds { index: b, len: lb },
            ) => a == b && la == lb,
            (
                MaskLengthMismatch { mask: a, len: la },
                MaskLengthMismatch { mask: b, len: lb },
            ) => a == b && la == lb,
            (
                NonSquareDistanceMatrix { rows: ra, cols: ca },
                NonSquareDistanceMatrix { rows: rb, cols: cb },
            ) => ra == rb && ca == cb,
            (
                IdentifierCountMismatch { ids: a, rows: ra },
                IdentifierCountMismatch { ids: b, rows: rb },
            ) => a == b && ra == rb,
            (InvalidRankingParameter(a), InvalidRankingParameter(b)) => a == b,
            (
                DegenerateInput { id: a, reason: ra },
                DegenerateInput { id: b, reason: rb },
            ) => a == b && ra == rb,
            (UnknownRegime(a), UnknownRegime(b)) => a == b,
            (DuplicateCatalogId(a), DuplicateCatalogId(b)) => a == b,

            // regex errors are compared by variant only
            (InvalidNamePattern(_), InvalidNamePattern(_)) => true,

            _ => false,
        }
    }
}
