use thiserror::Error;

use crate::records::ParseLineError;

#[derive(Error, Debug)]
pub enum GroundTruthError {
    #[error("Ground truth source file not found: {0}")]
    NotFound(String),

    #[error("Error while parsing {path} at line {line}: {reason}")]
    ParseError {
        path: String,
        line: usize,
        reason: ParseLineError,
    },

    #[error("Ground truth source is empty: {0}")]
    EmptySource(String),

    #[error("Invalid numeric field in record {index}: {value}")]
    InvalidNumber { index: usize, value: String },

    #[error("Association cache {path} is corrupted: {reason}")]
    CacheCorrupted { path: String, reason: String },

    #[error("Frame index out of range: {0}")]
    OutOfRange(usize),

    #[error("No association for primary index: {0}")]
    AssociationGap(usize),

    #[error("Invalid ground truth setting: {0}")]
    InvalidSetting(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PartialEq for GroundTruthError {
    fn eq(&self, other: &Self) -> bool {
        use GroundTruthError::*;
        match (self, other) {
            (NotFound(a), NotFound(b)) => a == b,
            (EmptySource(a), EmptySource(b)) => a == b,
            (
                ParseError {
                    path: pa,
                    line: la,
                    reason: ra,
                },
                ParseError {
                    path: pb,
                    line: lb,
                    reason: rb,
                },
            ) => pa == pb && la == lb && ra == rb,
            (
                InvalidNumber {
                    index: ia,
                    value: va,
                },
                InvalidNumber {
                    index: ib,
                    value: vb,
                },
            ) => ia == ib && va == vb,
            (CacheCorrupted { path: pa, .. }, CacheCorrupted { path: pb, .. }) => pa == pb,
            (OutOfRange(a), OutOfRange(b)) => a == b,
            (AssociationGap(a), AssociationGap(b)) => a == b,
            (InvalidSetting(a), InvalidSetting(b)) => a == b,

            // not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (Json(_), Json(_)) => true,
            (Csv(_), Csv(_)) => true,

            _ => false,
        }
    }
}
