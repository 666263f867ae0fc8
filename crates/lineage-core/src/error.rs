use crate::PersonId;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for enum conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnumConversionError {
    #[error("Invalid gender value: {0:?}")]
    InvalidGender(String),
    #[error("Invalid member type value: {0:?}")]
    InvalidMemberType(String),
}

/// Failures while obtaining a family snapshot from the storage side.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read family data from {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed family data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a new member cannot be placed in the family.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("a founder (generation 1) cannot have a parent")]
    FounderWithParent,
    #[error("members below generation 1 need a parent or a spouse")]
    Unattached,
    #[error("generation {requested} conflicts with the computed generation {computed}")]
    GenerationMismatch { requested: u32, computed: u32 },
    #[error("no generation exists below parent generation {parent}")]
    GenerationOverflow { parent: u32 },
    #[error("parent {0} is not in the family")]
    UnknownParent(PersonId),
    #[error("spouse {0} is not in the family")]
    UnknownSpouse(PersonId),
}
