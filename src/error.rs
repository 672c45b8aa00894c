//! Error and warning types

use crate::graph::OpinionId;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("no opinion clusters in the input")]
    EmptyDataset,

    #[error("opinion {0} appears more than once")]
    DuplicateOpinion(OpinionId),

    #[error("opinion {id} has an unparsable date_filed {value:?}")]
    InvalidDate { id: OpinionId, value: String },

    #[error("degree limit must be at least 1, got {0}")]
    InvalidDegreeLimit(usize),

    #[error("opinion {0} is not in the working set")]
    UnknownOpinion(OpinionId),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;

/// Conditions worth reporting that do not stop a map from being drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphWarning {
    /// Opinions that cite each other in a loop, oldest member first
    CitationCycle { members: Vec<OpinionId> },
}
