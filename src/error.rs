use thiserror::Error;

use crate::data::EntityKind;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("missing or invalid field `{field}`")]
    Validation { field: &'static str },

    #[error("{message}")]
    Format { message: String },

    #[error("no {kind} at index {index} (collection has {len})")]
    Index {
        kind: EntityKind,
        index: usize,
        len: usize,
    },

    #[error("no time slot ids left to allocate")]
    SlotIdsExhausted,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("solve request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The solver answered with a non-success status; `body` is its text verbatim.
    #[error("{body}")]
    Server { status: u16, body: String },

    #[error("a solve request is already in flight")]
    SubmissionInFlight,
}

impl PlannerError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        PlannerError::Format {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
