use serde::Serialize;
use thiserror::Error;

use crate::race::types::Bib;

/// Errors that abort a scoring request.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// Time text that is not `MM:SS.mmm` or `HH:MM:SS.mmm`
    #[error("invalid time '{input}': {reason}")]
    Format { input: String, reason: String },

    /// Invalid award depth or unrecognized race type
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl EngineError {
    pub(crate) fn format(input: &str, reason: impl Into<String>) -> Self {
        EngineError::Format {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal data problems. The affected record is left out of the relevant
/// aggregation and the warning is carried in the report diagnostics.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIntegrityWarning {
    #[error("bib {bib} is assigned to more than one runner; keeping the first")]
    DuplicateRunner { bib: Bib },

    #[error("result for bib {bib} has no matching runner")]
    OrphanResult { bib: Bib },

    #[error("bib {bib} has more than one result; keeping the first recorded")]
    DuplicateResult { bib: Bib },

    #[error("result for bib {bib} has an invalid finish time ({finish_time})")]
    InvalidFinishTime { bib: Bib, finish_time: f64 },

    #[error("bib {bib} has no team and is left out of team scoring")]
    MissingTeam { bib: Bib },

    #[error("bib {bib} has no date of birth or age and is left out of age groups")]
    MissingAge { bib: Bib },

    #[error("bib {bib} has age {age}, which falls in no age group")]
    UnbracketedAge { bib: Bib, age: i32 },
}
