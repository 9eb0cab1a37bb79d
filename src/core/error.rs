use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The fixed sequence of fallible steps a pipeline run goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Load,
    Validate,
    Process,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Validate => "validate",
            Stage::Process => "process",
        };
        f.write_str(name)
    }
}

/// Every way a pipeline run can fail. One variant per stage family; a run
/// produces at most one of these and it is never wrapped or chained.
///
/// Downstream crates must carry a fallback arm when matching on this enum,
/// so a new variant degrades to a logged "unexpected" path instead of a
/// compile break in their code. Inside this crate matches stay exhaustive.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
#[non_exhaustive]
pub enum PipelineError {
    #[error("Configuration Read Error: Could not open file '{source_identifier}'")]
    ConfigRead { source_identifier: String },

    #[error(
        "Configuration Parse Error: Malformed content at line {line_number} (Context: '{offending_content}')"
    )]
    ConfigParse {
        offending_content: String,
        line_number: u32,
    },

    #[error("Data Validation Error: Field '{field_name}' has invalid value '{invalid_value}'")]
    Validation {
        field_name: String,
        invalid_value: String,
    },

    #[error("Data Processing Error: Task '{task_name}' failed. Details: {details}")]
    Processing { task_name: String, details: String },
}

impl PipelineError {
    /// Variant tag, identical to the `kind` field of the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::ConfigRead { .. } => "ConfigRead",
            PipelineError::ConfigParse { .. } => "ConfigParse",
            PipelineError::Validation { .. } => "Validation",
            PipelineError::Processing { .. } => "Processing",
        }
    }

    /// The stage that raises this kind of error.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::ConfigRead { .. } | PipelineError::ConfigParse { .. } => Stage::Load,
            PipelineError::Validation { .. } => Stage::Validate,
            PipelineError::Processing { .. } => Stage::Process,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
