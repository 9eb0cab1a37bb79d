//! Boundary that turns a finished run into something a user can read.
//!
//! The match in [`handle`] has one arm per [`PipelineError`] variant and no
//! wildcard: adding a variant breaks the build here until it is handled.

use crate::core::{FinalResult, PipelineError, Result, Stage};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Rendered outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Report {
    Succeeded { result_code: i64 },
    Failed { stage: Stage, error: PipelineError },
}

impl Report {
    /// Process exit status: 0 on success, then one code per error kind in
    /// stage order.
    pub fn exit_code(&self) -> i32 {
        match self {
            Report::Succeeded { .. } => 0,
            Report::Failed { error, .. } => match error {
                PipelineError::ConfigRead { .. } => 1,
                PipelineError::ConfigParse { .. } => 2,
                PipelineError::Validation { .. } => 3,
                PipelineError::Processing { .. } => 4,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Report::Succeeded { .. })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Succeeded { result_code } => {
                write!(f, "Pipeline Succeeded! Final Result Code: {}", result_code)
            }
            Report::Failed { error, .. } => write!(f, "Pipeline Failed! Error details: {}", error),
        }
    }
}

/// Logs the outcome of a run and returns its rendering. The result is only
/// read.
pub fn handle(result: &Result<FinalResult>) -> Report {
    let error = match result {
        Ok(FinalResult { result_code }) => {
            info!(result_code, "pipeline succeeded");
            return Report::Succeeded {
                result_code: *result_code,
            };
        }
        Err(error) => error,
    };

    match error {
        PipelineError::ConfigRead { source_identifier } => {
            info!(%source_identifier, "could not open config source");
        }
        PipelineError::ConfigParse {
            offending_content,
            line_number,
        } => {
            info!(%offending_content, line_number, "malformed config content");
        }
        PipelineError::Validation {
            field_name,
            invalid_value,
        } => {
            info!(%field_name, %invalid_value, "config failed validation");
        }
        PipelineError::Processing { task_name, details } => {
            info!(%task_name, %details, "processing task failed");
        }
    }

    Report::Failed {
        stage: error.stage(),
        error: error.clone(),
    }
}
