//! The three fixed pipeline stages.
//!
//! Each stage takes ownership of the previous stage's value and either hands
//! a new value to the next stage or fails with the error kind it owns. None
//! of them panics on bad input.

use crate::core::{
    Config, FinalResult, Loader, PipelineError, Processor, Result, Rules, Source, ValidatedData,
    Validator,
};
use std::io;
use tracing::debug;

/// Line reported for structural problems found by the load stage.
const PARSE_ERROR_LINE: u32 = 1;

/// Excerpt reported when the source was read but is not valid UTF-8.
const UNDECODABLE_EXCERPT: &str = "<invalid utf-8>";

pub fn load_config(source: &dyn Source, identifier: &str, rules: &Rules) -> Result<Config> {
    let content = source.read(identifier).map_err(|e| {
        if e.kind() == io::ErrorKind::InvalidData {
            debug!(identifier, error = %e, "config content could not be decoded");
            return PipelineError::ConfigParse {
                offending_content: UNDECODABLE_EXCERPT.to_string(),
                line_number: PARSE_ERROR_LINE,
            };
        }
        debug!(identifier, error = %e, "failed to open config source");
        PipelineError::ConfigRead {
            source_identifier: identifier.to_string(),
        }
    })?;

    if let Some(excerpt) = rules.parse_violation(&content) {
        debug!(identifier, excerpt = %excerpt, "config content is malformed");
        return Err(PipelineError::ConfigParse {
            offending_content: excerpt,
            line_number: PARSE_ERROR_LINE,
        });
    }

    debug!(identifier, bytes = content.len(), "config loaded");
    Ok(Config::new(content))
}

pub fn validate_data(config: Config, rules: &Rules) -> Result<ValidatedData> {
    if let Some((field_name, invalid_value)) = rules.validation_violation(&config.data) {
        debug!(field = %field_name, "validation rejected config");
        return Err(PipelineError::Validation {
            field_name,
            invalid_value,
        });
    }

    debug!("data validated");
    Ok(ValidatedData::from_config(config))
}

pub fn process_data(data: ValidatedData, rules: &Rules) -> Result<FinalResult> {
    let body_len = data.body().len();
    if body_len < rules.min_length {
        debug!(body_len, min_length = rules.min_length, "data too short to process");
        return Err(PipelineError::Processing {
            task_name: rules.task_name.clone(),
            details: format!(
                "Input data too short for task ({} < {})",
                body_len, rules.min_length
            ),
        });
    }

    let result_code = data.processed_data.len() as i64;
    debug!(result_code, "data processed");
    Ok(FinalResult { result_code })
}

/// [`Loader`] backed by a [`Source`].
pub struct ConfigLoader<S> {
    source: S,
    rules: Rules,
}

impl<S: Source> ConfigLoader<S> {
    pub fn new(source: S, rules: Rules) -> Self {
        Self { source, rules }
    }
}

impl<S: Source> Loader for ConfigLoader<S> {
    fn load(&self, identifier: &str) -> Result<Config> {
        load_config(&self.source, identifier, &self.rules)
    }
}

pub struct MarkerValidator {
    rules: Rules,
}

impl MarkerValidator {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }
}

impl Validator for MarkerValidator {
    fn validate(&self, config: Config) -> Result<ValidatedData> {
        validate_data(config, &self.rules)
    }
}

pub struct LengthProcessor {
    rules: Rules,
}

impl LengthProcessor {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }
}

impl Processor for LengthProcessor {
    fn process(&self, data: ValidatedData) -> Result<FinalResult> {
        process_data(data, &self.rules)
    }
}
