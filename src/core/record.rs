use serde::{Deserialize, Serialize};

/// Prefix the validate stage puts in front of accepted content.
pub const VALIDATED_PREFIX: &str = "Validated: ";

/// Raw content produced by the load stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub data: String,
}

impl Config {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Content that passed the domain rules, tagged with [`VALIDATED_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedData {
    pub processed_data: String,
}

impl ValidatedData {
    pub fn from_config(config: Config) -> Self {
        let mut processed_data = String::with_capacity(VALIDATED_PREFIX.len() + config.data.len());
        processed_data.push_str(VALIDATED_PREFIX);
        processed_data.push_str(&config.data);
        Self { processed_data }
    }

    /// The validated content without its prefix.
    pub fn body(&self) -> &str {
        self.processed_data
            .strip_prefix(VALIDATED_PREFIX)
            .unwrap_or(&self.processed_data)
    }
}

/// Terminal value of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    pub result_code: i64,
}
