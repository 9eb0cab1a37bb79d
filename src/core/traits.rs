use crate::core::{Config, FinalResult, Result, ValidatedData};

/// Storage collaborator that resolves an identifier into raw content.
///
/// Implementations must release anything they open before returning, on
/// the error path as well as the success path.
pub trait Source: Send + Sync {
    fn read(&self, identifier: &str) -> std::io::Result<String>;
}

/// First stage: identifier in, [`Config`] out.
pub trait Loader: Send + Sync {
    fn load(&self, identifier: &str) -> Result<Config>;
}

/// Second stage: applies the domain rule to loaded content.
pub trait Validator: Send + Sync {
    fn validate(&self, config: Config) -> Result<ValidatedData>;
}

/// Final stage: turns validated content into a result code.
pub trait Processor: Send + Sync {
    fn process(&self, data: ValidatedData) -> Result<FinalResult>;
}
