pub mod core;
pub mod handler;
pub mod pipeline;
pub mod source;
pub mod stages;

pub use crate::core::*;
pub use crate::handler::{handle, Report};
pub use crate::pipeline::{run_pipeline, Pipeline};
