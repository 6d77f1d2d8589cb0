// Core exports
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod scoring;

pub use error::SparkError;
pub use pipeline::{UploadPipeline, UploadedPair};
pub use scoring::CompatibilityScorer;
