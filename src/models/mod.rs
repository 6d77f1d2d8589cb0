// Model exports
pub mod domain;
pub mod responses;

pub use domain::{CompatibilityResult, StoredObjectRef, UploadedImage};
pub use responses::{ErrorBody, HealthResponse, MessageBody};
