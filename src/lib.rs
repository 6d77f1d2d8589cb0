//! Lume Spark - Photo compatibility scoring service for Lume dating app
//!
//! This library implements the upload-and-inference pipeline behind the
//! "photo spark" feature: two uploaded photos are stored in object storage,
//! signed URLs for both are sent to a multimodal model, and the model's
//! `{score, reason}` verdict is validated and returned.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{CompatibilityScorer, SparkError, UploadPipeline};
pub use crate::models::{CompatibilityResult, StoredObjectRef, UploadedImage};
