// Service exports
pub mod inference;
pub mod storage;

pub use inference::{InferenceClient, InferenceError, OpenAiClient};
pub use storage::{ObjectStore, S3Store, StorageError};
