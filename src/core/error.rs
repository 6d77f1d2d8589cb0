use crate::models::{ErrorBody, MessageBody};
use crate::services::{InferenceError, StorageError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Everything that can go wrong while scoring one photo pair
///
/// No failure mode is retried; each maps to exactly one response at the
/// route layer:
/// - wrong part count / unreadable body -> `400 {"message": "Missing image files"}`
/// - model said nothing -> `500 {"message": "Error processing request"}`
/// - everything else -> `500 {"error": "Server error processing request"}`
#[derive(Debug, Error)]
pub enum SparkError {
    #[error("expected exactly two image files, got {0}")]
    MissingImages(usize),

    #[error("failed to read multipart body: {0}")]
    Multipart(String),

    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("inference call failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("model returned invalid output: {0}")]
    InvalidModelOutput(String),
}

impl ResponseError for SparkError {
    fn status_code(&self) -> StatusCode {
        match self {
            SparkError::MissingImages(_) | SparkError::Multipart(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("Request failed: {}", self);

        match self {
            SparkError::MissingImages(_) | SparkError::Multipart(_) => {
                HttpResponse::BadRequest().json(MessageBody {
                    message: "Missing image files".to_string(),
                })
            }
            SparkError::Inference(InferenceError::EmptyResponse) => {
                HttpResponse::InternalServerError().json(MessageBody {
                    message: "Error processing request".to_string(),
                })
            }
            _ => HttpResponse::InternalServerError().json(ErrorBody {
                error: "Server error processing request".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_images_maps_to_400() {
        let err = SparkError::MissingImages(1);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_model_reply_maps_to_500() {
        let err = SparkError::Inference(InferenceError::EmptyResponse);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_output_maps_to_500() {
        let err = SparkError::InvalidModelOutput("score out of range".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
