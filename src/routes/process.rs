use crate::core::{CompatibilityScorer, SparkError};
use crate::models::{ErrorBody, HealthResponse, UploadedImage};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<CompatibilityScorer>,
}

/// Configure scoring routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/process")
            .route(web::post().to(process))
            // Any other verb on /process
            .route(web::route().to(method_not_allowed)),
    )
    .route("/health", web::get().to(health_check));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(ErrorBody {
        error: "Method Not Allowed".to_string(),
    })
}

/// Compatibility scoring endpoint
///
/// POST /process
///
/// Body: `multipart/form-data` with exactly two image parts, both under the
/// `file` field (or explicitly named `subject` and `candidate`).
///
/// Responds `200 {"score": <0-100>, "reason": "<string>"}` on success; error
/// mapping lives on `SparkError`.
async fn process(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, SparkError> {
    let images = collect_images(payload).await?;

    tracing::info!("Scoring request with {} image part(s)", images.len());

    let verdict = state.scorer.score(images).await?;

    Ok(HttpResponse::Ok().json(verdict))
}

/// Read every multipart file part into memory
///
/// Count validation happens in the pipeline, after parsing and before any
/// upload, so a bad part count never costs a storage call.
async fn collect_images(mut payload: Multipart) -> Result<Vec<UploadedImage>, SparkError> {
    let mut images = Vec::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| SparkError::Multipart(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| SparkError::Multipart(e.to_string()))?
        {
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(
            "Received part {} ({:?}, {} bytes)",
            field_name,
            file_name,
            bytes.len()
        );

        images.push(UploadedImage {
            field_name,
            file_name,
            bytes,
        });
    }

    Ok(images)
}
