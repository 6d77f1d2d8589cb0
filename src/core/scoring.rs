use crate::config::StorageSettings;
use crate::core::error::SparkError;
use crate::core::pipeline::UploadPipeline;
use crate::models::{CompatibilityResult, UploadedImage};
use crate::services::{InferenceClient, ObjectStore};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// End-to-end orchestration of one compatibility request
///
/// Upload pipeline -> one inference call -> verdict validation, with the
/// stored objects removed once the inference call has finished. Both
/// collaborators are injected, so the scorer is testable with substitute
/// clients.
pub struct CompatibilityScorer {
    pipeline: UploadPipeline,
    inference: Arc<dyn InferenceClient>,
    cleanup_after_scoring: bool,
}

impl CompatibilityScorer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        inference: Arc<dyn InferenceClient>,
        settings: &StorageSettings,
    ) -> Self {
        Self {
            pipeline: UploadPipeline::new(
                store,
                Duration::from_secs(settings.signed_url_expiry_secs),
            ),
            inference,
            cleanup_after_scoring: settings.cleanup_after_scoring,
        }
    }

    /// Score one photo pair
    ///
    /// Entirely sequential: parse result in, upload subject, upload
    /// candidate, sign both, one completion call, validate. No step is
    /// retried; the first failure surfaces immediately. Cleanup runs on the
    /// inference-failure path too, so stored objects never outlive a request
    /// by more than their URL expiry.
    pub async fn score(
        &self,
        images: Vec<UploadedImage>,
    ) -> Result<CompatibilityResult, SparkError> {
        let pair = self.pipeline.upload_pair(images).await?;

        tracing::debug!(
            "Requesting verdict for pair {} (URLs expire in {}s)",
            pair.request_id,
            pair.subject.expires_in_secs
        );

        let reply = self
            .inference
            .score_pair(&pair.subject.signed_url, &pair.candidate.signed_url)
            .await;

        if self.cleanup_after_scoring {
            self.pipeline.cleanup(&pair).await;
        }

        let verdict = parse_verdict(&reply?)?;

        tracing::info!(
            "Scored pair {}: {} ({})",
            pair.request_id,
            verdict.score,
            verdict.reason
        );

        Ok(verdict)
    }
}

/// Parse and validate the model's reply text
///
/// The reply must be a JSON object with a `score` within 0-100 and a
/// non-empty `reason` string. The prompt shows the score inside quotes, so
/// models frequently return it as a numeric string; both forms are accepted.
pub fn parse_verdict(reply: &str) -> Result<CompatibilityResult, SparkError> {
    let value: Value = serde_json::from_str(reply)
        .map_err(|e| SparkError::InvalidModelOutput(format!("not valid JSON: {}", e)))?;

    let score = match value.get("score") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        SparkError::InvalidModelOutput("score is missing or not an integer".to_string())
    })?;

    if !(0..=100).contains(&score) {
        return Err(SparkError::InvalidModelOutput(format!(
            "score {} outside 0-100",
            score
        )));
    }

    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| {
            SparkError::InvalidModelOutput("reason is missing or empty".to_string())
        })?;

    Ok(CompatibilityResult {
        score,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verdict_integer_score() {
        let verdict = parse_verdict(r#"{"score": 82, "reason": "Similar style"}"#).unwrap();
        assert_eq!(verdict.score, 82);
        assert_eq!(verdict.reason, "Similar style");
    }

    #[test]
    fn test_parse_verdict_string_score() {
        // The prompt's example shows the score quoted, so models send both forms
        let verdict = parse_verdict(r#"{"score": "74", "reason": "Shared interests"}"#).unwrap();
        assert_eq!(verdict.score, 74);
    }

    #[test]
    fn test_parse_verdict_rejects_non_json() {
        let err = parse_verdict("I'd rate them a solid 80 out of 100!").unwrap_err();
        assert!(matches!(err, SparkError::InvalidModelOutput(_)));
    }

    #[test]
    fn test_parse_verdict_rejects_missing_score() {
        let err = parse_verdict(r#"{"reason": "no score here"}"#).unwrap_err();
        assert!(matches!(err, SparkError::InvalidModelOutput(_)));
    }

    #[test]
    fn test_parse_verdict_rejects_out_of_range_score() {
        let err = parse_verdict(r#"{"score": 140, "reason": "overeager"}"#).unwrap_err();
        assert!(matches!(err, SparkError::InvalidModelOutput(_)));

        let err = parse_verdict(r#"{"score": -5, "reason": "harsh"}"#).unwrap_err();
        assert!(matches!(err, SparkError::InvalidModelOutput(_)));
    }

    #[test]
    fn test_parse_verdict_rejects_empty_reason() {
        let err = parse_verdict(r#"{"score": 50, "reason": "  "}"#).unwrap_err();
        assert!(matches!(err, SparkError::InvalidModelOutput(_)));
    }
}
