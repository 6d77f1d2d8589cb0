use serde::{Deserialize, Serialize};

/// One image part extracted from a multipart request
///
/// Created by form parsing, consumed exactly once by the upload pipeline and
/// discarded afterwards. The bytes are held in memory for the duration of the
/// request only.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Multipart field name the part arrived under (`file`, `subject`, `candidate`)
    pub field_name: String,
    /// Original file name from the content disposition, if the client sent one
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A stored object plus the time-limited signed URL that points at it
///
/// Created per upload, never updated, never persisted beyond the request. The
/// URL expires naturally on the storage side.
#[derive(Debug, Clone)]
pub struct StoredObjectRef {
    pub key: String,
    pub signed_url: String,
    pub expires_in_secs: u64,
}

/// Validated compatibility verdict returned by the model
///
/// `score` is guaranteed to be within 0-100 and `reason` non-empty; replies
/// that fail those checks never become a `CompatibilityResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub score: i64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility_result_serializes_flat() {
        let result = CompatibilityResult {
            score: 82,
            reason: "Similar style".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"score": 82, "reason": "Similar style"}));
    }

    #[test]
    fn test_uploaded_image_empty_check() {
        let image = UploadedImage {
            field_name: "file".to_string(),
            file_name: None,
            bytes: vec![],
        };
        assert!(image.is_empty());
    }
}
