use crate::core::error::SparkError;
use crate::models::{StoredObjectRef, UploadedImage};
use crate::services::ObjectStore;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Result of uploading one photo pair
///
/// Keys are unique per request (`pairs/{request_id}/...`), so concurrent
/// requests never overwrite each other's objects.
#[derive(Debug, Clone)]
pub struct UploadedPair {
    pub request_id: Uuid,
    pub subject: StoredObjectRef,
    pub candidate: StoredObjectRef,
}

/// Upload pipeline: exactly two images in, two signed URLs out
///
/// # Pipeline stages
/// 1. Part-count validation (fails before any network call)
/// 2. Subject/candidate ordering
/// 3. Put-object per image
/// 4. Signed GET URL per key
pub struct UploadPipeline {
    store: Arc<dyn ObjectStore>,
    signed_url_expiry: Duration,
}

impl UploadPipeline {
    pub fn new(store: Arc<dyn ObjectStore>, signed_url_expiry: Duration) -> Self {
        Self {
            store,
            signed_url_expiry,
        }
    }

    /// Upload both images and issue a signed URL for each
    ///
    /// Uploads are sequential with no retry; the first storage failure
    /// surfaces immediately. Nothing is uploaded unless the part count is
    /// exactly two.
    pub async fn upload_pair(
        &self,
        images: Vec<UploadedImage>,
    ) -> Result<UploadedPair, SparkError> {
        let (subject, candidate) = order_pair(images)?;

        let request_id = Uuid::new_v4();
        tracing::debug!("Uploading photo pair for request {}", request_id);

        let subject_ref = self
            .upload_one(format!("pairs/{}/subject", request_id), subject)
            .await?;
        let candidate_ref = self
            .upload_one(format!("pairs/{}/candidate", request_id), candidate)
            .await?;

        Ok(UploadedPair {
            request_id,
            subject: subject_ref,
            candidate: candidate_ref,
        })
    }

    async fn upload_one(
        &self,
        key: String,
        image: UploadedImage,
    ) -> Result<StoredObjectRef, SparkError> {
        self.store.put_object(&key, image.bytes).await?;
        let signed_url = self.store.signed_get_url(&key, self.signed_url_expiry).await?;

        Ok(StoredObjectRef {
            key,
            signed_url,
            expires_in_secs: self.signed_url_expiry.as_secs(),
        })
    }

    /// Best-effort removal of both stored objects
    ///
    /// Deletion failures are logged, never surfaced: the objects expire with
    /// their signed URLs anyway.
    pub async fn cleanup(&self, pair: &UploadedPair) {
        for key in [&pair.subject.key, &pair.candidate.key] {
            if let Err(e) = self.store.delete_object(key).await {
                tracing::warn!("Cleanup failed for request {}: {}", pair.request_id, e);
            }
        }
    }
}

/// Decide which image is the subject and which the candidate
///
/// Parts explicitly named `subject` and `candidate` are honored regardless of
/// arrival order. Otherwise the two parts (the UI posts both under `file`)
/// map to subject and candidate in arrival order.
fn order_pair(
    images: Vec<UploadedImage>,
) -> Result<(UploadedImage, UploadedImage), SparkError> {
    if images.len() != 2 {
        return Err(SparkError::MissingImages(images.len()));
    }

    let mut images = images;
    let named_explicitly = images.iter().any(|i| i.field_name == "subject")
        && images.iter().any(|i| i.field_name == "candidate");

    if named_explicitly && images[0].field_name != "subject" {
        images.swap(0, 1);
    }

    let mut iter = images.into_iter();
    let subject = iter.next().expect("validated length");
    let candidate = iter.next().expect("validated length");
    Ok((subject, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(field_name: &str, bytes: &[u8]) -> UploadedImage {
        UploadedImage {
            field_name: field_name.to_string(),
            file_name: Some(format!("{}.jpg", field_name)),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_order_pair_requires_exactly_two() {
        assert!(matches!(
            order_pair(vec![]),
            Err(SparkError::MissingImages(0))
        ));
        assert!(matches!(
            order_pair(vec![image("file", b"a")]),
            Err(SparkError::MissingImages(1))
        ));
        assert!(matches!(
            order_pair(vec![image("file", b"a"), image("file", b"b"), image("file", b"c")]),
            Err(SparkError::MissingImages(3))
        ));
    }

    #[test]
    fn test_order_pair_arrival_order_for_generic_fields() {
        let (subject, candidate) =
            order_pair(vec![image("file", b"first"), image("file", b"second")]).unwrap();
        assert_eq!(subject.bytes, b"first");
        assert_eq!(candidate.bytes, b"second");
    }

    #[test]
    fn test_order_pair_honors_explicit_names() {
        let (subject, candidate) =
            order_pair(vec![image("candidate", b"them"), image("subject", b"me")]).unwrap();
        assert_eq!(subject.bytes, b"me");
        assert_eq!(candidate.bytes, b"them");
    }
}
