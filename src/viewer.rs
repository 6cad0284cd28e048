//! Aggregator links for viewing a stored blob.

use crate::models::UploadOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerLinks {
    pub blob_url: String,
    /// Only known for blobs created by this upload.
    pub object_url: Option<String>,
}

impl ViewerLinks {
    pub fn for_outcome(outcome: &UploadOutcome, aggregator_url: &str) -> Self {
        let blobs = format!("{}/v1/blobs", aggregator_url.trim_end_matches('/'));

        Self {
            blob_url: format!("{}/{}", blobs, outcome.blob_id()),
            object_url: outcome
                .object_id()
                .map(|object_id| format!("{}/by-object-id/{}", blobs, object_id)),
        }
    }
}
