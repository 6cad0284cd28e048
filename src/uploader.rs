//! Validates a local JSON file and stores its exact bytes on a publisher.

use crate::models::{interpret_response, PublisherReply, UploadOutcome, UploadRequest};
use crate::publisher::PublisherService;
use crate::{Error, Result};
use serde::de::IgnoredAny;
use std::path::Path;
use tracing::{debug, error, info};

pub struct Uploader {
    publisher: Box<dyn PublisherService>,
}

impl Uploader {
    pub fn new(publisher: Box<dyn PublisherService>) -> Self {
        Self { publisher }
    }

    /// Performs one upload attempt. Nothing is retried.
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadOutcome> {
        Ok(self.upload_with_response(request).await?.outcome)
    }

    /// Like [`Uploader::upload`], but also hands back the publisher's raw JSON.
    pub async fn upload_with_response(&self, request: &UploadRequest) -> Result<PublisherReply> {
        let path = request.file_path.as_path();

        let contents = read_validated_json(path).await.map_err(|e| {
            error!("Rejected {} before upload: {}", path.display(), e);
            e
        })?;

        info!(
            "Uploading {} ({} bytes) to {} for {} epoch(s)",
            path.display(),
            contents.len(),
            request.publisher_url,
            request.epochs
        );

        let response = self
            .publisher
            .put_blob(&request.publisher_url, request.epochs, contents)
            .await?;

        let outcome = interpret_response(&response).map_err(|e| {
            error!("Publisher reply not understood: {}", e);
            e
        })?;

        match &outcome {
            UploadOutcome::NewlyCreated { blob_id, object_id } => {
                info!("Stored new blob {} (object {})", blob_id, object_id)
            }
            UploadOutcome::AlreadyCertified { blob_id } => {
                info!("Blob {} was already certified", blob_id)
            }
        }

        Ok(PublisherReply { outcome, response })
    }
}

/// Reads `path` and checks it holds UTF-8 JSON, returning the untouched bytes.
async fn read_validated_json(path: &Path) -> Result<Vec<u8>> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|source| Error::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

    let text = std::str::from_utf8(&contents).map_err(|e| Error::InvalidJson {
        path: path.to_path_buf(),
        reason: format!("not UTF-8 text: {}", e),
    })?;
    serde_json::from_str::<IgnoredAny>(text).map_err(|e| Error::InvalidJson {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!("Validated {} as JSON", path.display());
    Ok(contents)
}
