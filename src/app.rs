//! Application orchestration for the command-line uploader.

use crate::models::{Config, PublisherReply, UploadOutcome, UploadRequest};
use crate::publisher::{PublisherClient, PublisherService};
use crate::uploader::Uploader;
use crate::viewer::ViewerLinks;
use crate::Result;
use std::fs;
use std::path::Path;
use tracing::info;

/// Coordinates sample-file creation, the upload, and the final report.
pub struct App {
    uploader: Uploader,
    config: Config,
}

impl App {
    /// Build an app around an injected publisher, e.g. a mock in tests.
    pub fn with_services(publisher: Box<dyn PublisherService>, config: Config) -> Self {
        Self {
            uploader: Uploader::new(publisher),
            config,
        }
    }

    /// Construct an app talking to the configured publisher over HTTP.
    pub fn new(config: Config) -> Result<Self> {
        info!(
            "Publisher: {} (timeout {:?})",
            config.publisher_url, config.timeout
        );
        let publisher = PublisherClient::new(config.timeout)?;
        Ok(Self::with_services(Box::new(publisher), config))
    }

    /// Upload `file_path` and return the human-readable report.
    pub async fn run(&self, file_path: &Path, create_sample: bool) -> Result<String> {
        if create_sample && write_sample_file(file_path)? {
            info!("Created a sample JSON file: {}", file_path.display());
        }

        let request = UploadRequest::new(file_path, self.config.publisher_url.clone())
            .with_epochs(self.config.epochs);
        let reply = self.uploader.upload_with_response(&request).await?;

        Ok(render_report(&reply, &self.config.aggregator_url))
    }
}

/// Writes a small JSON document to `path` unless something is already there.
///
/// Returns `true` when a file was created.
pub fn write_sample_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    let sample = serde_json::json!({ "name": "My Walrus Data", "version": 1 });
    let contents = serde_json::to_string_pretty(&sample).map_err(std::io::Error::from)?;
    fs::write(path, contents)?;
    Ok(true)
}

pub fn render_report(reply: &PublisherReply, aggregator_url: &str) -> String {
    let pretty = serde_json::to_string_pretty(&reply.response)
        .unwrap_or_else(|_| reply.response.to_string());
    let links = ViewerLinks::for_outcome(&reply.outcome, aggregator_url);

    let mut report = format!(
        "Upload successful!\nResponse from Walrus publisher:\n{}\n\n",
        pretty
    );
    match &reply.outcome {
        UploadOutcome::NewlyCreated { blob_id, object_id } => {
            report.push_str(&format!(
                "Blob ID: {}\nObject ID: {}\n\nView the uploaded file through the aggregator:\n{}\n",
                blob_id, object_id, links.blob_url
            ));
            if let Some(object_url) = &links.object_url {
                report.push_str(&format!("Or by its object ID:\n{}\n", object_url));
            }
        }
        UploadOutcome::AlreadyCertified { blob_id } => {
            report.push_str(&format!(
                "This blob was already certified with Blob ID: {}\n{}\n",
                blob_id, links.blob_url
            ));
        }
    }

    report
}
