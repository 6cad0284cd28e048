//! Data models and structures
//!
//! Defines the upload request/outcome types, the publisher's JSON response
//! shapes, and runtime configuration.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PUBLISHER_URL: &str = "https://publisher.walrus-testnet.walrus.space";
pub const DEFAULT_AGGREGATOR_URL: &str = "https://aggregator.walrus-testnet.walrus.space";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A single upload of one local JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub publisher_url: String,
    pub epochs: NonZeroU32,
}

impl UploadRequest {
    pub fn new(file_path: impl Into<PathBuf>, publisher_url: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            publisher_url: publisher_url.into(),
            epochs: NonZeroU32::MIN,
        }
    }

    pub fn with_epochs(mut self, epochs: NonZeroU32) -> Self {
        self.epochs = epochs;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    NewlyCreated { blob_id: String, object_id: String },
    AlreadyCertified { blob_id: String },
}

impl UploadOutcome {
    pub fn blob_id(&self) -> &str {
        match self {
            UploadOutcome::NewlyCreated { blob_id, .. } => blob_id,
            UploadOutcome::AlreadyCertified { blob_id } => blob_id,
        }
    }

    pub fn object_id(&self) -> Option<&str> {
        match self {
            UploadOutcome::NewlyCreated { object_id, .. } => Some(object_id),
            UploadOutcome::AlreadyCertified { .. } => None,
        }
    }
}

/// Interpreted outcome together with the publisher's raw JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct PublisherReply {
    pub outcome: UploadOutcome,
    pub response: serde_json::Value,
}

// Publisher API response models
//
// Only the identifiers are required. Everything else is informational and
// decodes to `None` when missing or of an unexpected type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewlyCreated {
    pub blob_object: BlobObject,
    #[serde(default, deserialize_with = "lenient")]
    pub cost: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobObject {
    pub id: String,
    pub blob_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub registered_epoch: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub certified_epoch: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub storage: Option<StorageResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResource {
    #[serde(default, deserialize_with = "lenient")]
    pub end_epoch: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlreadyCertified {
    pub blob_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub end_epoch: Option<u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Maps a publisher response body onto an [`UploadOutcome`].
///
/// `newlyCreated` wins when both keys are present. A recognized key with a
/// payload missing its identifiers is an invalid response; a body with
/// neither key is an unrecognized shape.
pub fn interpret_response(response: &serde_json::Value) -> Result<UploadOutcome> {
    let Some(fields) = response.as_object() else {
        return Err(Error::UnrecognizedResponseShape(format!(
            "expected a JSON object, got {}",
            response
        )));
    };

    if let Some(payload) = fields.get("newlyCreated") {
        let created: NewlyCreated = serde_json::from_value(payload.clone())
            .map_err(|e| Error::InvalidResponse(format!("malformed newlyCreated: {}", e)))?;
        tracing::debug!(
            size = ?created.blob_object.size,
            cost = ?created.cost,
            registered_epoch = ?created.blob_object.registered_epoch,
            certified_epoch = ?created.blob_object.certified_epoch,
            end_epoch = ?created.blob_object.storage.as_ref().and_then(|s| s.end_epoch),
            "Blob newly created"
        );
        return Ok(UploadOutcome::NewlyCreated {
            blob_id: created.blob_object.blob_id,
            object_id: created.blob_object.id,
        });
    }

    if let Some(payload) = fields.get("alreadyCertified") {
        let certified: AlreadyCertified = serde_json::from_value(payload.clone())
            .map_err(|e| Error::InvalidResponse(format!("malformed alreadyCertified: {}", e)))?;
        tracing::debug!(end_epoch = ?certified.end_epoch, "Blob already certified");
        return Ok(UploadOutcome::AlreadyCertified {
            blob_id: certified.blob_id,
        });
    }

    let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    Err(Error::UnrecognizedResponseShape(format!(
        "neither newlyCreated nor alreadyCertified present (keys: [{}])",
        keys.join(", ")
    )))
}

// Configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub publisher_url: String,
    pub aggregator_url: String,
    pub epochs: NonZeroU32,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            publisher_url: DEFAULT_PUBLISHER_URL.to_string(),
            aggregator_url: DEFAULT_AGGREGATOR_URL.to_string(),
            epochs: NonZeroU32::MIN,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let epochs = match lookup("WALRUS_EPOCHS") {
            Some(raw) => parse_positive("WALRUS_EPOCHS", &raw)?,
            None => defaults.epochs,
        };
        let timeout = match lookup("WALRUS_TIMEOUT_SECS") {
            Some(raw) => {
                Duration::from_secs(u64::from(parse_positive("WALRUS_TIMEOUT_SECS", &raw)?.get()))
            }
            None => defaults.timeout,
        };

        Ok(Self {
            publisher_url: lookup("WALRUS_PUBLISHER_URL").unwrap_or(defaults.publisher_url),
            aggregator_url: lookup("WALRUS_AGGREGATOR_URL").unwrap_or(defaults.aggregator_url),
            epochs,
            timeout,
        })
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<NonZeroU32> {
    raw.trim().parse::<NonZeroU32>().map_err(|_| {
        Error::Config(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))
    })
}
