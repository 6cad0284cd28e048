//! Publisher integration for storing blobs
//!
//! Handles the single HTTP PUT against a Walrus publisher and returns the
//! decoded JSON body for interpretation by the uploader.

pub mod client;
pub mod mock;

pub use client::PublisherClient;
pub use mock::MockPublisherClient;

use crate::Result;
use async_trait::async_trait;
use std::num::NonZeroU32;

#[async_trait]
pub trait PublisherService: Send + Sync {
    /// Stores `body` for `epochs` epochs and returns the publisher's JSON reply.
    async fn put_blob(
        &self,
        publisher_url: &str,
        epochs: NonZeroU32,
        body: Vec<u8>,
    ) -> Result<serde_json::Value>;
}
