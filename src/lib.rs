//! Uploader for storing JSON documents on a Walrus publisher
//!
//! Validates a local JSON file, sends its exact bytes to the publisher's
//! `/v1/blobs` endpoint, and interprets the reply as either a newly created
//! or an already certified blob.

pub mod app;
pub mod error;
pub mod models;
pub mod publisher;
pub mod uploader;
pub mod viewer;

pub use error::{Error, ErrorKind, Result};
