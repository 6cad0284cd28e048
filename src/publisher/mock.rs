use super::PublisherService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

/// One recorded `put_blob` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPut {
    pub publisher_url: String,
    pub epochs: NonZeroU32,
    pub body: Vec<u8>,
}

#[derive(Clone)]
pub struct MockPublisherClient {
    responses: Arc<Mutex<VecDeque<serde_json::Value>>>,
    calls: Arc<Mutex<Vec<RecordedPut>>>,
    failure_status: Option<u16>,
}

impl MockPublisherClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failure_status: None,
        }
    }

    pub fn with_response(self, response: serde_json::Value) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Makes every call fail as if the publisher answered with `status`.
    pub fn with_http_failure(mut self, status: u16) -> Self {
        self.failure_status = Some(status);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<RecordedPut> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockPublisherClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PublisherService for MockPublisherClient {
    async fn put_blob(
        &self,
        publisher_url: &str,
        epochs: NonZeroU32,
        body: Vec<u8>,
    ) -> Result<serde_json::Value> {
        self.calls.lock().unwrap().push(RecordedPut {
            publisher_url: publisher_url.to_string(),
            epochs,
            body,
        });

        if let Some(status) = self.failure_status {
            return Err(Error::Http {
                status,
                body: "mock failure".to_string(),
            });
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::InvalidResponse("No mock response queued".to_string()))
    }
}
