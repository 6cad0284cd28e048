use super::PublisherService;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use std::num::NonZeroU32;
use std::time::Duration;

pub struct PublisherClient {
    client: Client,
}

impl PublisherClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::from_builder(Client::builder().timeout(timeout))
    }

    pub fn from_builder(builder: ClientBuilder) -> Result<Self> {
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    fn blobs_url(publisher_url: &str) -> String {
        format!("{}/v1/blobs", publisher_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PublisherService for PublisherClient {
    async fn put_blob(
        &self,
        publisher_url: &str,
        epochs: NonZeroU32,
        body: Vec<u8>,
    ) -> Result<serde_json::Value> {
        let url = Self::blobs_url(publisher_url);
        tracing::debug!("PUT {} ({} bytes, {} epochs)", url, body.len(), epochs);

        let response = self
            .client
            .put(&url)
            .query(&[("epochs", epochs.get())])
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to publisher: {}", e);
                e
            })?;

        // Redirects are followed by reqwest; only 4xx/5xx are failures.
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Publisher error (status {}): {}", status, error_text);
            return Err(Error::Http {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse publisher response: {}\nBody: {}", e, body);
            Error::InvalidResponse(format!("response body is not JSON: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use wiremock::matchers::{body_bytes, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn epochs(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_blobs_url_trims_trailing_slash() {
        assert_eq!(
            PublisherClient::blobs_url("http://localhost:31415/"),
            "http://localhost:31415/v1/blobs"
        );
        assert_eq!(
            PublisherClient::blobs_url("http://localhost:31415"),
            "http://localhost:31415/v1/blobs"
        );
    }

    #[tokio::test]
    async fn test_put_blob_sends_epochs_header_and_body() {
        let server = MockServer::start().await;
        let payload = b"{\"name\": \"My Walrus Data\"}".to_vec();

        Mock::given(method("PUT"))
            .and(path("/v1/blobs"))
            .and(query_param("epochs", "5"))
            .and(header("content-type", "application/json"))
            .and(body_bytes(payload.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "alreadyCertified": { "blobId": "xyz" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PublisherClient::new(Duration::from_secs(5)).unwrap();
        let response = client
            .put_blob(&server.uri(), epochs(5), payload)
            .await
            .unwrap();

        assert_eq!(response["alreadyCertified"]["blobId"], "xyz");
    }

    #[tokio::test]
    async fn test_put_blob_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/blobs"))
            .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
            .mount(&server)
            .await;

        let client = PublisherClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .put_blob(&server.uri(), epochs(1), b"{}".to_vec())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::HttpError);
        assert!(matches!(err, Error::Http { status: 500, ref body } if body == "server error"));
    }

    #[test]
    fn test_client_build_failure_is_configuration_error() {
        let builder = Client::builder().user_agent("bad\nagent");

        let err = PublisherClient::from_builder(builder).err().unwrap();

        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_put_blob_accepts_unfollowed_redirect_status() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/blobs"))
            .respond_with(ResponseTemplate::new(300).set_body_json(serde_json::json!({
                "alreadyCertified": { "blobId": "xyz" }
            })))
            .mount(&server)
            .await;

        let client = PublisherClient::new(Duration::from_secs(5)).unwrap();
        let response = client
            .put_blob(&server.uri(), epochs(1), b"{}".to_vec())
            .await
            .unwrap();

        assert_eq!(response["alreadyCertified"]["blobId"], "xyz");
    }

    #[tokio::test]
    async fn test_put_blob_client_error() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/blobs"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&server)
            .await;

        let client = PublisherClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .put_blob(&server.uri(), epochs(1), b"{}".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http { status: 413, .. }));
    }

    #[tokio::test]
    async fn test_put_blob_non_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/blobs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = PublisherClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .put_blob(&server.uri(), epochs(1), b"{}".to_vec())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn test_put_blob_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = PublisherClient::new(Duration::from_millis(100)).unwrap();
        let err = client
            .put_blob(&server.uri(), epochs(1), b"{}".to_vec())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NetworkError);
    }

    #[tokio::test]
    async fn test_put_blob_connection_refused() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PublisherClient::new(Duration::from_secs(5)).unwrap();
        let err = client
            .put_blob(&format!("http://{}", addr), epochs(1), b"{}".to_vec())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NetworkError);
    }
}
