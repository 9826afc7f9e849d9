//! Generic webhook publishing adapter
//!
//! POSTs the whole post as JSON to a caller-supplied URL, attaching a
//! fresh idempotency key per call. Deduplication is the receiver's job.
//!
//! The default `X-Signature` header carries the raw shared secret, which
//! any observer of one request can replay against arbitrary payloads.
//! That matches what existing receivers expect; `hmac_sha256` mode signs
//! the exact request bytes instead for receivers that verify.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use postbridge_domain::{PublishError, PublishInput, PublishResult, PublisherAdapter};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

const PROVIDER: &str = "webhook";

/// How the X-Signature header is derived from the shared secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningMode {
    /// Send the shared secret itself
    #[default]
    SharedSecret,
    /// Send "sha256=<hex>" of an HMAC over the request body
    HmacSha256,
}

/// Settings for a caller-supplied webhook receiver
#[derive(Clone, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    /// Extra headers sent verbatim on every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub signing: SigningMode,
}

/// Publisher for arbitrary webhook receivers
pub struct WebhookPublisher {
    client: Client,
    url: String,
    headers: BTreeMap<String, String>,
    secret: Option<SecretString>,
    signing: SigningMode,
}

impl WebhookPublisher {
    pub fn new(config: WebhookConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            url: config.url,
            headers: config.headers,
            secret: config.secret.map(|s| SecretString::new(s.into())),
            signing: config.signing,
        }
    }

    fn signature(&self, body: &[u8]) -> Option<String> {
        let secret = self.secret.as_ref()?;
        match self.signing {
            SigningMode::SharedSecret => Some(secret.expose_secret().to_string()),
            SigningMode::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(secret.expose_secret().as_bytes())
                    .expect("HMAC accepts any key length");
                mac.update(body);
                let hex: String = mac
                    .finalize()
                    .into_bytes()
                    .iter()
                    .map(|b| format!("{b:02x}"))
                    .collect();
                Some(format!("sha256={hex}"))
            }
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    #[serde(flatten)]
    input: &'a PublishInput,
    idempotency_key: String,
}

/// Receivers may echo the stored ID and URL; both are optional.
#[derive(Default, Deserialize)]
struct WebhookAck {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl PublisherAdapter for WebhookPublisher {
    async fn test_connection(&self) -> bool {
        let mut request = self.client.head(&self.url);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError> {
        let payload = WebhookPayload {
            input,
            idempotency_key: Uuid::new_v4().to_string(),
        };
        // Serialize once so the signature covers the exact bytes on the wire
        let body = serde_json::to_vec(&payload).map_err(|e| PublishError::Input {
            provider: PROVIDER,
            message: format!("payload not serializable: {e}"),
        })?;

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(signature) = self.signature(&body) {
            request = request.header("X-Signature", signature);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Network {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api {
                provider: PROVIDER,
                status,
                body,
            });
        }

        // A bare 2xx with no JSON ack is a valid response
        let ack: WebhookAck = response.json().await.unwrap_or_default();

        Ok(PublishResult {
            external_id: ack.id.unwrap_or_default(),
            url: ack.url,
        })
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn supports_scheduling(&self) -> bool {
        true
    }

    fn supports_images(&self) -> bool {
        true
    }

    fn supports_tags(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: String) -> WebhookConfig {
        WebhookConfig {
            url,
            headers: BTreeMap::new(),
            secret: None,
            signing: SigningMode::default(),
        }
    }

    fn sample_input() -> PublishInput {
        PublishInput::new("Launch Day", "<p>We shipped.</p>")
    }

    #[tokio::test]
    async fn test_publish_posts_payload_with_custom_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hooks/publish"))
            .and(header("X-Api-Key", "hook-key"))
            .and(body_partial_json(serde_json::json!({
                "title": "Launch Day",
                "html": "<p>We shipped.</p>"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt-1",
                "url": "https://receiver.example.com/posts/evt-1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = config(format!("{}/hooks/publish", mock_server.uri()));
        config
            .headers
            .insert("X-Api-Key".to_string(), "hook-key".to_string());

        let result = WebhookPublisher::new(config)
            .publish(&sample_input())
            .await
            .unwrap();

        assert_eq!(result.external_id, "evt-1");
        assert_eq!(
            result.url.as_deref(),
            Some("https://receiver.example.com/posts/evt-1")
        );

        // The payload carries a generated idempotency key
        let requests = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(!body["idempotency_key"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_consecutive_publishes_use_distinct_idempotency_keys() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hooks/publish"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "evt" })),
            )
            .expect(2)
            .mount(&mock_server)
            .await;

        let publisher =
            WebhookPublisher::new(config(format!("{}/hooks/publish", mock_server.uri())));
        let input = sample_input();

        publisher.publish(&input).await.unwrap();
        publisher.publish(&input).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let keys: Vec<String> = requests
            .iter()
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["idempotency_key"].as_str().unwrap().to_string()
            })
            .collect();

        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
    }

    #[tokio::test]
    async fn test_shared_secret_goes_out_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hooks/publish"))
            .and(header("X-Signature", "hook-secret"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = config(format!("{}/hooks/publish", mock_server.uri()));
        config.secret = Some("hook-secret".to_string());

        let result = WebhookPublisher::new(config)
            .publish(&sample_input())
            .await
            .unwrap();

        // No ack body, so no external ID to report
        assert_eq!(result.external_id, "");
    }

    #[tokio::test]
    async fn test_hmac_mode_signs_the_request_bytes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hooks/publish"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = config(format!("{}/hooks/publish", mock_server.uri()));
        config.secret = Some("hook-secret".to_string());
        config.signing = SigningMode::HmacSha256;

        WebhookPublisher::new(config)
            .publish(&sample_input())
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let request = &requests[0];

        let mut mac = Hmac::<Sha256>::new_from_slice(b"hook-secret").unwrap();
        mac.update(&request.body);
        let expected: String = mac
            .finalize()
            .into_bytes()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();

        let signature = request
            .headers
            .get("X-Signature")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert_eq!(signature, format!("sha256={expected}"));
    }

    #[tokio::test]
    async fn test_publish_error_includes_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hooks/publish"))
            .respond_with(ResponseTemplate::new(500).set_body_string("receiver exploded"))
            .mount(&mock_server)
            .await;

        let err = WebhookPublisher::new(config(format!("{}/hooks/publish", mock_server.uri())))
            .publish(&sample_input())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "webhook error 500: receiver exploded");
    }

    #[tokio::test]
    async fn test_connection_uses_head() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/hooks/publish"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let publisher =
            WebhookPublisher::new(config(format!("{}/hooks/publish", mock_server.uri())));
        assert!(publisher.test_connection().await);
    }

    #[tokio::test]
    async fn test_connection_false_on_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/hooks/publish"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let publisher =
            WebhookPublisher::new(config(format!("{}/hooks/publish", mock_server.uri())));
        assert!(!publisher.test_connection().await);
    }
}
