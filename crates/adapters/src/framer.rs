//! Framer CMS publishing adapter
//!
//! One POST creates the item live; there is no separate publish step like
//! Webflow's, and no scheduling, image, or tag support.

use std::time::Duration;

use async_trait::async_trait;
use postbridge_domain::{PublishError, PublishInput, PublishResult, PublisherAdapter};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "framer";
const DEFAULT_BASE_URL: &str = "https://api.framer.com";

/// Connection settings for a Framer project
#[derive(Clone, Deserialize)]
pub struct FramerConfig {
    pub api_token: String,
    pub project_id: String,
    /// CMS collection the posts land in
    pub collection_id: String,
}

/// Publisher for Framer CMS collections
pub struct FramerPublisher {
    client: Client,
    base_url: String,
    api_token: SecretString,
    project_id: String,
    collection_id: String,
}

impl FramerPublisher {
    pub fn new(config: FramerConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(config: FramerConfig, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            api_token: SecretString::new(config.api_token.into()),
            project_id: config.project_id,
            collection_id: config.collection_id,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_token.expose_secret())
    }
}

#[derive(Serialize)]
struct CreateItemRequest {
    fields: ItemFields,
}

#[derive(Serialize)]
struct ItemFields {
    title: String,
    slug: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

#[derive(Deserialize)]
struct CreateItemResponse {
    id: String,
}

#[async_trait]
impl PublisherAdapter for FramerPublisher {
    async fn test_connection(&self) -> bool {
        let url = format!("{}/v3/projects/{}", self.base_url, self.project_id);
        match self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError> {
        let request = CreateItemRequest {
            fields: ItemFields {
                title: input.title.clone(),
                slug: input.slug_or_derived(),
                content: input.html.clone(),
                summary: input.excerpt.clone(),
            },
        };

        let url = format!(
            "{}/v3/projects/{}/cms/collections/{}/items",
            self.base_url, self.project_id, self.collection_id
        );
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&request)
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

        let item: CreateItemResponse =
            response.json().await.map_err(|e| PublishError::Response {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(PublishResult {
            external_id: item.id,
            url: None,
        })
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn publisher(base_url: &str) -> FramerPublisher {
        FramerPublisher::with_base_url(
            FramerConfig {
                api_token: "framer-token".to_string(),
                project_id: "proj-1".to_string(),
                collection_id: "coll-1".to_string(),
            },
            base_url.to_string(),
        )
    }

    #[tokio::test]
    async fn test_publish_creates_item_in_one_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/projects/proj-1/cms/collections/coll-1/items"))
            .and(header("Authorization", "Bearer framer-token"))
            .and(body_json(serde_json::json!({
                "fields": {
                    "title": "Launch Day",
                    "slug": "launch-day",
                    "content": "<p>We shipped.</p>",
                    "summary": "The short version"
                }
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "id": "item-9" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut input = PublishInput::new("Launch Day", "<p>We shipped.</p>");
        input.excerpt = Some("The short version".to_string());

        let result = publisher(&mock_server.uri()).publish(&input).await.unwrap();

        assert_eq!(result.external_id, "item-9");
        assert!(result.url.is_none());
    }

    #[tokio::test]
    async fn test_publish_error_includes_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/projects/proj-1/cms/collections/coll-1/items"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&mock_server)
            .await;

        let input = PublishInput::new("Launch Day", "<p>We shipped.</p>");
        let err = publisher(&mock_server.uri())
            .publish(&input)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "framer error 429: slow down");
    }

    #[tokio::test]
    async fn test_connection_fetches_project() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/projects/proj-1"))
            .and(header("Authorization", "Bearer framer-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "proj-1" })),
            )
            .mount(&mock_server)
            .await;

        assert!(publisher(&mock_server.uri()).test_connection().await);
    }

    #[tokio::test]
    async fn test_connection_false_on_auth_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/projects/proj-1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        assert!(!publisher(&mock_server.uri()).test_connection().await);
    }
}
