//! Notion database publishing adapter
//!
//! Notion does not accept raw HTML, so the body is downgraded to plain
//! text with a naive tag-stripping regex before it lands in a paragraph
//! block. Lossy, and deliberately so.

use std::time::Duration;

use async_trait::async_trait;
use postbridge_domain::{PublishError, PublishInput, PublishResult, PublisherAdapter};
use regex::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

const PROVIDER: &str = "notion";
const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Connection settings for a Notion database
#[derive(Clone, Deserialize)]
pub struct NotionConfig {
    /// Internal integration token
    pub api_token: String,
    /// Database the pages are created in
    pub database_id: String,
}

/// Publisher for Notion databases
pub struct NotionPublisher {
    client: Client,
    base_url: String,
    api_token: SecretString,
    database_id: String,
    tag_pattern: Regex,
}

impl NotionPublisher {
    pub fn new(config: NotionConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(config: NotionConfig, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        let tag_pattern = Regex::new(r"<[^>]*>").expect("Valid regex");

        Self {
            client,
            base_url,
            api_token: SecretString::new(config.api_token.into()),
            database_id: config.database_id,
            tag_pattern,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_token.expose_secret())
    }

    fn strip_html(&self, html: &str) -> String {
        self.tag_pattern.replace_all(html, "").trim().to_string()
    }
}

fn rich_text(content: &str) -> serde_json::Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

#[derive(Deserialize)]
struct CreatePageResponse {
    id: String,
    url: Option<String>,
}

#[async_trait]
impl PublisherAdapter for NotionPublisher {
    async fn test_connection(&self) -> bool {
        let url = format!("{}/databases/{}", self.base_url, self.database_id);
        match self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError> {
        let mut properties = json!({
            "Name": { "title": rich_text(&input.title) }
        });
        if !input.tags.is_empty() {
            let tags: Vec<_> = input
                .tags
                .iter()
                .map(|tag| json!({ "name": tag }))
                .collect();
            properties["Tags"] = json!({ "multi_select": tags });
        }

        let body_text = self.strip_html(&input.html);
        let request = json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
            "children": [
                {
                    "object": "block",
                    "type": "heading_1",
                    "heading_1": { "rich_text": rich_text(&input.title) }
                },
                {
                    "object": "block",
                    "type": "paragraph",
                    "paragraph": { "rich_text": rich_text(&body_text) }
                }
            ]
        });

        let url = format!("{}/pages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .header("Notion-Version", NOTION_VERSION)
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

        let page: CreatePageResponse =
            response.json().await.map_err(|e| PublishError::Response {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(PublishResult {
            external_id: page.id,
            url: page.url,
        })
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn supports_tags(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn publisher(base_url: &str) -> NotionPublisher {
        NotionPublisher::with_base_url(
            NotionConfig {
                api_token: "notion-token".to_string(),
                database_id: "db-1".to_string(),
            },
            base_url.to_string(),
        )
    }

    #[test]
    fn test_strip_html_removes_tags() {
        let publisher = publisher("http://unused");
        assert_eq!(
            publisher.strip_html("<p>Hello <strong>world</strong></p>"),
            "Hello world"
        );
        assert_eq!(publisher.strip_html("plain text"), "plain text");
    }

    #[tokio::test]
    async fn test_publish_builds_page_with_stripped_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pages"))
            .and(header("Authorization", "Bearer notion-token"))
            .and(header("Notion-Version", "2022-06-28"))
            .and(body_json(serde_json::json!({
                "parent": { "database_id": "db-1" },
                "properties": {
                    "Name": { "title": [{ "type": "text", "text": { "content": "Launch Day" } }] },
                    "Tags": { "multi_select": [{ "name": "crm" }, { "name": "sales" }] }
                },
                "children": [
                    {
                        "object": "block",
                        "type": "heading_1",
                        "heading_1": {
                            "rich_text": [{ "type": "text", "text": { "content": "Launch Day" } }]
                        }
                    },
                    {
                        "object": "block",
                        "type": "paragraph",
                        "paragraph": {
                            "rich_text": [{ "type": "text", "text": { "content": "We shipped." } }]
                        }
                    }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "page-1",
                "url": "https://www.notion.so/page-1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut input = PublishInput::new("Launch Day", "<p>We <em>shipped</em>.</p>");
        input.tags = vec!["crm".to_string(), "sales".to_string()];

        let result = publisher(&mock_server.uri()).publish(&input).await.unwrap();

        assert_eq!(result.external_id, "page-1");
        assert_eq!(result.url.as_deref(), Some("https://www.notion.so/page-1"));
    }

    #[tokio::test]
    async fn test_publish_without_tags_omits_property() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pages"))
            .and(body_json(serde_json::json!({
                "parent": { "database_id": "db-1" },
                "properties": {
                    "Name": { "title": [{ "type": "text", "text": { "content": "Launch Day" } }] }
                },
                "children": [
                    {
                        "object": "block",
                        "type": "heading_1",
                        "heading_1": {
                            "rich_text": [{ "type": "text", "text": { "content": "Launch Day" } }]
                        }
                    },
                    {
                        "object": "block",
                        "type": "paragraph",
                        "paragraph": {
                            "rich_text": [{ "type": "text", "text": { "content": "We shipped." } }]
                        }
                    }
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "page-2", "url": null })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let input = PublishInput::new("Launch Day", "<p>We shipped.</p>");

        let result = publisher(&mock_server.uri()).publish(&input).await.unwrap();

        assert_eq!(result.external_id, "page-2");
        assert!(result.url.is_none());
    }

    #[tokio::test]
    async fn test_publish_error_includes_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pages"))
            .respond_with(ResponseTemplate::new(400).set_body_string("validation_error"))
            .mount(&mock_server)
            .await;

        let input = PublishInput::new("Launch Day", "<p>We shipped.</p>");
        let err = publisher(&mock_server.uri())
            .publish(&input)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "notion error 400: validation_error");
    }

    #[tokio::test]
    async fn test_connection_fetches_database() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/databases/db-1"))
            .and(header("Notion-Version", "2022-06-28"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "db-1" })),
            )
            .mount(&mock_server)
            .await;

        assert!(publisher(&mock_server.uri()).test_connection().await);
    }

    #[tokio::test]
    async fn test_connection_false_on_auth_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/databases/db-1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        assert!(!publisher(&mock_server.uri()).test_connection().await);
    }
}
