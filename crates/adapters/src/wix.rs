//! Wix blog publishing adapter
//!
//! The Authorization header carries the raw access token, no "Bearer"
//! prefix; that is this API's convention. Draft state and publish state
//! are separate fields and must be set consistently when scheduling.

use std::time::Duration;

use async_trait::async_trait;
use postbridge_domain::{PublishError, PublishInput, PublishResult, PublisherAdapter};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

const PROVIDER: &str = "wix";
const DEFAULT_BASE_URL: &str = "https://www.wixapis.com";

/// Connection settings for a Wix site blog
#[derive(Clone, Deserialize)]
pub struct WixConfig {
    pub access_token: String,
}

/// Publisher for Wix blogs
pub struct WixPublisher {
    client: Client,
    base_url: String,
    access_token: SecretString,
}

impl WixPublisher {
    pub fn new(config: WixConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(config: WixConfig, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            access_token: SecretString::new(config.access_token.into()),
        }
    }
}

#[derive(Serialize)]
struct CreatePostRequest {
    post: PostPayload,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostPayload {
    title: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<String>,
    status: &'static str,
    publish_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    publish_date: Option<String>,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    post: CreatedPost,
}

#[derive(Deserialize)]
struct CreatedPost {
    id: String,
}

#[async_trait]
impl PublisherAdapter for WixPublisher {
    async fn test_connection(&self) -> bool {
        let url = format!("{}/blog/v3/blogs", self.base_url);
        match self
            .client
            .get(&url)
            .header("Authorization", self.access_token.expose_secret())
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError> {
        let publish_date = input
            .when
            .map(|when| when.format(&Rfc3339))
            .transpose()
            .map_err(|e| PublishError::Input {
                provider: PROVIDER,
                message: format!("invalid publish date: {e}"),
            })?;
        let (status, publish_status) = if input.is_scheduled() {
            ("DRAFT", "SCHEDULED")
        } else {
            ("PUBLISHED", "PUBLISHED")
        };

        let request = CreatePostRequest {
            post: PostPayload {
                title: input.title.clone(),
                content: input.html.clone(),
                excerpt: input.excerpt.clone(),
                status,
                publish_status,
                publish_date,
            },
        };

        let url = format!("{}/blog/v3/posts", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.access_token.expose_secret())
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

        let created: CreatePostResponse =
            response.json().await.map_err(|e| PublishError::Response {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(PublishResult {
            external_id: created.post.id,
            url: None,
        })
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn supports_scheduling(&self) -> bool {
        true
    }
}
