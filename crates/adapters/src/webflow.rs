//! Webflow CMS publishing adapter
//!
//! Creating a collection item leaves it staged; a second items/publish call
//! makes it live. Both steps run inside one publish, in that order, and a
//! created-but-unpublished item is never reported as success.

use std::time::Duration;

use async_trait::async_trait;
use postbridge_domain::{PublishError, PublishInput, PublishResult, PublisherAdapter};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "webflow";
const DEFAULT_BASE_URL: &str = "https://api.webflow.com";
const ACCEPT_VERSION: &str = "1.0.0";

/// Connection settings for a Webflow site
#[derive(Clone, Deserialize)]
pub struct WebflowConfig {
    pub api_token: String,
    pub site_id: String,
    /// CMS collection the posts land in
    pub collection_id: String,
}

/// Publisher for Webflow CMS collections
pub struct WebflowPublisher {
    client: Client,
    base_url: String,
    api_token: SecretString,
    site_id: String,
    collection_id: String,
}

impl WebflowPublisher {
    pub fn new(config: WebflowConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(config: WebflowConfig, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            api_token: SecretString::new(config.api_token.into()),
            site_id: config.site_id,
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
    name: String,
    slug: String,
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(rename = "_archived")]
    archived: bool,
    #[serde(rename = "_draft")]
    draft: bool,
}

#[derive(Deserialize)]
struct CreateItemResponse {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Serialize)]
struct PublishItemsRequest {
    #[serde(rename = "itemIds")]
    item_ids: Vec<String>,
}

#[async_trait]
impl PublisherAdapter for WebflowPublisher {
    async fn test_connection(&self) -> bool {
        let url = format!("{}/sites/{}", self.base_url, self.site_id);
        match self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .header("accept-version", ACCEPT_VERSION)
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
                name: input.title.clone(),
                slug: input.slug_or_derived(),
                body: input.html.clone(),
                summary: input.excerpt.clone(),
                tags: input.tags.clone(),
                archived: false,
                draft: false,
            },
        };

        let create_url = format!("{}/collections/{}/items", self.base_url, self.collection_id);
        let response = self
            .client
            .post(&create_url)
            .header("Authorization", self.bearer())
            .header("accept-version", ACCEPT_VERSION)
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

        let publish_url = format!(
            "{}/collections/{}/items/publish",
            self.base_url, self.collection_id
        );
        let publish_request = PublishItemsRequest {
            item_ids: vec![item.id.clone()],
        };
        let response = self
            .client
            .post(&publish_url)
            .header("Authorization", self.bearer())
            .header("accept-version", ACCEPT_VERSION)
            .json(&publish_request)
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

        Ok(PublishResult {
            external_id: item.id,
            url: None,
        })
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn supports_tags(&self) -> bool {
        true
    }
}
