//! Shopify blog publishing adapter
//!
//! Talks to the versioned Admin REST API. Tags are a single comma-joined
//! string, which is Shopify's native format. Scheduling is delegated to
//! Shopify by sending a future `published_at` instead of `published`.

use std::time::Duration;

use async_trait::async_trait;
use postbridge_domain::{PublishError, PublishInput, PublishResult, PublisherAdapter};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

const PROVIDER: &str = "shopify";
const DEFAULT_API_VERSION: &str = "2024-07";

/// Connection settings for a Shopify store blog
#[derive(Clone, Deserialize)]
pub struct ShopifyConfig {
    /// Store domain, e.g. "demo.myshopify.com"
    pub store_domain: String,
    /// Admin API access token
    pub access_token: String,
    pub blog_id: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

/// Publisher for Shopify blogs
pub struct ShopifyPublisher {
    client: Client,
    base_url: String,
    store_domain: String,
    access_token: SecretString,
    blog_id: String,
    api_version: String,
}

impl ShopifyPublisher {
    pub fn new(config: ShopifyConfig) -> Self {
        let base_url = format!("https://{}", config.store_domain);
        Self::with_base_url(config, base_url)
    }

    pub fn with_base_url(config: ShopifyConfig, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            store_domain: config.store_domain,
            access_token: SecretString::new(config.access_token.into()),
            blog_id: config.blog_id,
            api_version: config.api_version,
        }
    }
}

#[derive(Serialize)]
struct CreateArticleRequest {
    article: ArticlePayload,
}

#[derive(Serialize)]
struct ArticlePayload {
    title: String,
    body_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<String>,
}

#[derive(Deserialize)]
struct CreateArticleResponse {
    article: CreatedArticle,
}

#[derive(Deserialize)]
struct CreatedArticle {
    id: u64,
    handle: String,
}

#[async_trait]
impl PublisherAdapter for ShopifyPublisher {
    async fn test_connection(&self) -> bool {
        let url = format!(
            "{}/admin/api/{}/blogs/{}.json",
            self.base_url, self.api_version, self.blog_id
        );
        match self
            .client
            .get(&url)
            .header("X-Shopify-Access-Token", self.access_token.expose_secret())
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError> {
        let published_at = input
            .when
            .map(|when| when.format(&Rfc3339))
            .transpose()
            .map_err(|e| PublishError::Input {
                provider: PROVIDER,
                message: format!("invalid publish date: {e}"),
            })?;
        let published = if input.is_scheduled() {
            None
        } else {
            Some(true)
        };
        let tags = if input.tags.is_empty() {
            None
        } else {
            Some(input.tags.join(", "))
        };

        let request = CreateArticleRequest {
            article: ArticlePayload {
                title: input.title.clone(),
                body_html: input.html.clone(),
                summary_html: input.excerpt.clone(),
                tags,
                published,
                published_at,
            },
        };

        let url = format!(
            "{}/admin/api/{}/blogs/{}/articles.json",
            self.base_url, self.api_version, self.blog_id
        );
        let response = self
            .client
            .post(&url)
            .header("X-Shopify-Access-Token", self.access_token.expose_secret())
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

        let created: CreateArticleResponse =
            response.json().await.map_err(|e| PublishError::Response {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let url = format!(
            "https://{}/blogs/{}/{}",
            self.store_domain, self.blog_id, created.article.handle
        );

        Ok(PublishResult {
            external_id: created.article.id.to_string(),
            url: Some(url),
        })
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn supports_scheduling(&self) -> bool {
        true
    }

    fn supports_tags(&self) -> bool {
        true
    }
}
