//! Configuration loading and management
//!
//! Platform sections hold the non-secret connection fields plus the NAME of
//! the environment variable carrying each secret. Secret values never live in
//! the config file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub platforms: PlatformsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Default article length tier (short, medium, long)
    #[serde(default = "default_length")]
    pub default_length: String,

    /// Generate tiny throwaway articles for pipeline testing
    #[serde(default)]
    pub test_mode: bool,
}

/// One optional section per destination platform
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformsConfig {
    #[serde(default)]
    pub wordpress: Option<WordPressSection>,

    #[serde(default)]
    pub wordpress_com: Option<WordPressComSection>,

    #[serde(default)]
    pub webflow: Option<WebflowSection>,

    #[serde(default)]
    pub shopify: Option<ShopifySection>,

    #[serde(default)]
    pub wix: Option<WixSection>,

    #[serde(default)]
    pub notion: Option<NotionSection>,

    #[serde(default)]
    pub framer: Option<FramerSection>,

    #[serde(default)]
    pub webhook: Option<WebhookSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPressSection {
    pub site_url: String,

    pub username: String,

    #[serde(default = "default_wordpress_app_password_env")]
    pub app_password_env: String,

    #[serde(default = "default_post_type")]
    pub post_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPressComSection {
    pub site_id: String,

    #[serde(default = "default_wordpress_com_token_env")]
    pub access_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebflowSection {
    pub site_id: String,

    pub collection_id: String,

    #[serde(default = "default_webflow_token_env")]
    pub api_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifySection {
    pub store_domain: String,

    pub blog_id: String,

    #[serde(default = "default_shopify_api_version")]
    pub api_version: String,

    #[serde(default = "default_shopify_token_env")]
    pub access_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WixSection {
    #[serde(default = "default_wix_token_env")]
    pub access_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionSection {
    pub database_id: String,

    #[serde(default = "default_notion_token_env")]
    pub api_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramerSection {
    pub project_id: String,

    pub collection_id: String,

    #[serde(default = "default_framer_token_env")]
    pub api_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSection {
    pub url: String,

    /// Extra headers sent verbatim on every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Signature scheme (shared_secret, hmac_sha256)
    #[serde(default = "default_webhook_signing")]
    pub signing: String,

    /// Env var holding the signing secret; empty means unsigned delivery
    #[serde(default)]
    pub secret_env: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_length() -> String {
    "medium".to_string()
}

fn default_wordpress_app_password_env() -> String {
    "WORDPRESS_APP_PASSWORD".to_string()
}

fn default_post_type() -> String {
    "posts".to_string()
}

fn default_wordpress_com_token_env() -> String {
    "WORDPRESS_COM_ACCESS_TOKEN".to_string()
}

fn default_webflow_token_env() -> String {
    "WEBFLOW_API_TOKEN".to_string()
}

fn default_shopify_api_version() -> String {
    "2024-07".to_string()
}

fn default_shopify_token_env() -> String {
    "SHOPIFY_ACCESS_TOKEN".to_string()
}

fn default_wix_token_env() -> String {
    "WIX_ACCESS_TOKEN".to_string()
}

fn default_notion_token_env() -> String {
    "NOTION_API_TOKEN".to_string()
}

fn default_framer_token_env() -> String {
    "FRAMER_API_TOKEN".to_string()
}

fn default_webhook_signing() -> String {
    "shared_secret".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            default_length: default_length(),
            test_mode: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("POSTBRIDGE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# postbridge configuration

[general]
log_level = "info"

[content]
default_length = "medium"  # short, medium, long
test_mode = false

# Uncomment the platforms you publish to. Secrets are read from the
# environment variables named by the *_env fields, never from this file.

# [platforms.wordpress]
# site_url = "https://blog.example.com"
# username = "admin"
# app_password_env = "WORDPRESS_APP_PASSWORD"
# post_type = "posts"

# [platforms.wordpress_com]
# site_id = "example.wordpress.com"
# access_token_env = "WORDPRESS_COM_ACCESS_TOKEN"

# [platforms.webflow]
# site_id = "your-site-id"
# collection_id = "your-collection-id"
# api_token_env = "WEBFLOW_API_TOKEN"

# [platforms.shopify]
# store_domain = "example.myshopify.com"
# blog_id = "12345"
# api_version = "2024-07"
# access_token_env = "SHOPIFY_ACCESS_TOKEN"

# [platforms.wix]
# access_token_env = "WIX_ACCESS_TOKEN"

# [platforms.notion]
# database_id = "your-database-id"
# api_token_env = "NOTION_API_TOKEN"

# [platforms.framer]
# project_id = "your-project-id"
# collection_id = "your-collection-id"
# api_token_env = "FRAMER_API_TOKEN"

# [platforms.webhook]
# url = "https://example.com/hooks/publish"
# signing = "shared_secret"  # shared_secret, hmac_sha256
# secret_env = "WEBHOOK_SECRET"
# [platforms.webhook.headers]
# "X-Api-Client" = "postbridge"
"#
        .to_string()
    }
}
