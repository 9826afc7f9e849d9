//! Provider-name dispatch to a configured publishing adapter

use postbridge_domain::PublisherAdapter;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::framer::{FramerConfig, FramerPublisher};
use crate::notion::{NotionConfig, NotionPublisher};
use crate::shopify::{ShopifyConfig, ShopifyPublisher};
use crate::stub::StubPublisher;
use crate::webflow::{WebflowConfig, WebflowPublisher};
use crate::webhook::{WebhookConfig, WebhookPublisher};
use crate::wix::{WixConfig, WixPublisher};
use crate::wordpress::{WordPressConfig, WordPressPublisher};
use crate::wordpress_com::{WordPressComConfig, WordPressComPublisher};

/// Error type for adapter construction
#[derive(Debug, Error)]
pub enum AdapterConfigError {
    #[error("unknown publishing provider: {0}")]
    UnknownProvider(String),
    #[error("invalid {provider} config: {source}")]
    InvalidConfig {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn parse<T: DeserializeOwned>(
    provider: &'static str,
    config: &serde_json::Value,
) -> Result<T, AdapterConfigError> {
    serde_json::from_value(config.clone())
        .map_err(|source| AdapterConfigError::InvalidConfig { provider, source })
}

/// Construct the adapter for a provider name.
///
/// Each branch deserializes exactly the fields its config struct declares,
/// so unrelated keys in `config` are ignored rather than reaching adapter
/// internals. Unknown provider names fail here, at configuration time, not
/// at first publish.
pub fn adapter_for(
    provider: &str,
    config: &serde_json::Value,
) -> Result<Box<dyn PublisherAdapter>, AdapterConfigError> {
    match provider {
        "wordpress" => {
            let config: WordPressConfig = parse("wordpress", config)?;
            Ok(Box::new(WordPressPublisher::new(config)))
        }
        "wordpress_com" => {
            let config: WordPressComConfig = parse("wordpress_com", config)?;
            Ok(Box::new(WordPressComPublisher::new(config)))
        }
        "webflow" => {
            let config: WebflowConfig = parse("webflow", config)?;
            Ok(Box::new(WebflowPublisher::new(config)))
        }
        "shopify" => {
            let config: ShopifyConfig = parse("shopify", config)?;
            Ok(Box::new(ShopifyPublisher::new(config)))
        }
        "wix" => {
            let config: WixConfig = parse("wix", config)?;
            Ok(Box::new(WixPublisher::new(config)))
        }
        "notion" => {
            let config: NotionConfig = parse("notion", config)?;
            Ok(Box::new(NotionPublisher::new(config)))
        }
        "framer" => {
            let config: FramerConfig = parse("framer", config)?;
            Ok(Box::new(FramerPublisher::new(config)))
        }
        "webhook" => {
            let config: WebhookConfig = parse("webhook", config)?;
            Ok(Box::new(WebhookPublisher::new(config)))
        }
        "stub" => Ok(Box::new(StubPublisher::ok())),
        other => Err(AdapterConfigError::UnknownProvider(other.to_string())),
    }
}
