//! Adapters crate: platform publishing implementations
//!
//! This crate implements the `PublisherAdapter` port from the domain crate,
//! one module per destination platform:
//!
//! - `wordpress`: self-hosted WordPress via the REST API
//! - `wordpress_com`: WordPress.com, with verify-after-write retries
//! - `webflow`: Webflow CMS collection items
//! - `shopify`: Shopify blog articles
//! - `wix`: Wix blog posts
//! - `notion`: Notion database pages
//! - `framer`: Framer CMS collection items
//! - `webhook`: signed delivery to a caller-supplied endpoint
//!
//! `media` holds the shared featured-image upload helpers, `factory`
//! resolves a provider name into a boxed adapter, and `stub` is an
//! in-memory implementation for tests and dry runs.

pub mod factory;
pub mod framer;
pub mod media;
pub mod notion;
pub mod shopify;
pub mod stub;
pub mod webflow;
pub mod webhook;
pub mod wix;
pub mod wordpress;
pub mod wordpress_com;

pub use factory::{adapter_for, AdapterConfigError};
pub use framer::{FramerConfig, FramerPublisher};
pub use media::UploadedImage;
pub use notion::{NotionConfig, NotionPublisher};
pub use shopify::{ShopifyConfig, ShopifyPublisher};
pub use stub::StubPublisher;
pub use webflow::{WebflowConfig, WebflowPublisher};
pub use webhook::{SigningMode, WebhookConfig, WebhookPublisher};
pub use wix::{WixConfig, WixPublisher};
pub use wordpress::{WordPressConfig, WordPressPublisher};
pub use wordpress_com::{WordPressComConfig, WordPressComPublisher};
