//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real publishing platforms.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::PublishInput;

/// Error type for publisher operations
#[derive(Debug, Error)]
pub enum PublishError {
    /// The platform answered with a non-success HTTP status.
    #[error("{provider} error {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },
    /// The request never produced an HTTP response.
    #[error("{provider} request failed: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },
    /// The platform answered 2xx but the body was not the expected shape.
    #[error("{provider} returned an unexpected response: {message}")]
    Response {
        provider: &'static str,
        message: String,
    },
    /// Post-publish verification kept finding truncated content and the
    /// retry budget ran out. `completeness` is the stored-to-submitted
    /// content length ratio of the last attempt, in percent.
    #[error(
        "{provider} truncated the post content after {attempts} attempts \
         (last completeness {completeness:.1}%): {last_error}"
    )]
    Truncated {
        provider: &'static str,
        attempts: u32,
        completeness: f64,
        last_error: String,
    },
    /// The input cannot be represented on this platform.
    #[error("{provider} rejected input: {message}")]
    Input {
        provider: &'static str,
        message: String,
    },
}

/// Result of a successful publish operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Platform-specific post/item ID
    pub external_id: String,
    /// URL to the published content, if the platform reports one
    pub url: Option<String>,
}

/// Port for publishing a post to an external platform
///
/// One implementation per platform. Capability flags tell callers which
/// optional [`PublishInput`] fields the platform can honor; callers are
/// expected to drop unsupported fields rather than fail.
#[async_trait]
pub trait PublisherAdapter: Send + Sync {
    /// Probe credentials and reachability with a cheap read call.
    ///
    /// Never returns an error: any failure is reported as `false` so
    /// health checks can poll every platform without unwinding.
    async fn test_connection(&self) -> bool;

    /// Publish a post, returning the platform's ID for it
    async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError>;

    /// Platform name used in logs and error messages (e.g. "shopify")
    fn provider(&self) -> &'static str;

    /// Whether the platform accepts a future publish date
    fn supports_scheduling(&self) -> bool {
        false
    }

    /// Whether the platform accepts a featured image
    fn supports_images(&self) -> bool {
        false
    }

    /// Whether the platform accepts tags
    fn supports_tags(&self) -> bool {
        false
    }
}
