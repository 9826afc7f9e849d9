//! Stub publisher for testing and dry-run mode

use async_trait::async_trait;
use postbridge_domain::{PublishError, PublishInput, PublishResult, PublisherAdapter};

const PROVIDER: &str = "stub";

/// Stub publisher that returns configurable responses without any network
pub struct StubPublisher {
    connected: bool,
    result: Option<PublishResult>,
    error: Option<String>,
}

impl StubPublisher {
    /// Create a stub that succeeds with an ID derived from the input slug
    pub fn ok() -> Self {
        Self {
            connected: true,
            result: None,
            error: None,
        }
    }

    /// Create a stub that reports a dead connection and fails every publish
    pub fn offline() -> Self {
        Self {
            connected: false,
            result: None,
            error: Some("stub is offline".to_string()),
        }
    }

    /// Create a stub that returns a specific result
    pub fn with_result(result: PublishResult) -> Self {
        Self {
            connected: true,
            result: Some(result),
            error: None,
        }
    }

    /// Create a stub that always fails with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            connected: true,
            result: None,
            error: Some(message.into()),
        }
    }
}

impl Default for StubPublisher {
    fn default() -> Self {
        Self::ok()
    }
}

#[async_trait]
impl PublisherAdapter for StubPublisher {
    async fn test_connection(&self) -> bool {
        self.connected
    }

    async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError> {
        if let Some(message) = &self.error {
            return Err(PublishError::Network {
                provider: PROVIDER,
                message: message.clone(),
            });
        }

        if let Some(result) = &self.result {
            return Ok(result.clone());
        }

        let slug = input.slug_or_derived();
        Ok(PublishResult {
            external_id: format!("stub-{slug}"),
            url: Some(format!("https://stub.invalid/{slug}")),
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

    fn sample_input() -> PublishInput {
        PublishInput::new("Launch Day", "<p>We shipped.</p>")
    }

    #[tokio::test]
    async fn test_ok_stub_derives_id_from_slug() {
        let publisher = StubPublisher::ok();

        assert!(publisher.test_connection().await);
        let result = publisher.publish(&sample_input()).await.unwrap();

        assert_eq!(result.external_id, "stub-launch-day");
        assert_eq!(result.url.as_deref(), Some("https://stub.invalid/launch-day"));
    }

    #[tokio::test]
    async fn test_offline_stub_fails_both_calls() {
        let publisher = StubPublisher::offline();

        assert!(!publisher.test_connection().await);
        assert!(publisher.publish(&sample_input()).await.is_err());
    }

    #[tokio::test]
    async fn test_configured_result() {
        let expected = PublishResult {
            external_id: "fixed-1".to_string(),
            url: None,
        };

        let publisher = StubPublisher::with_result(expected.clone());
        let result = publisher.publish(&sample_input()).await.unwrap();

        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_failing_stub_reports_message() {
        let publisher = StubPublisher::failing("synthetic outage");
        let err = publisher.publish(&sample_input()).await.unwrap_err();

        assert!(err.to_string().contains("synthetic outage"));
    }
}
