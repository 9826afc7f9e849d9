//! Publishing use case - capability gating in front of a platform adapter

use std::sync::Arc;

use crate::model::PublishInput;
use crate::ports::{PublishError, PublishResult, PublisherAdapter};

/// Publishes posts through one platform adapter.
///
/// Platforms differ in which optional [`PublishInput`] fields they accept.
/// Before delegating, the use case drops any field the adapter cannot honor
/// and logs a warning, so unsupported fields never reach a platform request.
pub struct PublishUseCase {
    adapter: Arc<dyn PublisherAdapter>,
}

impl PublishUseCase {
    pub fn new(adapter: Arc<dyn PublisherAdapter>) -> Self {
        Self { adapter }
    }

    /// Platform name of the underlying adapter
    pub fn provider(&self) -> &'static str {
        self.adapter.provider()
    }

    /// Publish a post after gating it on the adapter's capabilities
    pub async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError> {
        let gated = self.gate(input);
        self.adapter.publish(&gated).await
    }

    fn gate(&self, input: &PublishInput) -> PublishInput {
        let mut gated = input.clone();
        let provider = self.adapter.provider();

        if gated.when.is_some() && !self.adapter.supports_scheduling() {
            tracing::warn!(
                provider = provider,
                "Platform does not support scheduling, publishing immediately"
            );
            gated.when = None;
        }

        if gated.image_url.is_some() && !self.adapter.supports_images() {
            tracing::warn!(
                provider = provider,
                "Platform does not support featured images, dropping image"
            );
            gated.image_url = None;
        }

        if !gated.tags.is_empty() && !self.adapter.supports_tags() {
            tracing::warn!(
                provider = provider,
                "Platform does not support tags, dropping them"
            );
            gated.tags.clear();
        }

        gated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    struct RecordingAdapter {
        seen: Mutex<Option<PublishInput>>,
        scheduling: bool,
        images: bool,
        tags: bool,
    }

    impl RecordingAdapter {
        fn new(scheduling: bool, images: bool, tags: bool) -> Self {
            Self {
                seen: Mutex::new(None),
                scheduling,
                images,
                tags,
            }
        }
    }

    #[async_trait]
    impl PublisherAdapter for RecordingAdapter {
        async fn test_connection(&self) -> bool {
            true
        }

        async fn publish(&self, input: &PublishInput) -> Result<PublishResult, PublishError> {
            *self.seen.lock().unwrap() = Some(input.clone());
            Ok(PublishResult {
                external_id: "recorded-1".to_string(),
                url: None,
            })
        }

        fn provider(&self) -> &'static str {
            "recording"
        }

        fn supports_scheduling(&self) -> bool {
            self.scheduling
        }

        fn supports_images(&self) -> bool {
            self.images
        }

        fn supports_tags(&self) -> bool {
            self.tags
        }
    }

    fn full_input() -> PublishInput {
        let mut input = PublishInput::new("A Title", "<p>body</p>");
        input.tags = vec!["crm".to_string(), "sales".to_string()];
        input.image_url = Some("https://cdn.example.com/banner.webp".to_string());
        input.when = Some(OffsetDateTime::parse("2026-02-01T08:00:00Z", &Rfc3339).unwrap());
        input
    }

    #[tokio::test]
    async fn test_drops_fields_the_platform_cannot_honor() {
        let adapter = Arc::new(RecordingAdapter::new(false, false, false));
        let usecase = PublishUseCase::new(adapter.clone());

        let result = usecase.publish(&full_input()).await.unwrap();
        assert_eq!(result.external_id, "recorded-1");

        let seen = adapter.seen.lock().unwrap().clone().unwrap();
        assert!(seen.when.is_none());
        assert!(seen.image_url.is_none());
        assert!(seen.tags.is_empty());
        assert_eq!(seen.title, "A Title");
        assert_eq!(seen.html, "<p>body</p>");
    }

    #[tokio::test]
    async fn test_passes_supported_fields_through() {
        let adapter = Arc::new(RecordingAdapter::new(true, true, true));
        let usecase = PublishUseCase::new(adapter.clone());

        usecase.publish(&full_input()).await.unwrap();

        let seen = adapter.seen.lock().unwrap().clone().unwrap();
        assert!(seen.when.is_some());
        assert_eq!(
            seen.image_url.as_deref(),
            Some("https://cdn.example.com/banner.webp")
        );
        assert_eq!(seen.tags, vec!["crm".to_string(), "sales".to_string()]);
    }

    #[tokio::test]
    async fn test_gates_independently_per_capability() {
        let adapter = Arc::new(RecordingAdapter::new(true, false, true));
        let usecase = PublishUseCase::new(adapter.clone());

        usecase.publish(&full_input()).await.unwrap();

        let seen = adapter.seen.lock().unwrap().clone().unwrap();
        assert!(seen.when.is_some());
        assert!(seen.image_url.is_none());
        assert_eq!(seen.tags.len(), 2);
    }
}
