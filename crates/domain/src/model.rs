//! Domain models and value objects

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// A platform-agnostic post ready for publishing
///
/// One instance describes one publish attempt; adapters never mutate it and
/// never keep it beyond the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishInput {
    /// Post title, mapped to each platform's name/title field
    pub title: String,
    /// Fully rendered HTML body
    pub html: String,
    /// Optional summary / meta description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Taxonomy terms or free-text tags; interpretation is platform-specific
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Remote URL of a featured/cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// URL slug; derived from the title when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Adapter-specific passthrough, unvalidated
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    /// Publish at this instant instead of immediately
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub when: Option<OffsetDateTime>,
}

impl PublishInput {
    /// Create an input with only the required fields set
    pub fn new(title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            html: html.into(),
            excerpt: None,
            tags: vec![],
            image_url: None,
            slug: None,
            metadata: Map::new(),
            when: None,
        }
    }

    /// The explicit slug, or one derived from the title
    pub fn slug_or_derived(&self) -> String {
        self.slug
            .clone()
            .unwrap_or_else(|| slugify(&self.title))
    }

    /// Whether the caller asked for a future publish date
    pub fn is_scheduled(&self) -> bool {
        self.when.is_some()
    }
}

/// Lowercase-and-hyphenate text into a URL slug
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
