//! Content-length configuration and prompt assembly
//!
//! Pure functions only: a lookup table mapping a length tier (plus a
//! test-mode override) to word-count and structure targets, and two
//! builders that compose those targets into LLM instruction strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target length tier for generated articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl FromStr for ContentLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(format!("unknown content length: {other}")),
        }
    }
}

impl fmt::Display for ContentLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        };
        f.write_str(name)
    }
}

/// Structure targets for one article
///
/// Counts that only ever feed prose instructions ("write 5-6 H2 sections")
/// are kept as display strings; word bounds stay numeric so callers can do
/// arithmetic on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentLengthConfig {
    /// Lower word bound for the article body
    pub min_words: u32,
    /// Upper word bound for the article body
    pub max_words: u32,
    /// H2 section count, e.g. "5-6"
    pub h2_sections: &'static str,
    /// Concrete example count, e.g. "2-3"
    pub examples: &'static str,
    /// Comparison table count, e.g. "1-2"
    pub tables: &'static str,
    /// FAQ entry count, e.g. "4-5"
    pub faq_items: &'static str,
    /// Target introduction length in words
    pub intro_words: u32,
    /// Target conclusion length in words
    pub conclusion_words: u32,
}

impl ContentLengthConfig {
    /// Resolve the structure targets for a tier.
    ///
    /// `test_mode` takes precedence: when set, the test bounds are returned
    /// regardless of `length`.
    pub fn resolve(length: ContentLength, test_mode: bool) -> Self {
        if test_mode {
            return Self {
                min_words: 200,
                max_words: 300,
                h2_sections: "2-3",
                examples: "1",
                tables: "1",
                faq_items: "2",
                intro_words: 50,
                conclusion_words: 50,
            };
        }

        match length {
            ContentLength::Short => Self {
                min_words: 1000,
                max_words: 1500,
                h2_sections: "4-5",
                examples: "1-2",
                tables: "1",
                faq_items: "3-4",
                intro_words: 100,
                conclusion_words: 100,
            },
            ContentLength::Medium => Self {
                min_words: 2000,
                max_words: 3000,
                h2_sections: "5-6",
                examples: "2-3",
                tables: "1-2",
                faq_items: "4-5",
                intro_words: 150,
                conclusion_words: 150,
            },
            ContentLength::Long => Self {
                min_words: 3800,
                max_words: 4200,
                h2_sections: "6-8",
                examples: "3-4",
                tables: "2-3",
                faq_items: "5-6",
                intro_words: 200,
                conclusion_words: 200,
            },
        }
    }

    /// Word range as a display string, e.g. "2000-3000"
    pub fn word_range(&self) -> String {
        format!("{}-{}", self.min_words, self.max_words)
    }
}

/// Inputs for one article generation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleBrief {
    /// What the article is about
    pub topic: String,
    /// Keyword the article must rank for
    pub primary_keyword: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// Images to place inside the article body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    /// Videos to embed inside the article body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub video_urls: Vec<String>,
}

/// Build the system prompt for the article writer
pub fn build_system_prompt(config: &ContentLengthConfig) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are an expert SEO content writer. You produce publish-ready HTML articles.\n\n",
    );

    prompt.push_str("## Structure Rules\n");
    prompt.push_str(&format!("- Total length: {} words\n", config.word_range()));
    prompt.push_str(&format!("- H2 sections: {}\n", config.h2_sections));
    prompt.push_str(&format!("- Concrete examples: {}\n", config.examples));
    prompt.push_str(&format!("- Comparison tables: {}\n", config.tables));
    prompt.push_str(&format!("- FAQ entries: {}\n", config.faq_items));
    prompt.push_str(&format!(
        "- Introduction: about {} words\n",
        config.intro_words
    ));
    prompt.push_str(&format!(
        "- Conclusion: about {} words\n\n",
        config.conclusion_words
    ));

    prompt.push_str(
        r#"## Output Format
Respond with ONLY the article HTML:
- Start with a single <h1> title
- Use <h2> for sections and <h3> for subsections
- Wrap prose in <p>, lists in <ul> or <ol>
- Put the FAQ in its own <h2> section at the end, one <h3> per question
- No markdown, no code fences, no commentary before or after the HTML
"#,
    );

    prompt
}

/// Build the per-article user prompt
pub fn build_article_prompt(
    brief: &ArticleBrief,
    config: &ContentLengthConfig,
    test_mode: bool,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("Write an article about: {}\n\n", brief.topic));

    prompt.push_str("## Keywords\n");
    prompt.push_str(&format!("Primary: {}\n", brief.primary_keyword));
    if !brief.secondary_keywords.is_empty() {
        prompt.push_str(&format!(
            "Secondary: {}\n",
            brief.secondary_keywords.join(", ")
        ));
    }
    prompt.push('\n');

    if let Some(audience) = &brief.audience {
        prompt.push_str(&format!("## Audience\n{}\n\n", audience));
    }

    prompt.push_str("## Length\n");
    prompt.push_str(&format!(
        "Write {} words. Stay inside this range; do not stop early and do not pad.\n\n",
        config.word_range()
    ));

    if !brief.image_urls.is_empty() {
        prompt.push_str("## Images\n");
        prompt.push_str(
            "Place each image at a natural point in the article, as an <img> tag with a descriptive alt attribute:\n",
        );
        for url in &brief.image_urls {
            prompt.push_str(&format!("- {}\n", url));
        }
        prompt.push('\n');
    }

    if !brief.video_urls.is_empty() {
        prompt.push_str("## Videos\n");
        prompt.push_str("Embed each video once, inside a <figure> with an <iframe>:\n");
        for url in &brief.video_urls {
            prompt.push_str(&format!("- {}\n", url));
        }
        prompt.push('\n');
    }

    if test_mode {
        prompt.push_str(
            "## Test Mode\nThis is a pipeline test run. Keep the article minimal and fast to produce; content quality is not being evaluated.\n",
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_brief() -> ArticleBrief {
        ArticleBrief {
            topic: "Choosing a CRM".to_string(),
            primary_keyword: "best crm".to_string(),
            secondary_keywords: vec!["crm pricing".to_string()],
            audience: Some("small business owners".to_string()),
            image_urls: vec![],
            video_urls: vec![],
        }
    }

    #[test]
    fn test_long_tier_bounds() {
        let config = ContentLengthConfig::resolve(ContentLength::Long, false);
        assert_eq!(config.min_words, 3800);
        assert_eq!(config.max_words, 4200);
        assert_eq!(config.h2_sections, "6-8");
    }

    #[test]
    fn test_test_mode_overrides_tier() {
        let config = ContentLengthConfig::resolve(ContentLength::Short, true);
        assert_eq!(config.min_words, 200);
        assert_eq!(config.max_words, 300);
        assert_eq!(
            config,
            ContentLengthConfig::resolve(ContentLength::Long, true)
        );
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let a = ContentLengthConfig::resolve(ContentLength::Medium, false);
        let b = ContentLengthConfig::resolve(ContentLength::Medium, false);
        assert_eq!(a, b);
        assert_eq!(a.word_range(), "2000-3000");
    }

    #[test]
    fn test_parse_content_length() {
        assert_eq!(
            "long".parse::<ContentLength>().unwrap(),
            ContentLength::Long
        );
        let err = "epic".parse::<ContentLength>().unwrap_err();
        assert!(err.contains("epic"));
    }

    #[test]
    fn test_article_prompt_omits_absent_fragments() {
        let config = ContentLengthConfig::resolve(ContentLength::Medium, false);
        let prompt = build_article_prompt(&sample_brief(), &config, false);

        assert!(prompt.contains("best crm"));
        assert!(prompt.contains("crm pricing"));
        assert!(prompt.contains("small business owners"));
        assert!(prompt.contains("2000-3000"));
        assert!(!prompt.contains("## Images"));
        assert!(!prompt.contains("## Videos"));
        assert!(!prompt.contains("Test Mode"));
    }

    #[test]
    fn test_article_prompt_includes_media_fragments() {
        let mut brief = sample_brief();
        brief
            .image_urls
            .push("https://cdn.example.com/a.webp".to_string());
        brief.video_urls.push("https://youtu.be/xyz".to_string());

        let config = ContentLengthConfig::resolve(ContentLength::Short, true);
        let prompt = build_article_prompt(&brief, &config, true);

        assert!(prompt.contains("## Images"));
        assert!(prompt.contains("https://cdn.example.com/a.webp"));
        assert!(prompt.contains("## Videos"));
        assert!(prompt.contains("https://youtu.be/xyz"));
        assert!(prompt.contains("Test Mode"));
        assert!(prompt.contains("200-300"));
    }

    #[test]
    fn test_system_prompt_reflects_config() {
        let config = ContentLengthConfig::resolve(ContentLength::Long, false);
        let prompt = build_system_prompt(&config);

        assert!(prompt.contains("3800-4200"));
        assert!(prompt.contains("6-8"));
    }
}
