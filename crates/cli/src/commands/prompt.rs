//! Prompt command - emit content-generation prompts for a length tier

use anyhow::{Context, Result};
use postbridge_domain::prompts::{
    ArticleBrief, ContentLength, ContentLengthConfig, build_article_prompt, build_system_prompt,
};
use std::path::PathBuf;

use crate::args::PromptArgs;
use crate::config::AppConfig;

pub async fn execute(args: PromptArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).unwrap_or_default();

    let (length, test_mode) = resolve_length(&args, &config)?;
    let length_config = ContentLengthConfig::resolve(length, test_mode);

    let brief = ArticleBrief {
        topic: args.topic.clone(),
        primary_keyword: args.keyword.clone().unwrap_or_else(|| args.topic.clone()),
        secondary_keywords: args.secondary_keywords.clone(),
        audience: args.audience.clone(),
        image_urls: args.image_urls.clone(),
        video_urls: args.video_urls.clone(),
    };

    let system_prompt = build_system_prompt(&length_config);
    let article_prompt = build_article_prompt(&brief, &length_config, test_mode);

    if args.json {
        let payload = serde_json::json!({
            "length": length.to_string(),
            "test_mode": test_mode,
            "config": length_config,
            "system_prompt": system_prompt,
            "article_prompt": article_prompt,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "Length: {} ({} words, test_mode: {})",
            length,
            length_config.word_range(),
            test_mode
        );
        println!();
        println!("System Prompt");
        println!("=============");
        println!();
        println!("{}", system_prompt);
        println!();
        println!("Article Prompt");
        println!("==============");
        println!();
        println!("{}", article_prompt);
    }

    Ok(())
}

/// The --length flag wins over the configured default; --test-mode and the
/// configured test_mode are OR'd so either can force tiny articles.
fn resolve_length(args: &PromptArgs, config: &AppConfig) -> Result<(ContentLength, bool)> {
    let length = match args.length {
        Some(ref raw) => raw
            .parse::<ContentLength>()
            .map_err(|e| anyhow::anyhow!(e))?,
        None => config
            .content
            .default_length
            .parse::<ContentLength>()
            .map_err(anyhow::Error::msg)
            .context("Invalid default_length in config")?,
    };

    Ok((length, args.test_mode || config.content.test_mode))
}
