//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// postbridge: publish articles to WordPress, Webflow, Shopify and other platforms
#[derive(Parser, Debug)]
#[command(name = "postbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish one article to a configured platform
    Publish(PublishArgs),

    /// Emit the content-generation prompts for a length tier
    Prompt(PromptArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and check platform connectivity
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Platform to publish to (wordpress, wordpress_com, webflow, shopify, wix, notion, framer, webhook, stub)
    #[arg(long)]
    pub provider: String,

    /// Post title
    #[arg(long)]
    pub title: String,

    /// File containing the HTML body (use - for stdin)
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Optional summary / meta description
    #[arg(long)]
    pub excerpt: Option<String>,

    /// Tag to attach (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Remote URL of a featured image
    #[arg(long)]
    pub image_url: Option<String>,

    /// URL slug (derived from the title when omitted)
    #[arg(long)]
    pub slug: Option<String>,

    /// Schedule publication for a future time (RFC 3339)
    #[arg(long)]
    pub when: Option<String>,

    /// Validate config and run the pipeline without contacting the platform
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Length tier (short, medium, long); defaults to the configured tier
    #[arg(long)]
    pub length: Option<String>,

    /// Generate a tiny throwaway article for pipeline testing
    #[arg(long)]
    pub test_mode: bool,

    /// What the article is about
    #[arg(long)]
    pub topic: String,

    /// Primary keyword (defaults to the topic)
    #[arg(long)]
    pub keyword: Option<String>,

    /// Secondary keyword (repeatable)
    #[arg(long = "secondary-keyword")]
    pub secondary_keywords: Vec<String>,

    /// Intended audience
    #[arg(long)]
    pub audience: Option<String>,

    /// Image URL to weave into the body (repeatable)
    #[arg(long = "image-url")]
    pub image_urls: Vec<String>,

    /// Video URL to embed in the body (repeatable)
    #[arg(long = "video-url")]
    pub video_urls: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
