//! Publish command - send one article to a configured platform

use anyhow::{Context, Result, bail};
use postbridge_adapters::{StubPublisher, adapter_for};
use postbridge_domain::usecases::PublishUseCase;
use postbridge_domain::{PublishInput, PublisherAdapter};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::args::PublishArgs;
use crate::config::{AppConfig, PlatformsConfig};

pub async fn execute(args: PublishArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).unwrap_or_default();

    let html = read_html(&args)?;
    if html.trim().is_empty() {
        bail!("No HTML content provided");
    }

    let input = build_input(&args, html)?;
    let adapter = build_adapter(&args, &config)?;
    let usecase = PublishUseCase::new(Arc::from(adapter));

    tracing::info!(
        provider = usecase.provider(),
        title = %input.title,
        scheduled = input.is_scheduled(),
        "Publishing article"
    );

    let result = usecase.publish(&input).await?;

    if args.json {
        let payload = json!({
            "provider": usecase.provider(),
            "external_id": result.external_id,
            "url": result.url,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        if args.dry_run {
            println!("Dry run, nothing was sent to {}.", args.provider);
        }
        println!("Published via {}", usecase.provider());
        println!("  external_id: {}", result.external_id);
        if let Some(ref url) = result.url {
            println!("  url: {}", url);
        }
    }

    Ok(())
}

fn build_input(args: &PublishArgs, html: String) -> Result<PublishInput> {
    let mut input = PublishInput::new(args.title.clone(), html);
    input.excerpt = args.excerpt.clone();
    input.tags = args.tags.clone();
    input.image_url = args.image_url.clone();
    input.slug = args.slug.clone();

    if let Some(ref when) = args.when {
        let parsed = OffsetDateTime::parse(when, &Rfc3339)
            .with_context(|| format!("Invalid --when timestamp (expected RFC 3339): {}", when))?;
        input.when = Some(parsed);
    }

    Ok(input)
}

fn build_adapter(args: &PublishArgs, config: &AppConfig) -> Result<Box<dyn PublisherAdapter>> {
    if args.dry_run {
        // Validate the platform section and secrets, then swap in the stub
        // so the pipeline runs without touching the network.
        if args.provider != "stub" {
            let value = provider_config(&args.provider, &config.platforms)?;
            adapter_for(&args.provider, &value)?;
        }
        return Ok(Box::new(StubPublisher::ok()));
    }

    let value = provider_config(&args.provider, &config.platforms)?;
    Ok(adapter_for(&args.provider, &value)?)
}

/// Assemble the adapter config JSON for a provider, resolving secrets from
/// the environment variables the platform section names.
pub(crate) fn provider_config(
    provider: &str,
    platforms: &PlatformsConfig,
) -> Result<serde_json::Value> {
    let value = match provider {
        "wordpress" => {
            let section = require_section(&platforms.wordpress, "wordpress")?;
            let app_password = load_secret(&section.app_password_env, "wordpress")?;
            json!({
                "site_url": section.site_url,
                "username": section.username,
                "app_password": app_password.expose_secret(),
                "post_type": section.post_type,
            })
        }
        "wordpress_com" => {
            let section = require_section(&platforms.wordpress_com, "wordpress_com")?;
            let access_token = load_secret(&section.access_token_env, "wordpress_com")?;
            json!({
                "site_id": section.site_id,
                "access_token": access_token.expose_secret(),
            })
        }
        "webflow" => {
            let section = require_section(&platforms.webflow, "webflow")?;
            let api_token = load_secret(&section.api_token_env, "webflow")?;
            json!({
                "api_token": api_token.expose_secret(),
                "site_id": section.site_id,
                "collection_id": section.collection_id,
            })
        }
        "shopify" => {
            let section = require_section(&platforms.shopify, "shopify")?;
            let access_token = load_secret(&section.access_token_env, "shopify")?;
            json!({
                "store_domain": section.store_domain,
                "access_token": access_token.expose_secret(),
                "blog_id": section.blog_id,
                "api_version": section.api_version,
            })
        }
        "wix" => {
            let section = require_section(&platforms.wix, "wix")?;
            let access_token = load_secret(&section.access_token_env, "wix")?;
            json!({
                "access_token": access_token.expose_secret(),
            })
        }
        "notion" => {
            let section = require_section(&platforms.notion, "notion")?;
            let api_token = load_secret(&section.api_token_env, "notion")?;
            json!({
                "api_token": api_token.expose_secret(),
                "database_id": section.database_id,
            })
        }
        "framer" => {
            let section = require_section(&platforms.framer, "framer")?;
            let api_token = load_secret(&section.api_token_env, "framer")?;
            json!({
                "api_token": api_token.expose_secret(),
                "project_id": section.project_id,
                "collection_id": section.collection_id,
            })
        }
        "webhook" => {
            let section = require_section(&platforms.webhook, "webhook")?;
            let mut value = json!({
                "url": section.url,
                "headers": section.headers,
                "signing": section.signing,
            });
            if !section.secret_env.trim().is_empty() {
                let secret = load_secret(&section.secret_env, "webhook")?;
                value["secret"] = json!(secret.expose_secret());
            }
            value
        }
        // The stub needs no config; unknown names are reported by the factory
        _ => json!({}),
    };

    Ok(value)
}

fn require_section<'a, T>(section: &'a Option<T>, provider: &str) -> Result<&'a T> {
    section.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "Platform {} is not configured; add a [platforms.{}] section to the config",
            provider,
            provider
        )
    })
}

pub(crate) fn load_secret(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No secret env var configured for platform {}", provider);
    }

    let value = std::env::var(env_var).with_context(|| {
        format!(
            "Missing secret env var {} for platform {}",
            env_var, provider
        )
    })?;

    if value.trim().is_empty() {
        bail!(
            "Secret env var {} is empty for platform {}",
            env_var,
            provider
        );
    }

    Ok(SecretString::new(value.into()))
}

fn read_html(args: &PublishArgs) -> Result<String> {
    if let Some(ref path) = args.html {
        if path.as_os_str() == "-" {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .context("Failed to read from stdin")?;
            return Ok(html);
        }

        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }

    // Default to stdin if no input specified
    let mut html = String::new();
    io::stdin()
        .read_to_string(&mut html)
        .context("Failed to read from stdin")?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_requires_platform_section() {
        let platforms = PlatformsConfig::default();

        let err = provider_config("shopify", &platforms).unwrap_err();
        assert!(err.to_string().contains("[platforms.shopify]"));
    }

    #[test]
    fn test_stub_needs_no_section() {
        let platforms = PlatformsConfig::default();

        let value = provider_config("stub", &platforms).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_load_secret_rejects_empty_env_name() {
        let err = load_secret("", "webhook").unwrap_err();
        assert!(err.to_string().contains("webhook"));
    }

    #[test]
    fn test_load_secret_reports_missing_env_var() {
        let err = load_secret("POSTBRIDGE_TEST_UNSET_SECRET", "wix").unwrap_err();
        assert!(
            err.to_string()
                .contains("Missing secret env var POSTBRIDGE_TEST_UNSET_SECRET")
        );
    }
}
