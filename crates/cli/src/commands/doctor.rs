//! Doctor command - validate configuration and check platform connectivity

use anyhow::Result;
use postbridge_adapters::adapter_for;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::commands::publish::provider_config;
use crate::config::{AppConfig, PlatformsConfig};

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    platforms: Vec<PlatformCheck>,
    overall: String,
}

#[derive(Debug, Serialize)]
struct PlatformCheck {
    provider: String,
    status: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        platforms: vec![],
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    // Check every configured platform concurrently
    if let Some(ref config) = config {
        let providers = configured_providers(&config.platforms);
        let checks = providers
            .iter()
            .map(|provider| check_platform(provider, &config.platforms));
        report.platforms = futures::future::join_all(checks).await;
    }

    // Determine overall status
    let has_error = report.config.status == "error"
        || report.platforms.iter().any(|c| c.status == "error");
    let has_warn =
        report.platforms.is_empty() || report.platforms.iter().any(|c| c.status == "warn");

    report.overall = if has_error {
        "error".to_string()
    } else if has_warn {
        "warn".to_string()
    } else {
        "ok".to_string()
    };

    // Output report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn configured_providers(platforms: &PlatformsConfig) -> Vec<&'static str> {
    let mut providers = Vec::new();
    if platforms.wordpress.is_some() {
        providers.push("wordpress");
    }
    if platforms.wordpress_com.is_some() {
        providers.push("wordpress_com");
    }
    if platforms.webflow.is_some() {
        providers.push("webflow");
    }
    if platforms.shopify.is_some() {
        providers.push("shopify");
    }
    if platforms.wix.is_some() {
        providers.push("wix");
    }
    if platforms.notion.is_some() {
        providers.push("notion");
    }
    if platforms.framer.is_some() {
        providers.push("framer");
    }
    if platforms.webhook.is_some() {
        providers.push("webhook");
    }
    providers
}

async fn check_platform(provider: &str, platforms: &PlatformsConfig) -> PlatformCheck {
    // A missing secret is a setup gap, not a broken platform
    let value = match provider_config(provider, platforms) {
        Ok(value) => value,
        Err(e) => {
            return PlatformCheck {
                provider: provider.to_string(),
                status: "warn".to_string(),
                message: format!("{:#}", e),
            };
        }
    };

    let adapter = match adapter_for(provider, &value) {
        Ok(adapter) => adapter,
        Err(e) => {
            return PlatformCheck {
                provider: provider.to_string(),
                status: "error".to_string(),
                message: e.to_string(),
            };
        }
    };

    if adapter.test_connection().await {
        PlatformCheck {
            provider: provider.to_string(),
            status: "ok".to_string(),
            message: "Connection verified".to_string(),
        }
    } else {
        PlatformCheck {
            provider: provider.to_string(),
            status: "error".to_string(),
            message: "Connection check failed".to_string(),
        }
    }
}

fn print_report(report: &DoctorReport) {
    println!("postbridge Doctor Report");
    println!("========================");
    println!();

    print_check("Config", &report.config.status, &report.config.message);

    if report.platforms.is_empty() {
        println!("⚠ Platforms: none configured");
    } else {
        for check in &report.platforms {
            print_check(&check.provider, &check.status, &check.message);
        }
    }

    println!();
    let symbol = status_symbol(&report.overall);
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to publish! Try: postbridge publish --provider stub --title \"Test\"");
    }
}

fn print_check(name: &str, status: &str, message: &str) {
    println!("{} {}: {}", status_symbol(status), name, message);
}

fn status_symbol(status: &str) -> &'static str {
    match status {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    }
}
