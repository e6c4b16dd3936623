//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force, path } => init_config(force, path, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = &ctx.config.api;
    ctx.output.info("");
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &api.base_url);
    ctx.output.kv("endpoint", &api.endpoint);
    ctx.output.kv("query_param", &api.query_param);
    ctx.output.kv("page_param", &api.page_param);
    ctx.output.kv("page_size_param", &api.page_size_param);
    ctx.output.kv("timeout.connect_ms", &api.timeout.connect.as_millis().to_string());
    ctx.output.kv("timeout.total_ms", &api.timeout.total.as_millis().to_string());

    let session = &ctx.config.session;
    ctx.output.info("");
    ctx.output.info("[session]");
    ctx.output.kv("default_page_size", &session.default_page_size.to_string());
    ctx.output.kv(
        "max_page_size",
        &session
            .max_page_size
            .map(|max| max.to_string())
            .unwrap_or_else(|| "none".to_string()),
    );
    ctx.output.kv("debounce_ms", &session.debounce.as_millis().to_string());
    ctx.output.kv("fetch_timeout_ms", &session.fetch_timeout.as_millis().to_string());
    ctx.output.kv("abort_superseded", &session.abort_superseded.to_string());
    ctx.output.kv("fetch_on_start", &session.fetch_on_start.to_string());

    Ok(())
}

async fn init_config(force: bool, path: Option<String>, ctx: &Context) -> Result<()> {
    let config_path = match path {
        Some(path) => ctx.cwd.join(path),
        None => ctx.cwd.join(CONFIG_NAMES[0]),
    };

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let path_str = config_path.to_string_lossy();
    if path_str.ends_with(".json") {
        CliConfig::default().save(&path_str)?;
    } else {
        fs::write(&config_path, generate_default_config())?;
    }

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let problems = ctx.config.problems();
    if problems.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for problem in &problems {
        ctx.output.error(&format!("Error: {}", problem));
    }

    bail!("Configuration has {} error(s)", problems.len())
}
