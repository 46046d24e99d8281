//! Keybox Check

use clap::Parser as _;
use color_eyre::eyre::WrapErr as _;
use keybox_check::render::{render_json, render_report};
use keybox_check::{Cli, Config};

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(cli.env_filter())
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.apply(Config::load(cli.config.as_deref()).wrap_err("failed to load config")?);
    tracing::debug!(?config, "configuration loaded");

    let report = keybox_check::run(&cli, &config).await?;

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        render_json(&mut stdout, &report)?;
    } else {
        render_report(&mut stdout, &report)?;
    }

    Ok(())
}
