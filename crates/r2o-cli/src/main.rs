use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use r2o_cli::{cli::Cli, config::CliConfig, run};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG directives take precedence over the flag
    let env_filter = EnvFilter::builder()
        .with_default_directive(cli.level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration with CLI overrides
    let config = CliConfig::load(
        cli.config,
        cli.output,
        cli.daily_dir,
        cli.sanitize_anchors,
    )?;
    if tracing::enabled!(Level::DEBUG) {
        debug!("Effective configuration:\n{}", config.display_as_toml()?);
    }

    run::execute(&cli.input, &config, cli.quiet)?;
    Ok(())
}
