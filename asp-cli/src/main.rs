use anyhow::Context;
use asp_cli::Cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "asp_cli=info,asp_catalog=info,asp_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = asp_store::Config::load_from(&cli.config_dir, asp_store::app_config::ENV_PREFIX)
        .with_context(|| format!("failed to load config from {}", cli.config_dir.display()))?;
    if let Some(dataset) = &cli.dataset {
        config.dataset.path = dataset.clone();
    }
    tracing::info!("Using dataset {}", config.dataset.path.display());

    let engine = asp_store::build_engine(&config).context("failed to load dataset")?;
    let output = asp_cli::run(&engine, &cli.command)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
