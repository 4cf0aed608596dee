//! cadre CLI Entry Point
//!
//! No flags or subcommands; all interaction happens through the menu loop.
//! Tables and confirmations go to stdout, logs to stderr.

use anyhow::anyhow;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cadre::store::Store;
use cadre::{config, menu};

/// cadre - Interactive Org-Chart CLI
#[derive(Parser)]
#[command(name = "cadre")]
#[command(about = "Manage departments, roles, and employees from an interactive menu")]
#[command(version)]
struct Cli {}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing().ok();
    let _cli = Cli::parse();

    let config = config::load()?;
    let store = Store::connect(&config)?;

    // Bootstrap failures are logged, not fatal: the menu always comes up and
    // individual actions surface their own errors until the database is
    // reachable.
    if let Err(err) = store.ensure_schema().await {
        error!("{err}");
    }

    menu::run(&store).await?;
    store.disconnect().await?;

    Ok(())
}
