// ChatSheet: load CSV files into SQLite and query them in plain language
//
// This is the main entry point for the ChatSheet application.

use anyhow::{Context, Result};
use chat_sheet::cli::Repl;
use chat_sheet::config::{AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = Config::load().context("failed to load configuration")?;
    let state = AppState::open(config)
        .await
        .context("failed to open the store")?;

    let mut repl = Repl::new(state)?;
    repl.run().await?;

    repl.into_state().close().await;
    Ok(())
}
