mod batch;
mod cli;
mod config;
mod download;
mod maps;
mod table;

#[cfg(test)]
mod test_server;

use anyhow::{Error, Result};
use cli::{command, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse_with_dotenv();
    let settings = cli.settings();

    if let Err(e) = command::fetch(cli.api_key.clone(), &settings).await {
        eprintln!("Error: {}", e);
    }

    Ok(())
}
