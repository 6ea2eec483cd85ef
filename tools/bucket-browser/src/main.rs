use anyhow::Result;
use bucket_browser::{run, Cli};
use clap::Parser;
use storage_api_client::{Environment, StorageApiClient};
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let environment = Environment::from_env()?;

    // Logs go to stderr so the command output stays pipeable
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let client = StorageApiClient::new(cli.client_config(&environment)?)?;
    debug!("Using storage API at {}", client.base_url());

    let output = run(&client, &cli.command, cli.json).await?;
    println!("{output}");

    Ok(())
}
