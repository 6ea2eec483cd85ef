//! Command-line browser for the storage viewer API

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use storage_api_client::{ClientConfig, Environment, StorageApi};

/// Browse buckets and images through the storage viewer API
#[derive(Debug, Parser)]
#[command(name = "bucket-browser", version)]
pub struct Cli {
    /// Storage API base URL, overrides `STORAGE_API_URL`
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print the raw JSON payload
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List buckets
    Buckets,
    /// List images in a bucket
    Images {
        bucket: String,
        /// Only list blobs starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Show an image with a signed URL
    Image {
        bucket: String,
        blob: String,
        #[arg(long)]
        expiration_minutes: Option<u32>,
    },
    /// Print a signed URL for a blob
    Sign {
        bucket: String,
        blob: String,
        #[arg(long)]
        expiration_minutes: Option<u32>,
    },
    /// Check the service health
    Health,
}

impl Cli {
    /// Client configuration, with `--base-url` taking precedence over the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL can be resolved
    pub fn client_config(&self, environment: &Environment) -> Result<ClientConfig> {
        let config = match &self.base_url {
            Some(base_url) => ClientConfig::new(base_url.clone())
                .with_request_timeout(environment.request_timeout()),
            None => environment
                .client_config()
                .context("Failed to resolve the storage API URL")?,
        };

        Ok(config)
    }
}

fn render<T, F>(value: &T, json: bool, text: F) -> Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

/// Executes `command` against `api` and returns what should be printed
///
/// # Errors
///
/// Returns an error if the storage API call fails
pub async fn run(api: &dyn StorageApi, command: &Command, json: bool) -> Result<String> {
    match command {
        Command::Buckets => {
            let buckets = api.list_buckets().await.context("Failed to list buckets")?;
            render(&buckets, json, |buckets| {
                buckets
                    .iter()
                    .map(|b| format!("{}\t{}", b.name, b.location))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Images { bucket, prefix } => {
            let images = api
                .list_images(bucket, prefix.as_deref())
                .await
                .with_context(|| format!("Failed to list images in {bucket}"))?;
            render(&images, json, |images| {
                images
                    .iter()
                    .map(|image| {
                        format!(
                            "{}\t{}\t{}",
                            image.name,
                            image.size,
                            image.content_type.as_deref().unwrap_or("-")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Image {
            bucket,
            blob,
            expiration_minutes,
        } => {
            let image = api
                .get_image_signed_url(bucket, blob, *expiration_minutes)
                .await
                .with_context(|| format!("Failed to fetch {bucket}/{blob}"))?;
            render(&image, json, |image| {
                format!("{} ({} bytes)\n{}", image.name, image.size, image.signed_url)
            })
        }
        Command::Sign {
            bucket,
            blob,
            expiration_minutes,
        } => {
            let url = api
                .generate_signed_url(bucket, blob, *expiration_minutes)
                .await
                .with_context(|| format!("Failed to sign {bucket}/{blob}"))?;
            render(&url, json, String::clone)
        }
        Command::Health => {
            let health = api.health().await.context("Health check failed")?;
            render(&health, json, |health| health.status.clone())
        }
    }
}
