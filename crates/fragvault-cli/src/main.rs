//! fragvault: secret-protected fragmented file vault CLI
//!
//! Commands:
//!   upload <path>      - fragment, encrypt, and store a file
//!   download <file-id> - verify the secret, fetch and reassemble a file
//!
//! S3 credentials are read from AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY;
//! the secret comes from --secret or FRAGVAULT_SECRET.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use fragvault_core::config::VaultConfig;
use fragvault_engine::{download, upload, DownloadRequest, UploadRequest};
use fragvault_storage::{build_operator, JsonCatalog, OpendalStore};

#[derive(Parser, Debug)]
#[command(name = "fragvault", version, about = "Secret-protected fragmented file vault")]
struct Cli {
    /// Path to fragvault.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "FRAGVAULT_CONFIG",
        default_value = "fragvault.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FRAGVAULT_LOG", default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fragment, encrypt, and store a local file
    Upload {
        /// File to upload
        path: PathBuf,
        /// Name stored on the catalog record (default: file name)
        #[arg(long)]
        name: Option<String>,
        /// Owner recorded on the catalog record
        #[arg(long, default_value = "local")]
        owner: String,
        /// Secret protecting the file
        #[arg(long, env = "FRAGVAULT_SECRET", hide_env_values = true)]
        secret: String,
    },

    /// Fetch, decrypt, and reassemble a stored file
    Download {
        /// File id printed at upload time
        file_id: String,
        /// Output path for the reconstructed file
        #[arg(long, short = 'o')]
        output: PathBuf,
        /// Secret protecting the file
        #[arg(long, env = "FRAGVAULT_SECRET", hide_env_values = true)]
        secret: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let config = VaultConfig::load(&cli.config)?;

    let access_key = std::env::var("AWS_ACCESS_KEY_ID")
        .context("S3 credentials not set: export AWS_ACCESS_KEY_ID")?;
    let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
        .context("AWS_SECRET_ACCESS_KEY not set")?;

    let op = build_operator(&config.storage, &access_key, &secret_key)
        .context("building storage operator")?;
    let store = Arc::new(OpendalStore::new(op, config.storage.prefix.clone()));
    let catalog = JsonCatalog::open(&config.catalog.path)
        .with_context(|| format!("opening catalog {}", config.catalog.path.display()))?;

    match cli.command {
        Commands::Upload {
            path,
            name,
            owner,
            secret,
        } => {
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let name = name.unwrap_or_else(|| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "unnamed".into())
            });

            let receipt = upload(
                store,
                &catalog,
                &config,
                UploadRequest {
                    name,
                    owner_id: owner,
                    data,
                    secret: SecretString::from(secret),
                },
            )
            .await
            .map_err(|e| anyhow::anyhow!("{}", e.public_message()))?;

            info!(
                file_id = %receipt.file_id,
                fragments = receipt.fragment_count,
                bytes = receipt.total_size,
                "uploaded"
            );
            println!("{}", receipt.file_id);
            for reference in &receipt.fragment_refs {
                println!("  {reference}");
            }
        }

        Commands::Download {
            file_id,
            output,
            secret,
        } => {
            let data = download(
                store,
                &catalog,
                &config,
                DownloadRequest {
                    file_id,
                    secret: SecretString::from(secret),
                },
            )
            .await
            .map_err(|e| anyhow::anyhow!("{}", e.public_message()))?;

            tokio::fs::write(&output, &data)
                .await
                .with_context(|| format!("writing {}", output.display()))?;
            info!(bytes = data.len(), output = %output.display(), "downloaded");
            println!("{}", output.display());
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
