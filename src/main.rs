use anyhow::Result;
use clap::Parser;
use std::num::{NonZeroU32, NonZeroU64};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walrus_json_uploader::app::App;
use walrus_json_uploader::models::Config;

#[derive(Debug, Parser)]
#[command(name = "walrus-json-uploader")]
#[command(about = "Upload a JSON file to a Walrus publisher")]
struct CliArgs {
    /// Path to the local JSON file.
    #[arg(value_name = "FILE", default_value = "my_data.json")]
    file: PathBuf,

    /// Publisher base URL (overrides WALRUS_PUBLISHER_URL).
    #[arg(long)]
    publisher: Option<String>,

    /// Aggregator base URL used for viewer links (overrides WALRUS_AGGREGATOR_URL).
    #[arg(long)]
    aggregator: Option<String>,

    /// Number of storage epochs (overrides WALRUS_EPOCHS).
    #[arg(long)]
    epochs: Option<NonZeroU32>,

    /// HTTP timeout in seconds (overrides WALRUS_TIMEOUT_SECS).
    #[arg(long)]
    timeout_secs: Option<NonZeroU64>,

    /// Write a sample JSON document first if FILE does not exist.
    #[arg(long)]
    create_sample: bool,
}

impl CliArgs {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(publisher) = &self.publisher {
            config.publisher_url = publisher.clone();
        }
        if let Some(aggregator) = &self.aggregator {
            config.aggregator_url = aggregator.clone();
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs.get());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walrus_json_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = args.apply(Config::from_env()?);

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize uploader: {}", e);
            std::process::exit(1);
        }
    };

    tokio::select! {
        result = app.run(&args.file, args.create_sample) => match result {
            Ok(report) => {
                println!("{}", report);
                info!("Upload completed successfully");
                Ok(())
            }
            Err(e) => {
                error!("Upload failed ({:?}): {}", e.kind(), e);
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; upload cancelled");
            std::process::exit(130);
        }
    }
}
