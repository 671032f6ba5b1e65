// src/main.rs
mod config;
mod extractors;
mod pipeline;
mod storage;
mod utils;
mod volby;

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use config::RunConfig;
use storage::StorageManager;
use utils::AppError;
use volby::client::DEFAULT_REQUEST_DELAY_MS;
use volby::models::DEFAULT_BASE_URL;
use volby::VolbyClient;

/// Downloads Czech election results for every voting district of one
/// territorial unit and writes them as a single CSV table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the district list page of a territorial unit
    #[arg(required_unless_present = "interactive")]
    url: Option<String>,

    /// Name of the output file, without the .csv extension
    #[arg(required_unless_present = "interactive")]
    output_name: Option<String>,

    /// Ask for the URL and output name instead of reading them from the command line
    #[arg(short, long, conflicts_with_all = ["url", "output_name"])]
    interactive: bool,

    /// Directory the CSV file is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Base URL that relative district links are resolved against
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Pause before each request, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_MS)]
    request_delay_ms: u64,

    /// Debug mode - save fetched pages and a manifest next to the output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn into_config(self) -> Result<RunConfig, AppError> {
        let (source_url, output_name) = match (self.url, self.output_name) {
            (Some(url), Some(name)) => (url, name),
            _ => {
                let stdin = io::stdin();
                config::prompt_source(&mut stdin.lock(), &mut io::stdout())?
            }
        };

        let config = RunConfig {
            source_url,
            output_name,
            output_dir: self.output_dir,
            base_url: self.base_url,
            request_delay: Duration::from_millis(self.request_delay_ms),
            debug: self.debug,
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments (exits with usage on a wrong argument count)
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(if args.debug { "debug" } else { "info" });
    tracing::debug!("Starting with args: {:?}", args);

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), AppError> {
    // 3. Build run configuration
    let config = args.into_config()?;

    // 4. Initialize client and storage
    let client = VolbyClient::new(config.request_delay)?;
    let storage = StorageManager::new(&config.output_dir);

    // 5. Scrape and write
    let summary = pipeline::run(&config, &client, &storage).await?;
    tracing::info!("Finished: {} districts written to {}", summary.rows, summary.output_path.display());

    Ok(())
}
