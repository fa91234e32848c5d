use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use runboard::app::{handle_fatal_error, init_logging, AppConfig};
use runboard::server::TimelineApiServer;
use runboard::source::{JsonFileSource, RecordSource};
use runboard::timeline::{chart, Dimension, TimelineEngine};

/// Windowed test-run timelines for release dashboards
#[derive(Parser)]
#[command(name = "runboard")]
#[command(about = "Per-version test-run timelines with category backfill", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: ./runboard.toml if present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard API over HTTP
    Serve {
        /// Address to listen on (overrides listen_address)
        #[arg(long)]
        listen: Option<String>,

        /// Directory of dashboard assets (overrides static_dir)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the timeline as JSON
    Timeline {
        #[command(flatten)]
        input: InputArgs,

        /// Output shape
        #[arg(long, value_enum, default_value = "summary")]
        format: TimelineFormat,
    },
    /// Print the drill-down of one version as JSON
    Breakdown {
        #[command(flatten)]
        input: InputArgs,

        /// Version to break down
        #[arg(long)]
        build: String,

        /// Dimension to break down by
        #[arg(long, value_enum, default_value = "platform")]
        by: Dimension,
    },
}

/// Record selection shared by every command
#[derive(Args, Debug, Default)]
struct InputArgs {
    /// File of raw test-run documents (overrides records_path)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Only versions starting with this prefix (overrides release)
    #[arg(long)]
    release: Option<String>,

    /// Number of trailing versions to keep (overrides window_size)
    #[arg(long)]
    window: Option<usize>,
}

impl InputArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(records) = self.records {
            config.records_path = records;
        }
        if let Some(release) = self.release {
            config.release = release;
        }
        if let Some(window) = self.window {
            config.window_size = window;
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TimelineFormat {
    /// Full per-version summaries
    Summary,
    /// Passed/failed absolute series
    Abs,
    /// Passed/failed percentage series
    Rel,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match load_config(cli.config.as_deref()) {
        Ok(config) => {
            init_logging(&config, verbose);
            run(cli.command, config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        handle_fatal_error(e, verbose);
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    AppConfig::load(path).context("Failed to load configuration")
}

async fn run(command: Commands, mut config: AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            listen,
            static_dir,
            input,
        } => {
            input.apply(&mut config);
            if let Some(listen) = listen {
                config.listen_address = listen;
            }
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }
            config.validate()?;
            run_serve(config).await
        }
        Commands::Timeline { input, format } => {
            input.apply(&mut config);
            config.validate()?;
            run_timeline(&config, format).await
        }
        Commands::Breakdown { input, build, by } => {
            input.apply(&mut config);
            config.validate()?;
            run_breakdown(&config, &build, by).await
        }
    }
}

async fn run_serve(config: AppConfig) -> anyhow::Result<()> {
    let source: Arc<dyn RecordSource> = Arc::new(JsonFileSource::new(&config.records_path));
    let engine = TimelineEngine::new(config.window_size);

    TimelineApiServer::new(source, engine)
        .with_release(config.release.clone())
        .with_static_dir(config.static_dir.clone())
        .start(&config.listen_address)
        .await
}

async fn fetch_documents(config: &AppConfig) -> anyhow::Result<Vec<serde_json::Value>> {
    let source = JsonFileSource::new(&config.records_path);
    let documents = source.fetch(&config.release).await?;
    debug!(
        "Fetched {} documents from {}",
        documents.len(),
        config.records_path.display()
    );
    Ok(documents)
}

async fn run_timeline(config: &AppConfig, format: TimelineFormat) -> anyhow::Result<()> {
    let documents = fetch_documents(config).await?;
    let summaries = TimelineEngine::new(config.window_size).timeline(&documents)?;

    let output = match format {
        TimelineFormat::Summary => serde_json::to_string_pretty(&summaries)?,
        TimelineFormat::Abs => {
            serde_json::to_string_pretty(&chart::absolute_timeline(&summaries))?
        }
        TimelineFormat::Rel => {
            serde_json::to_string_pretty(&chart::relative_timeline(&summaries))?
        }
    };

    println!("{output}");
    Ok(())
}

async fn run_breakdown(config: &AppConfig, build: &str, by: Dimension) -> anyhow::Result<()> {
    let documents = fetch_documents(config).await?;
    let breakdown = TimelineEngine::new(config.window_size).breakdown(&documents, build, by)?;

    println!("{}", serde_json::to_string_pretty(&breakdown)?);
    Ok(())
}
