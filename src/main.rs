use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use livescore_detail::app::{App, EntityType, Target};
use livescore_detail::config::Config;
use livescore_detail::livescore::HttpDataSource;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(name = "livescore-detail")]
#[command(about = "Player and team detail pages for the livescore football API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/livescore-detail/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Kind of detail page
  #[arg(value_enum)]
  kind: EntityType,

  /// Player or team id
  id: String,

  /// Tab to open (defaults to the configured tab)
  #[arg(short, long)]
  tab: Option<String>,

  /// JSON file with data already known for this page
  #[arg(long)]
  initial: Option<PathBuf>,
}

fn configure_logging() -> Result<WorkerGuard> {
  use tracing_subscriber::prelude::*;

  let log_dir = Config::log_dir()?;
  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  // stdout carries the rendered views, so logs go to a file
  let file_appender = tracing_appender::rolling::never(&log_dir, "livescore-detail.log");
  let (writer, guard) = tracing_appender::non_blocking(file_appender);

  // Default to info level if RUST_LOG not set
  let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

  let fmt_layer = tracing_subscriber::fmt::layer()
    .with_writer(writer)
    .with_ansi(false)
    .with_target(false);

  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt_layer)
    .init();

  Ok(guard)
}

fn read_initial(path: &Path) -> Result<Value> {
  let contents = std::fs::read_to_string(path)
    .map_err(|e| eyre!("Failed to read initial data {}: {}", path.display(), e))?;
  serde_json::from_str(&contents)
    .map_err(|e| eyre!("Failed to parse initial data {}: {}", path.display(), e))
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let _guard = configure_logging()?;

  let source = Arc::new(HttpDataSource::new(&config.api, Config::get_api_key())?);
  let initial = args.initial.as_deref().map(read_initial).transpose()?;

  let target = Target {
    kind: args.kind,
    id: args.id,
    tab: args.tab,
    initial,
  };

  let mut app = App::new(&config, source, target)?;
  app.run().await?;

  Ok(())
}
