//! sisclap server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite registry, and serves the JSON API over HTTP. With `--en-memoria`
//! it serves the pre-seeded in-memory registry instead — handy for demos
//! and front-end development without a database file.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use sisclap_api::ServerConfig;
use sisclap_core::store::PadronStore;
use sisclap_store_mem::MemStore;
use sisclap_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Servidor del registro SISCLAP")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Serve the pre-seeded in-memory registry instead of SQLite.
  #[arg(long)]
  en_memoria: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SISCLAP"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if cli.en_memoria {
    tracing::info!("sirviendo el padrón de ejemplo en memoria");
    return servir(MemStore::precargado(), &server_cfg).await;
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  servir(store, &server_cfg).await
}

async fn servir<S>(store: S, cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: PadronStore + 'static,
{
  let app = sisclap_api::api_router(Arc::new(store));
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
