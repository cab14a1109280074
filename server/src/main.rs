use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tinysearch::{Engine, EngineConfig, SledDocumentStore};
use tracing_subscriber::{fmt, EnvFilter};
use tinysearch_server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Index directory path (defaults to $INDEX_DIR_PATH, then ./_index_data)
    #[arg(long)]
    index_dir: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = match args.index_dir {
        Some(dir) => EngineConfig::new(dir),
        None => EngineConfig::from_env()?,
    };
    let store = SledDocumentStore::open(&config.doc_store_dir)?;
    let app: Router = build_app(Engine::new(config, store));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
