use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use clap::builder::RangedU64ValueParser;
use tinysearch::{DocumentStore, Engine, EngineConfig, IndexWriter, SearchResults, SledDocumentStore};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tinysearch")]
#[command(version, about = "Simple and small search engine", long_about = None)]
struct Cli {
    /// Index directory (defaults to $INDEX_DIR_PATH, then ./_index_data)
    #[arg(long, global = true)]
    index_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the index from every .txt file under a directory
    Create {
        /// Directory to scan for documents
        path: PathBuf,
    },
    /// Search the index; every query term must match
    Search {
        query: String,
        /// Number of results to show
        #[arg(short = 'n', long, default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        number: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let config = match cli.index_dir {
        Some(dir) => EngineConfig::new(dir),
        None => EngineConfig::from_env().context("resolving index directory")?,
    };

    match cli.command {
        Commands::Create { path } => create_index(config, &path),
        Commands::Search { query, number } => search(config, &query, number),
    }
}

fn create_index(config: EngineConfig, input: &Path) -> Result<()> {
    ensure_outside_index(input, &config.index_dir)?;

    // every build starts from an empty index: drop what an earlier build left
    IndexWriter::new(&config.index_dir).clear()?;
    let store = SledDocumentStore::open(&config.doc_store_dir)?;
    store.clear()?;
    let mut engine = Engine::new(config, store);

    let files = fetch_files(input);
    let mut added = 0usize;
    for file in &files {
        match add_file(&mut engine, file) {
            Ok(()) => added += 1,
            Err(error) => tracing::warn!(file = %file.display(), error = ?error, "failed to add file to index"),
        }
    }
    tracing::info!(added, failed = files.len() - added, "ingested documents");

    engine.flush()?;
    engine.store().flush()?;
    tracing::info!(dir = %engine.config().index_dir.display(), "index build complete");
    Ok(())
}

/// Refuse to index a directory that lies inside the index directory.
fn ensure_outside_index(input: &Path, index_dir: &Path) -> Result<()> {
    if !index_dir.exists() {
        return Ok(());
    }
    let input = input
        .canonicalize()
        .with_context(|| format!("resolving input directory {}", input.display()))?;
    let index_dir = index_dir.canonicalize()?;
    if input.starts_with(&index_dir) {
        bail!(
            "input {} is inside the index directory {}; choose another --index-dir",
            input.display(),
            index_dir.display()
        );
    }
    Ok(())
}

/// All `.txt` files under `dir`, in a stable order.
fn fetch_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect()
}

fn add_file<S: DocumentStore>(engine: &mut Engine<S>, file: &Path) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let title = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let doc_id = engine.add_document(&title, f)?;
    tracing::info!(doc_id, title = %title, "add document to index");
    Ok(())
}

fn search(config: EngineConfig, query: &str, k: usize) -> Result<()> {
    let store = SledDocumentStore::open(&config.doc_store_dir)?;
    let engine = Engine::new(config, store);
    let results = engine.search(query, k)?;
    println!("{}", render(&results));
    Ok(())
}

fn render(results: &SearchResults) -> String {
    if results.hits.is_empty() {
        return format!("{} match!!", results.total_hits);
    }
    results
        .hits
        .iter()
        .enumerate()
        .map(|(i, hit)| format!("rank:{:>3}  score:{:.6}  title:{}", i + 1, hit.score, hit.title))
        .collect::<Vec<_>>()
        .join("\n")
}
