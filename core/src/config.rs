use std::env;
use std::io;
use std::path::{Path, PathBuf};

pub const INDEX_DIR_ENV: &str = "INDEX_DIR_PATH";
pub const DOC_STORE_ENV: &str = "DOC_STORE_PATH";
pub const DEFAULT_INDEX_DIR: &str = "_index_data";
const DOC_STORE_DIR: &str = "_docs";

/// Where an engine keeps its index and its document store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub index_dir: PathBuf,
    pub doc_store_dir: PathBuf,
}

impl EngineConfig {
    /// Index at `index_dir`, documents in its `_docs` subdirectory.
    pub fn new<P: AsRef<Path>>(index_dir: P) -> Self {
        let index_dir = index_dir.as_ref().to_path_buf();
        let doc_store_dir = index_dir.join(DOC_STORE_DIR);
        Self { index_dir, doc_store_dir }
    }

    /// `INDEX_DIR_PATH`, falling back to `./_index_data`; `DOC_STORE_PATH`
    /// overrides the document store location.
    pub fn from_env() -> io::Result<Self> {
        let index_dir = match env::var_os(INDEX_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()?.join(DEFAULT_INDEX_DIR),
        };
        let mut config = Self::new(index_dir);
        if let Some(dir) = env::var_os(DOC_STORE_ENV) {
            config.doc_store_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn with_doc_store_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.doc_store_dir = dir.as_ref().to_path_buf();
        self
    }
}
