use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TinysearchError};
use crate::index::DocumentId;

/// Assigns document ids and remembers titles.
///
/// Ids handed out by `save` must be positive and strictly increasing, since
/// postings lists are built in document id order.
pub trait DocumentStore {
    fn save(&self, title: &str) -> Result<DocumentId>;
    fn fetch_title(&self, doc_id: DocumentId) -> Result<String>;
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentRecord {
    title: String,
}

/// Document store persisted in a sled database.
pub struct SledDocumentStore {
    db: sled::Db,
}

impl SledDocumentStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self { db: sled::open(path)? })
    }

    pub fn len(&self) -> usize { self.db.len() }
    pub fn is_empty(&self) -> bool { self.db.is_empty() }

    /// Forget every stored document. Ids keep increasing across a clear.
    pub fn clear(&self) -> Result<()> {
        self.db.clear()?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl DocumentStore for SledDocumentStore {
    fn save(&self, title: &str) -> Result<DocumentId> {
        // generate_id starts at 0; ids handed out are 1-based
        let doc_id = self.db.generate_id()? + 1;
        let bytes = bincode::serialize(&DocumentRecord { title: title.to_string() })?;
        self.db.insert(doc_id.to_be_bytes(), bytes)?;
        Ok(doc_id)
    }

    fn fetch_title(&self, doc_id: DocumentId) -> Result<String> {
        let bytes = self.db.get(doc_id.to_be_bytes())?.ok_or(TinysearchError::DocumentNotFound(doc_id))?;
        let record: DocumentRecord = bincode::deserialize(&bytes)?;
        Ok(record.title)
    }
}

/// Volatile document store; ids are `1..=n` in save order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    titles: RwLock<Vec<String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self { Self::default() }
}

impl DocumentStore for MemoryDocumentStore {
    fn save(&self, title: &str) -> Result<DocumentId> {
        let mut titles = self.titles.write();
        titles.push(title.to_string());
        Ok(titles.len() as DocumentId)
    }

    fn fetch_title(&self, doc_id: DocumentId) -> Result<String> {
        let titles = self.titles.read();
        doc_id
            .checked_sub(1)
            .and_then(|idx| titles.get(idx as usize))
            .cloned()
            .ok_or(TinysearchError::DocumentNotFound(doc_id))
    }
}
