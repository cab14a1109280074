use std::fmt;
use std::io::Read;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::index::{DocumentId, Index};
use crate::indexer::Indexer;
use crate::persist::IndexWriter;
use crate::searcher::Searcher;
use crate::store::DocumentStore;
use crate::tokenizer::tokenize_text;

/// A hit with its title resolved from the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub doc_id: DocumentId,
    pub score: f64,
    pub title: String,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{DocID: {}, Score: {}, Title: {}}}", self.doc_id, self.score, self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub total_hits: usize,
    pub hits: Vec<SearchResult>,
}

/// Ties ingestion, the on-disk index and the document store together.
pub struct Engine<S> {
    config: EngineConfig,
    indexer: Indexer,
    store: S,
}

impl<S: DocumentStore> Engine<S> {
    pub fn new(config: EngineConfig, store: S) -> Self {
        Self { config, indexer: Indexer::new(), store }
    }

    /// Register `title` with the store and index the document body.
    pub fn add_document<R: Read>(&mut self, title: &str, reader: R) -> Result<DocumentId> {
        let doc_id = self.store.save(title)?;
        self.indexer.ingest(doc_id, reader)?;
        Ok(doc_id)
    }

    /// Write the in-memory index to the configured index directory.
    pub fn flush(&self) -> Result<()> {
        IndexWriter::new(&self.config.index_dir).flush(self.indexer.index())
    }

    pub fn search(&self, query: &str, k: usize) -> Result<SearchResults> {
        let terms = tokenize_text(query);
        let top = Searcher::new(&self.config.index_dir).search_top_k(&terms, k)?;

        let mut hits = Vec::with_capacity(top.scored_docs.len());
        for doc in top.scored_docs {
            let title = self.store.fetch_title(doc.doc_id)?;
            hits.push(SearchResult { doc_id: doc.doc_id, score: doc.score, title });
        }
        Ok(SearchResults { total_hits: top.total_hits, hits })
    }

    pub fn fetch_title(&self, doc_id: DocumentId) -> Result<String> {
        self.store.fetch_title(doc_id)
    }

    pub fn index(&self) -> &Index { self.indexer.index() }
    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn store(&self) -> &S { &self.store }
}
