use std::io::{BufReader, Read};

use crate::error::{Result, TinysearchError};
use crate::index::{DocumentId, Index};
use crate::tokenizer::{normalize, split};

/// Folds documents into an in-memory [`Index`].
#[derive(Debug, Default)]
pub struct Indexer {
    index: Index,
}

impl Indexer {
    pub fn new() -> Self { Self::default() }

    /// Tokenize `reader` and add every term occurrence under `doc_id`.
    ///
    /// Positions count raw tokens, so a token that normalizes away still
    /// occupies a position. On a read error the postings already added for
    /// this document stay in the index and the document is not counted.
    pub fn ingest<R: Read>(&mut self, doc_id: DocumentId, reader: R) -> Result<()> {
        let mut terms = 0usize;
        for (position, word) in split(BufReader::new(reader)).enumerate() {
            let word = word?;
            if let Some(term) = normalize(&word) {
                self.index.add_occurrence(term, doc_id, token_position(doc_id, position)?)?;
                terms += 1;
            }
        }
        self.index.finish_document();
        tracing::debug!(doc_id, terms, "ingested document");
        Ok(())
    }

    pub fn index(&self) -> &Index { &self.index }
    pub fn into_index(self) -> Index { self.index }
}

fn token_position(doc_id: DocumentId, ordinal: usize) -> Result<u32> {
    u32::try_from(ordinal).map_err(|_| TinysearchError::DocumentTooLong(doc_id))
}
