pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexer;
pub mod persist;
pub mod searcher;
pub mod store;
pub mod tokenizer;

pub use config::EngineConfig;
pub use cursor::Cursor;
pub use engine::{Engine, SearchResult, SearchResults};
pub use error::{Result, TinysearchError};
pub use index::{DocumentId, Index, Posting, PostingsList};
pub use indexer::Indexer;
pub use persist::{IndexReader, IndexWriter};
pub use searcher::{ScoreDoc, Searcher, TopDocs};
pub use store::{DocumentStore, MemoryDocumentStore, SledDocumentStore};
