use crate::error::{Result, TinysearchError};
use crate::index::{Index, Posting, PostingsList};
use std::fs::{self, create_dir_all, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const DOC_COUNT_FILE: &str = "_0.dc";

/// File layout of an index directory: one JSON file per term plus `_0.dc`.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn term(&self, term: &str) -> PathBuf { self.root.join(term) }
    pub fn doc_count(&self) -> PathBuf { self.root.join(DOC_COUNT_FILE) }
}

pub fn save_postings_for_term(paths: &IndexPaths, term: &str, postings: &PostingsList) -> Result<()> {
    if !is_valid_term(term) {
        return Err(TinysearchError::InvalidPostings {
            term: term.to_string(),
            reason: "term is not a plain file name".into(),
        });
    }
    let bytes = serde_json::to_vec(postings).map_err(|source| TinysearchError::CorruptPostings {
        term: term.to_string(),
        source,
    })?;
    let mut f = BufWriter::new(File::create(paths.term(term))?);
    f.write_all(&bytes)?;
    f.flush()?;
    Ok(())
}

/// Load a term's postings; `Ok(None)` when the term was never indexed.
pub fn load_postings_for_term(paths: &IndexPaths, term: &str) -> Result<Option<PostingsList>> {
    if !is_valid_term(term) {
        return Ok(None);
    }
    let mut f = match File::open(paths.term(term)) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let postings: Vec<Posting> = serde_json::from_slice(&buf).map_err(|source| TinysearchError::CorruptPostings {
        term: term.to_string(),
        source,
    })?;
    let list = PostingsList::from_postings(postings)
        .map_err(|reason| TinysearchError::InvalidPostings { term: term.to_string(), reason })?;
    Ok(Some(list))
}

pub fn save_doc_count(paths: &IndexPaths, count: u32) -> Result<()> {
    let mut f = File::create(paths.doc_count())?;
    f.write_all(count.to_string().as_bytes())?;
    Ok(())
}

pub fn load_doc_count(paths: &IndexPaths) -> Result<u32> {
    let path = paths.doc_count();
    let mut buf = String::new();
    File::open(&path)
        .and_then(|mut f| f.read_to_string(&mut buf))
        .map_err(|source| TinysearchError::DocCount { path, source })?;
    buf.trim().parse().map_err(|_| TinysearchError::CorruptDocCount(buf.clone()))
}

// Terms come out of the tokenizer as [a-z0-9]+, which keeps them clear of
// path separators and of the `_`-prefixed bookkeeping files.
fn is_valid_term(term: &str) -> bool {
    !term.is_empty() && term.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// Writes an [`Index`] to a directory.
pub struct IndexWriter {
    paths: IndexPaths,
}

impl IndexWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { paths: IndexPaths::new(dir) }
    }

    /// Remove the term files and document count left by an earlier flush.
    ///
    /// Only regular files named like a term or `_0.dc` are touched; anything
    /// else in the directory is left alone. Returns the number of files removed.
    pub fn clear(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.paths.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut removed = 0usize;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let owned = name.to_str().is_some_and(|name| name == DOC_COUNT_FILE || is_valid_term(name));
            if owned {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        tracing::info!(dir = %self.paths.root.display(), removed, "cleared previous index files");
        Ok(removed)
    }

    /// Write every postings list, then the document count.
    ///
    /// A term that fails to write is logged and skipped. Failing to write
    /// the document count fails the whole flush.
    pub fn flush(&self, index: &Index) -> Result<()> {
        create_dir_all(&self.paths.root)?;
        let mut written = 0usize;
        let mut failed = 0usize;
        for (term, postings) in index.terms() {
            match save_postings_for_term(&self.paths, term, postings) {
                Ok(()) => written += 1,
                Err(error) => {
                    failed += 1;
                    tracing::warn!(term, %error, "failed to save postings list");
                }
            }
        }
        save_doc_count(&self.paths, index.total_docs_count())?;
        tracing::info!(
            dir = %self.paths.root.display(),
            written,
            failed,
            num_docs = index.total_docs_count(),
            "index flushed"
        );
        Ok(())
    }
}

/// Loads postings lists and the document count from an index directory.
pub struct IndexReader {
    paths: IndexPaths,
}

impl IndexReader {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { paths: IndexPaths::new(dir) }
    }

    /// Postings for each term that has a file; terms without one are left out.
    pub fn postings_lists(&self, terms: &[String]) -> Result<Vec<(String, PostingsList)>> {
        let mut lists = Vec::with_capacity(terms.len());
        for term in terms {
            if let Some(list) = load_postings_for_term(&self.paths, term)? {
                lists.push((term.clone(), list));
            }
        }
        Ok(lists)
    }

    pub fn total_doc_count(&self) -> Result<u32> {
        load_doc_count(&self.paths)
    }
}
