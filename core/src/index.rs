use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::cursor::Cursor;
use crate::error::{Result, TinysearchError};

/// Document identifier assigned by the document store. Always > 0.
pub type DocumentId = u64;

/// Occurrences of one term inside one document.
///
/// `term_frequency` always equals `positions.len()`; the fields are private so
/// the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    #[serde(rename = "DocID")]
    doc_id: DocumentId,
    #[serde(rename = "Positions")]
    positions: Vec<u32>,
    #[serde(rename = "TermFrequency")]
    term_frequency: u32,
}

impl Posting {
    pub fn new(doc_id: DocumentId, positions: Vec<u32>) -> Self {
        let term_frequency = positions.len() as u32;
        Self { doc_id, positions, term_frequency }
    }

    pub fn doc_id(&self) -> DocumentId { self.doc_id }
    pub fn positions(&self) -> &[u32] { &self.positions }
    pub fn term_frequency(&self) -> u32 { self.term_frequency }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {:?})", self.doc_id, self.term_frequency, self.positions)
    }
}

/// All postings of one term, strictly ascending by doc id.
///
/// Serializes as a plain JSON array of postings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingsList {
    postings: Vec<Posting>,
}

impl PostingsList {
    pub fn new() -> Self { Self::default() }

    /// Build a list from already-ordered postings, checking every invariant.
    /// Used when loading lists that did not come from [`PostingsList::add`].
    pub fn from_postings(postings: Vec<Posting>) -> std::result::Result<Self, String> {
        if postings.first().is_some_and(|p| p.doc_id == 0) {
            return Err("doc id 0 is not a valid document id".into());
        }
        for pair in postings.windows(2) {
            if pair[0].doc_id >= pair[1].doc_id {
                return Err(format!("doc id {} follows {}", pair[1].doc_id, pair[0].doc_id));
            }
        }
        if let Some(p) = postings.iter().find(|p| p.term_frequency as usize != p.positions.len()) {
            return Err(format!(
                "doc id {} has term frequency {} but {} positions",
                p.doc_id,
                p.term_frequency,
                p.positions.len()
            ));
        }
        Ok(Self { postings })
    }

    /// Append a posting. A posting for the current last document is merged
    /// into it; any other document must sort after the last one.
    pub fn add(&mut self, posting: Posting) -> Result<()> {
        if let Some(last) = self.postings.last_mut() {
            if last.doc_id == posting.doc_id {
                last.term_frequency += posting.term_frequency;
                last.positions.extend(posting.positions);
                return Ok(());
            }
            if last.doc_id > posting.doc_id {
                return Err(TinysearchError::OutOfOrderDocument { last: last.doc_id, got: posting.doc_id });
            }
        }
        self.postings.push(posting);
        Ok(())
    }

    /// Document frequency of the term.
    pub fn len(&self) -> usize { self.postings.len() }
    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
    pub fn get(&self, idx: usize) -> Option<&Posting> { self.postings.get(idx) }
    pub fn iter(&self) -> std::slice::Iter<'_, Posting> { self.postings.iter() }

    pub fn cursor(&self) -> Cursor<'_> { Cursor::new(self) }
}

impl fmt::Display for PostingsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, posting) in self.postings.iter().enumerate() {
            if i > 0 {
                f.write_str("=>")?;
            }
            write!(f, "{posting}")?;
        }
        Ok(())
    }
}

/// In-memory inverted index built during one ingest session.
#[derive(Debug, Default)]
pub struct Index {
    dictionary: HashMap<String, PostingsList>,
    total_docs_count: u32,
}

impl Index {
    pub fn new() -> Self { Self::default() }

    /// Record one occurrence of `term` at `position` in `doc_id`.
    pub fn add_occurrence(&mut self, term: String, doc_id: DocumentId, position: u32) -> Result<()> {
        self.dictionary
            .entry(term)
            .or_default()
            .add(Posting::new(doc_id, vec![position]))
    }

    /// Count one more ingested document.
    pub fn finish_document(&mut self) { self.total_docs_count += 1; }

    pub fn total_docs_count(&self) -> u32 { self.total_docs_count }
    pub fn postings(&self, term: &str) -> Option<&PostingsList> { self.dictionary.get(term) }
    pub fn num_terms(&self) -> usize { self.dictionary.len() }
    pub fn terms(&self) -> impl Iterator<Item = (&str, &PostingsList)> {
        self.dictionary.iter().map(|(term, list)| (term.as_str(), list))
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms: Vec<&String> = self.dictionary.keys().collect();
        terms.sort();
        let width = terms.iter().map(|t| t.len()).max().unwrap_or(0);
        writeln!(f, "total documents : {}", self.total_docs_count)?;
        writeln!(f, "dictionary:")?;
        for term in terms {
            writeln!(f, "  [{:<width$}] -> {}", term, self.dictionary[term])?;
        }
        Ok(())
    }
}
