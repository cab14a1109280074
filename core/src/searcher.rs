//! Conjunctive (AND) query evaluation with tf-idf ranking.
//!
//! Every query term's postings list is loaded from disk, the lists are
//! intersected with a sorted merge driven by the shortest one, and each
//! document present in all lists is scored as the sum of `tf * idf` over
//! the query terms.

use std::fmt;
use std::path::Path;

use crate::cursor::Cursor;
use crate::error::Result;
use crate::index::{DocumentId, PostingsList};
use crate::persist::IndexReader;

/// A matched document and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreDoc {
    pub doc_id: DocumentId,
    pub score: f64,
}

impl fmt::Display for ScoreDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "docId: {}, Score: {}", self.doc_id, self.score)
    }
}

/// Result of [`Searcher::search_top_k`]: the number of matches and the best
/// `k` of them, highest score first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopDocs {
    pub total_hits: usize,
    pub scored_docs: Vec<ScoreDoc>,
}

impl fmt::Display for TopDocs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total hits: {}", self.total_hits)?;
        for doc in &self.scored_docs {
            writeln!(f, "  {doc}")?;
        }
        Ok(())
    }
}

pub struct Searcher {
    reader: IndexReader,
}

impl Searcher {
    pub fn new<P: AsRef<Path>>(index_dir: P) -> Self {
        Self { reader: IndexReader::new(index_dir) }
    }

    /// Documents containing every term in `query`, best `k` first.
    ///
    /// Equal scores are ordered by ascending doc id.
    pub fn search_top_k(&self, query: &[String], k: usize) -> Result<TopDocs> {
        if query.is_empty() {
            return Ok(TopDocs::default());
        }
        let total_docs = self.reader.total_doc_count()?;

        let lists = self.reader.postings_lists(query)?;
        if lists.len() < query.len() {
            // some term never occurs, so nothing can contain all of them
            tracing::debug!(terms = query.len(), found = lists.len(), "query term missing from index");
            return Ok(TopDocs::default());
        }

        let mut lists: Vec<PostingsList> = lists.into_iter().map(|(_, list)| list).collect();
        lists.sort_by_key(PostingsList::len);
        let mut cursors: Vec<Cursor<'_>> = lists.iter().map(PostingsList::cursor).collect();

        let mut docs = intersect(&mut cursors, total_docs);
        docs.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
        let total_hits = docs.len();
        docs.truncate(k);
        tracing::debug!(total_hits, returned = docs.len(), "query evaluated");

        Ok(TopDocs { total_hits, scored_docs: docs })
    }
}

/// Merge-join over cursors sorted shortest first, scoring every document
/// on which all of them agree. Matches come out in ascending doc id order.
fn intersect(cursors: &mut [Cursor<'_>], total_docs: u32) -> Vec<ScoreDoc> {
    let mut docs = Vec::new();
    let Some((c0, others)) = cursors.split_first_mut() else {
        return docs;
    };

    while let Some(candidate) = c0.current_doc_id() {
        let mut next_doc_id = None;
        for cursor in others.iter_mut() {
            cursor.advance_to(candidate);
            match cursor.current_doc_id() {
                None => return docs,
                Some(doc_id) if doc_id != candidate => {
                    next_doc_id = Some(doc_id);
                    break;
                }
                Some(_) => {}
            }
        }

        match next_doc_id {
            Some(doc_id) => c0.advance_to(doc_id),
            None => {
                let score = score(c0, others, total_docs);
                docs.push(ScoreDoc { doc_id: candidate, score });
                c0.advance();
            }
        }
    }
    docs
}

fn score<'a>(c0: &Cursor<'a>, others: &[Cursor<'a>], total_docs: u32) -> f64 {
    std::iter::once(c0)
        .chain(others)
        .filter_map(|cursor| {
            let posting = cursor.current_posting()?;
            let df = cursor.postings_list().len();
            Some(tf(posting.term_frequency()) * idf(total_docs, df))
        })
        .sum()
}

pub fn tf(term_frequency: u32) -> f64 {
    if term_frequency == 0 {
        return 0.0;
    }
    (term_frequency as f64).log2() + 1.0
}

pub fn idf(total_docs: u32, doc_frequency: usize) -> f64 {
    (total_docs as f64 / doc_frequency as f64).log2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Posting;

    fn list(entries: &[(DocumentId, u32)]) -> PostingsList {
        let mut list = PostingsList::new();
        for &(id, tf) in entries {
            list.add(Posting::new(id, (0..tf).collect())).unwrap();
        }
        list
    }

    #[test]
    fn tf_idf_values() {
        assert_eq!(tf(0), 0.0);
        assert_eq!(tf(1), 1.0);
        assert_eq!(tf(4), 3.0);
        assert_eq!(idf(8, 2), 2.0);
        assert_eq!(idf(3, 3), 0.0);
    }

    #[test]
    fn intersect_skips_to_common_documents() {
        let short = list(&[(3, 1), (8, 1), (20, 1)]);
        let long = list(&[(1, 1), (2, 1), (3, 2), (5, 1), (9, 1), (20, 1), (21, 1)]);
        let mut cursors = vec![short.cursor(), long.cursor()];

        let docs = intersect(&mut cursors, 32);
        let ids: Vec<DocumentId> = docs.iter().map(|d| d.doc_id).collect();
        assert_eq!(ids, vec![3, 20]);
        // doc 3 has tf 2 in the long list, so it outranks doc 20
        assert!(docs[0].score > docs[1].score);
    }

    #[test]
    fn intersect_stops_when_any_cursor_runs_out() {
        let a = list(&[(1, 1), (4, 1), (9, 1)]);
        let b = list(&[(1, 1), (2, 1), (4, 1), (5, 1)]);
        let c = list(&[(1, 1), (4, 1), (6, 1), (7, 1), (8, 1)]);
        let mut cursors = vec![a.cursor(), b.cursor(), c.cursor()];

        let ids: Vec<DocumentId> = intersect(&mut cursors, 10).iter().map(|d| d.doc_id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn single_term_matches_every_posting() {
        let a = list(&[(2, 1), (5, 3)]);
        let mut cursors = vec![a.cursor()];
        assert_eq!(intersect(&mut cursors, 4).len(), 2);
    }
}
