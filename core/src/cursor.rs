use crate::index::{DocumentId, Posting, PostingsList};

/// Forward-only, skip-capable view over one postings list.
///
/// Borrows the list; any number of cursors may read the same list.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    list: &'a PostingsList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(list: &'a PostingsList) -> Self {
        Self { list, pos: 0 }
    }

    /// Doc id under the cursor, `None` once exhausted.
    pub fn current_doc_id(&self) -> Option<DocumentId> {
        self.current_posting().map(Posting::doc_id)
    }

    pub fn current_posting(&self) -> Option<&'a Posting> {
        self.list.get(self.pos)
    }

    pub fn advance(&mut self) {
        if !self.is_exhausted() {
            self.pos += 1;
        }
    }

    /// Skip forward until the current doc id is >= `target` or the list runs out.
    pub fn advance_to(&mut self, target: DocumentId) {
        while let Some(doc_id) = self.current_doc_id() {
            if doc_id >= target {
                break;
            }
            self.advance();
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.list.len()
    }

    pub fn postings_list(&self) -> &'a PostingsList {
        self.list
    }
}
