//! Offset/limit cursor over the remote collection

use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: usize,
    pub page_size: NonZeroUsize,
    pub has_more: bool,
}

impl PageCursor {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            offset: 0,
            page_size,
            has_more: true,
        }
    }

    pub fn limit(&self) -> usize {
        self.page_size.get()
    }

    /// Move past a page that came back with `fetched` records.
    /// A short page means the collection is exhausted.
    pub fn advance(&mut self, fetched: usize) {
        self.offset += self.limit();
        self.has_more = fetched == self.limit();
    }
}
