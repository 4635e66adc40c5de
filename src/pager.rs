/// Pagination over the snapshot. Page numbers are 1-based, matching what
/// the pagination bar displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// Rows shown per page.
    page_size: usize,
    /// Current page, 1-based.
    current: usize,
    /// Length of the snapshot being paged.
    len: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
            len: 0,
        }
    }

    /// Current page number, 1-based.
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Total pages: ceil(len / page_size), with at least one page so an
    /// empty snapshot still renders an empty table.
    pub fn total_pages(&self) -> usize {
        self.len.div_ceil(self.page_size).max(1)
    }

    /// Half-open row range of the current page within the snapshot.
    pub fn page_bounds(&self) -> (usize, usize) {
        let start = (self.current - 1) * self.page_size;
        let end = (start + self.page_size).min(self.len);
        (start.min(self.len), end)
    }

    /// True when on the first page (previous navigation disabled).
    pub fn at_first(&self) -> bool {
        self.current == 1
    }

    /// True when on the last page (next navigation disabled).
    pub fn at_last(&self) -> bool {
        self.current == self.total_pages()
    }

    /// Moves to the next page; no-op at the last page, no wraparound.
    pub fn next_page(&mut self) {
        if !self.at_last() {
            self.current += 1;
        }
    }

    /// Moves to the previous page; no-op at the first page.
    pub fn previous_page(&mut self) {
        if !self.at_first() {
            self.current -= 1;
        }
    }

    /// Adopts a new snapshot length, clamping the current page when the
    /// snapshot shrank below it.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.current = self.current.min(self.total_pages());
    }
}
