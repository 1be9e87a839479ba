//! Fixed-size pagination over an ordered sequence.
//!
//! Pages are 1-based. An empty sequence still has one (empty) page so
//! callers never see a zero-page state.

use std::ops::Range;

/// Number of catalog entries shown per page.
pub const PAGE_SIZE: usize = 12;

/// Number of pages needed for `len` items, never less than 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Current page cursor for a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pager {
    /// Create a pager positioned on page 1. A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    /// Index range of the current page, clipped to `len`.
    pub fn page_range(&self, len: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(len);
        let end = (self.page * self.page_size).min(len);
        start..end
    }

    /// The items on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }

    /// Return to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Advance one page. Returns `false` (and stays put) on the last page.
    pub fn next(&mut self, len: usize) -> bool {
        if self.page < self.total_pages(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` (and stays put) on page 1.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped to `[1, total_pages]`. Returns the page
    /// actually selected.
    pub fn go_to(&mut self, page: usize, len: usize) -> usize {
        self.page = page.clamp(1, self.total_pages(len));
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 12), 3);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(1, 12), 1);
    }

    #[test]
    fn empty_sequence_has_one_page() {
        let pager = Pager::default();
        assert_eq!(pager.total_pages(0), 1);
        assert!(pager.slice::<usize>(&[]).is_empty());
    }

    #[test]
    fn last_page_holds_remainder() {
        let data = items(25);
        let mut pager = Pager::default();
        assert_eq!(pager.go_to(3, data.len()), 3);
        assert_eq!(pager.slice(&data), &[24]);
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let data = items(25);
        let mut pager = Pager::default();
        assert_eq!(pager.go_to(4, data.len()), 3);
        assert_eq!(pager.go_to(0, data.len()), 1);
    }

    #[test]
    fn first_page_is_first_twelve() {
        let data = items(25);
        let pager = Pager::default();
        assert_eq!(pager.slice(&data), &data[0..12]);
    }

    #[test]
    fn next_and_prev_stop_at_bounds() {
        let len = 25;
        let mut pager = Pager::default();
        assert!(!pager.prev());
        assert!(pager.next(len));
        assert!(pager.next(len));
        assert!(!pager.next(len));
        assert_eq!(pager.page(), 3);
        assert!(pager.prev());
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn stale_page_is_clipped_after_shrink() {
        let mut pager = Pager::default();
        pager.go_to(3, 25);
        assert_eq!(pager.page_range(5), 5..5);
    }

    #[test]
    fn zero_page_size_behaves_as_one() {
        let pager = Pager::new(0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.total_pages(3), 3);
    }
}
