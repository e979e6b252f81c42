use std::ops::Range;

/// Page cursor over a client-side list.
///
/// `start` is always a multiple of `page_size` and, for a non-empty list,
/// stays below its length. Moves past either end are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    start: usize,
}

impl Pagination {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            start: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end of the window; may exceed the list length on the last page.
    pub fn end(&self) -> usize {
        self.start + self.page_size
    }

    /// 1-based
    pub fn current_page(&self) -> usize {
        self.start / self.page_size + 1
    }

    /// At least 1, so an empty list still shows "page 1 of 1"
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.start > 0
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.end() < total
    }

    pub fn next_page(&mut self, total: usize) -> bool {
        if !self.has_next(total) {
            return false;
        }
        self.start += self.page_size;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.start -= self.page_size;
        true
    }

    pub fn reset(&mut self) {
        self.start = 0;
    }

    /// Pull the window back onto the last page when the list shrank under it.
    pub fn clamp(&mut self, total: usize) {
        if total == 0 {
            self.reset();
        } else if self.start >= total {
            self.start = (total - 1) / self.page_size * self.page_size;
        }
    }

    /// Indices of the current page within a list of `total` items
    pub fn window(&self, total: usize) -> Range<usize> {
        self.start.min(total)..self.end().min(total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_cursor() {
        let pagination = Pagination::new(5);
        assert_eq!(
            (pagination.start(), pagination.end(), pagination.current_page()),
            (0, 5, 1)
        );
        assert!(!pagination.has_previous());
    }

    #[test]
    fn test_next_then_previous_restores_cursor() {
        let mut pagination = Pagination::new(5);
        let before = pagination;

        assert!(pagination.next_page(12));
        assert_eq!(
            (pagination.start(), pagination.end(), pagination.current_page()),
            (5, 10, 2)
        );
        assert!(pagination.previous_page());
        assert_eq!(pagination, before);
    }

    #[test]
    fn test_moves_are_refused_at_boundaries() {
        let mut pagination = Pagination::new(5);

        assert!(!pagination.previous_page());
        assert!(pagination.next_page(12));
        assert!(pagination.next_page(12));
        assert_eq!(pagination.current_page(), 3);
        assert!(!pagination.next_page(12));
        assert_eq!(pagination.window(12), 10..12);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_trailing_page() {
        let mut pagination = Pagination::new(5);
        assert!(pagination.next_page(10));
        assert!(!pagination.has_next(10));
        assert_eq!(pagination.page_count(10), 2);
    }

    #[test]
    fn test_empty_list() {
        let mut pagination = Pagination::new(5);
        assert!(!pagination.next_page(0));
        assert_eq!(pagination.window(0), 0..0);
        assert_eq!(pagination.page_count(0), 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut pagination = Pagination::new(5);
        pagination.next_page(20);
        pagination.next_page(20);
        pagination.next_page(20);
        assert_eq!(pagination.start(), 15);

        pagination.clamp(7);
        assert_eq!(pagination.start(), 5);
        assert_eq!(pagination.current_page(), 2);

        pagination.clamp(0);
        assert_eq!(pagination.start(), 0);
    }

    #[test]
    fn test_cursor_never_leaves_list() {
        let mut pagination = Pagination::new(3);
        for total in [0usize, 1, 3, 4, 9, 10] {
            pagination.reset();
            while pagination.next_page(total) {}
            assert!(total == 0 || pagination.start() < total);
            assert_eq!(pagination.start() % 3, 0);
            while pagination.previous_page() {}
            assert_eq!(pagination.start(), 0);
        }
    }

    #[test]
    fn test_zero_page_size_is_bumped() {
        assert_eq!(Pagination::new(0).page_size(), 1);
    }
}
