pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page selection over an in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Never less than one, so an empty list still shows "page 1 of 1".
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// The page actually shown: a page past the end falls back to the first.
    pub fn effective_page(&self, total: usize) -> usize {
        if self.page > self.total_pages(total) {
            1
        } else {
            self.page
        }
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.effective_page(items.len());
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        &items[start.min(end)..end]
    }

    pub fn next(self, total: usize) -> Self {
        let page = self.effective_page(total);
        Self {
            page: (page + 1).min(self.total_pages(total)),
            ..self
        }
    }

    pub fn previous(self) -> Self {
        Self {
            page: self.page.saturating_sub(1).max(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_pages_of_ten_by_default() {
        let items: Vec<u32> = (1..=23).collect();
        let pagination = Pagination::default();
        assert_eq!(pagination.total_pages(items.len()), 3);
        assert_eq!(pagination.slice(&items), &items[..10]);
        assert_eq!(Pagination::new(3, 10).slice(&items), &[21, 22, 23]);
    }

    #[test]
    fn page_past_the_end_clamps_to_first() {
        let items: Vec<u32> = (1..=5).collect();
        let pagination = Pagination::new(4, 10);
        assert_eq!(pagination.effective_page(items.len()), 1);
        assert_eq!(pagination.slice(&items), &items[..]);
    }

    #[test]
    fn empty_list_has_one_page() {
        let pagination = Pagination::default();
        assert_eq!(pagination.total_pages(0), 1);
        assert!(pagination.slice::<u32>(&[]).is_empty());
    }

    #[test]
    fn next_and_previous_stay_in_range() {
        let pagination = Pagination::new(2, 10);
        assert_eq!(pagination.next(15).page(), 2);
        assert_eq!(pagination.previous().previous().page(), 1);
    }
}
