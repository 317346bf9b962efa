//! Fixed-size page windowing
use serde::Serialize;

/// One page of an ordered listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    /// 1-based, always within `1..=total_pages`
    pub current_page: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slice `items` into the requested page, clamping the page into range
pub fn paginate<T>(items: &[T], page_size: usize, requested_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let current_page = requested_page.clamp(1, total_pages);
    let start = ((current_page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        total_pages,
        current_page,
    }
}

/// Numbered page links shown by the page controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<usize>,
    /// A separate link to page 1 precedes the run
    pub show_first: bool,
    /// Pages are skipped between the first link and the run
    pub leading_gap: bool,
    pub show_last: bool,
    pub trailing_gap: bool,
}

/// Run of at most `max_visible` page numbers centred on `current`
pub fn page_window(current: usize, total_pages: usize, max_visible: usize) -> PageWindow {
    let total_pages = total_pages.max(1);
    let max_visible = max_visible.max(1);
    let current = current.clamp(1, total_pages);

    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total_pages);
    if end - start + 1 < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    let pages: Vec<usize> = (start..=end).collect();
    PageWindow {
        show_first: start > 1,
        leading_gap: start > 2,
        show_last: end < total_pages,
        trailing_gap: end + 1 < total_pages,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_items_third_page() {
        let items: Vec<u32> = (0..45).collect();
        let page = paginate(&items, 20, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0], 40);
        assert!(page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn requested_page_is_clamped() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(paginate(&items, 4, 0).current_page, 1);
        let page = paginate(&items, 4, 99);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items, &[8, 9]);
    }

    #[test]
    fn empty_listing_has_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 20, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_prev() && !page.has_next());
    }

    #[test]
    fn zero_page_size_behaves_as_one() {
        let items = [1, 2, 3];
        let page = paginate(&items, 0, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, &[2]);
    }

    #[test]
    fn window_is_centred_and_shifted_at_edges() {
        let w = page_window(6, 10, 5);
        assert_eq!(w.pages, vec![4, 5, 6, 7, 8]);
        assert!(w.show_first && w.leading_gap && w.show_last && w.trailing_gap);

        let w = page_window(1, 10, 5);
        assert_eq!(w.pages, vec![1, 2, 3, 4, 5]);
        assert!(!w.show_first && w.show_last);

        let w = page_window(10, 10, 5);
        assert_eq!(w.pages, vec![6, 7, 8, 9, 10]);
        assert!(w.show_first && !w.show_last);

        let w = page_window(3, 6, 5);
        assert_eq!(w.pages, vec![1, 2, 3, 4, 5]);
        assert!(!w.show_first);
        assert!(w.show_last && !w.trailing_gap);
    }

    #[test]
    fn window_smaller_than_limit() {
        let w = page_window(2, 3, 5);
        assert_eq!(w.pages, vec![1, 2, 3]);
        assert!(!w.show_first && !w.show_last);
    }
}
