// Infinite pagination state.
// GitHub does not report a total for org repositories, so an undersized page marks the end.

/// Pages fetched so far for one infinite query, in page order starting at 1.
#[derive(Debug, Clone)]
pub struct InfinitePages<T> {
    pages: Vec<Vec<T>>,
    page_size: u32,
}

impl<T> InfinitePages<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            pages: Vec::new(),
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of the most recently fetched page, 0 before the first fetch.
    pub fn last_page(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Page to request next, or `None` once an undersized page has been seen.
    pub fn next_page_param(&self) -> Option<u32> {
        match self.pages.last() {
            None => Some(1),
            Some(last) if last.len() < self.page_size as usize => None,
            Some(_) => Some(self.last_page() + 1),
        }
    }

    pub fn has_next_page(&self) -> bool {
        !self.pages.is_empty() && self.next_page_param().is_some()
    }

    /// Append `items` as page `page`. Out-of-order pages are rejected.
    pub fn push_page(&mut self, page: u32, items: Vec<T>) -> bool {
        if page != self.last_page() + 1 {
            return false;
        }
        self.pages.push(items);
        true
    }

    pub fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All items across pages, in fetch order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flatten()
    }
}
