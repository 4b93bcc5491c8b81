/// Viewports narrower than this get the compact page size.
pub const NARROW_VIEWPORT_PX: u32 = 640;

pub fn rows_for_width(width_px: u32) -> usize {
    if width_px < NARROW_VIEWPORT_PX {
        4
    } else {
        8
    }
}

/// Client-side slicing of an already-fetched list. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Moves to `page` if it exists for `total` items.
    pub fn go_to(&mut self, page: usize, total: usize) -> bool {
        if page == 0 || page > self.page_count(total) {
            return false;
        }
        self.current = page;
        true
    }

    /// Keeps the current page valid after the list shrank.
    pub fn clamp(&mut self, total: usize) {
        self.current = self.current.min(self.page_count(total));
    }

    pub fn set_page_size(&mut self, page_size: usize, total: usize) {
        self.page_size = page_size.max(1);
        self.clamp(total);
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current - 1) * self.page_size;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}
