//! Table configuration.

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How much view state a row replacement discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewReset {
    /// Only the page index goes back to 0.
    #[default]
    PageIndex,
    /// Page index, sort and filters are all reset.
    All,
}

/// Configuration for a [`DataTable`](super::DataTable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Rows per page (at least 1)
    pub page_size: usize,
    /// Upper bound on selected rows (None = unlimited)
    pub max_selected: Option<usize>,
    /// What `set_rows` resets
    pub reset_on_rows: ViewReset,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_selected: None,
            reset_on_rows: ViewReset::PageIndex,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size. Zero is treated as one.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn with_max_selected(mut self, max: usize) -> Self {
        self.max_selected = Some(max);
        self
    }

    pub fn reset_on_rows(mut self, reset: ViewReset) -> Self {
        self.reset_on_rows = reset;
        self
    }
}
