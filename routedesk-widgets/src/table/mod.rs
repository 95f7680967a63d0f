//! DataTable widget - a sortable, filterable, paginated table.
//!
//! Rows are any type implementing [`TableRow`]. The table derives one view
//! (filter, then sort, then paginate) from the row set and its [`ViewState`],
//! keeps a row selection keyed by row ID, and carries a [`FlagMap`] beside it
//! for a per-row boolean such as "priority".
//!
//! [`FlagMap`]: crate::flags::FlagMap

mod config;
mod item;
mod state;
mod view;

pub use config::{DEFAULT_PAGE_SIZE, TableConfig, ViewReset};
pub use item::{CellValue, Column, TableRow};
pub use state::{DataTable, DataTableId, TableView};
pub use view::{
    PageState, SelectionSummary, SortDirection, SortKey, ViewState, clamp_page, filtered_sorted,
    page_count,
};
