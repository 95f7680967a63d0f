//! Headless state engines for the visit-planning dashboard.
//!
//! Two widgets live here:
//! - [`MultiSelect`](multi_select::MultiSelect) - an async-searchable multi-select combobox
//! - [`DataTable`](table::DataTable) - a sortable, filterable, paginated table with
//!   row selection and a per-row boolean flag
//!
//! Both keep their selection in a [`SelectionModel`](selection::SelectionModel),
//! accept controlled state from their host, and report user changes through a
//! shared [`EventQueue`](events::EventQueue).

pub mod events;
pub mod flags;
pub mod multi_select;
pub mod scheduler;
pub mod selection;
pub mod table;

pub mod prelude {
    pub use crate::events::{EventQueue, WidgetEvent, WidgetEventKind};
    pub use crate::flags::FlagMap;
    pub use crate::multi_select::{
        MultiSelect, MultiSelectConfig, MultiSelectId, OptionGroup, OptionSource, SearchError,
        SearchPhase, SelectOption,
    };
    pub use crate::scheduler::{ManualScheduler, Scheduler, TimerToken, TokioScheduler};
    pub use crate::selection::{SelectionModel, SelectionOutcome};
    pub use crate::table::{
        CellValue, Column, DataTable, DataTableId, SelectionSummary, SortDirection, SortKey,
        TableConfig, TableRow, TableView, ViewReset,
    };
}
