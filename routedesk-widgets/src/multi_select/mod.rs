//! MultiSelect widget - an async-searchable multi-select combobox.
//!
//! The MultiSelect provides:
//! - Insertion-ordered selection with an optional limit and fixed (unremovable) options
//! - Debounced, generation-stamped remote search through an [`OptionSource`]
//! - Local fuzzy filtering when no source is attached
//! - Grouping of options by an attribute, with selected options excluded
//! - A "create" entry for free text when `creatable` is set
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use routedesk_widgets::prelude::*;
//!
//! let scheduler = Arc::new(TokioScheduler::current()?);
//! let picker = MultiSelect::new(scheduler)
//!     .with_config(MultiSelectConfig::default().with_max_selected(3))
//!     .with_source(Arc::new(UserSearch::new(api)));
//!
//! picker.focus();
//! picker.set_query("ana");
//! // ...after the debounce interval and the search resolve:
//! for group in picker.selectable_groups() {
//!     println!("{}: {:?}", group.key, group.options);
//! }
//! ```

mod config;
mod filter;
mod option;
mod source;
mod state;

pub use config::MultiSelectConfig;
pub use option::{OptionGroup, SelectOption, group_options};
pub use source::{OptionSource, SearchError};
pub use state::{MultiSelect, MultiSelectId, SearchPhase, SearchTicket};
