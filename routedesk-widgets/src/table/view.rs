//! View derivation: filter, sort and paginate a row set.
//!
//! Everything here is a pure function of the rows and a [`ViewState`]; the
//! table widget owns the state and re-derives on every read.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::selection::SelectionModel;

use super::item::{CellValue, TableRow};

/// Sort direction for one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One link of the comparator chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Current page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub index: usize,
    pub size: usize,
}

/// Derived view state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Comparator chain, most significant first.
    pub sort: Vec<SortKey>,
    /// Column key -> needle. Empty needles are never stored.
    pub filters: BTreeMap<String, String>,
    pub page: PageState,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: Vec::new(),
            filters: BTreeMap::new(),
            page: PageState {
                index: 0,
                size: page_size.max(1),
            },
        }
    }
}

/// Three-valued selection state of the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSummary {
    /// No visible row is selected (also the empty page).
    None,
    /// Some but not all visible rows are selected.
    Some,
    /// Every visible row is selected.
    All,
}

impl SelectionSummary {
    /// Summarize `selection` over the visible row IDs.
    pub fn from_visible(visible: &[String], selection: &SelectionModel) -> Self {
        let selected = visible.iter().filter(|id| selection.contains(id)).count();
        if selected == 0 {
            SelectionSummary::None
        } else if selected == visible.len() {
            SelectionSummary::All
        } else {
            SelectionSummary::Some
        }
    }
}

fn matches_filter(cell: &CellValue, needle: &str) -> bool {
    cell.display().is_some_and(|text| text.contains(needle))
}

fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    // Missing sorts last in both directions
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.compare_present(b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Indices of the rows that pass every filter, in sorted order.
pub fn filtered_sorted<T: TableRow>(rows: &[T], state: &ViewState) -> Vec<usize> {
    let mut indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            state
                .filters
                .iter()
                .all(|(column, needle)| matches_filter(&row.cell(column), needle))
        })
        .map(|(index, _)| index)
        .collect();

    if !state.sort.is_empty() {
        // sort_by is stable: full ties keep row order
        indices.sort_by(|&a, &b| {
            state
                .sort
                .iter()
                .map(|key| {
                    compare_cells(
                        &rows[a].cell(&key.column),
                        &rows[b].cell(&key.column),
                        key.direction,
                    )
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }
    indices
}

/// Number of pages for `total` rows. An empty set has one (empty) page.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a page index into `[0, page_count - 1]`.
pub fn clamp_page(index: usize, total: usize, page_size: usize) -> usize {
    index.min(page_count(total, page_size) - 1)
}
