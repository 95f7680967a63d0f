//! DataTable widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::events::{EventQueue, WidgetEvent};
use crate::flags::FlagMap;
use crate::selection::{SelectionModel, SelectionOutcome};

use super::config::{TableConfig, ViewReset};
use super::item::{Column, TableRow};
use super::view::{
    SelectionSummary, SortDirection, SortKey, ViewState, clamp_page, filtered_sorted, page_count,
};

/// Unique identifier for a DataTable widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataTableId(usize);

impl DataTableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for DataTableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__data_table_{}", self.0)
    }
}

/// Snapshot of what the table shows right now.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<T> {
    /// Rows on the current page, in display order.
    pub rows: Vec<T>,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    /// Rows left after filtering, across all pages.
    pub total_rows: usize,
    /// Selection state of the rows on this page.
    pub summary: SelectionSummary,
}

/// Internal state for the DataTable widget.
#[derive(Debug)]
struct DataTableInner<T: TableRow> {
    columns: Vec<Column>,
    rows: Vec<T>,
    config: TableConfig,
    view: ViewState,
    selection: SelectionModel,
    flags: FlagMap,
    /// Last payloads this widget emitted, to recognize their echo.
    last_emitted_ids: Option<Vec<String>>,
    last_emitted_flags: Option<FlagMap>,
}

impl<T: TableRow> DataTableInner<T> {
    fn new(columns: Vec<Column>, config: TableConfig) -> Self {
        let mut selection = SelectionModel::new();
        selection.set_max_selected(config.max_selected);
        Self {
            columns,
            rows: Vec::new(),
            view: ViewState::new(config.page_size),
            config,
            selection,
            flags: FlagMap::new(),
            last_emitted_ids: None,
            last_emitted_flags: None,
        }
    }

    fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    fn filtered(&self) -> Vec<usize> {
        filtered_sorted(&self.rows, &self.view)
    }

    /// Re-clamp the page index after the filtered count may have changed.
    fn clamp(&mut self) {
        let total = self.filtered().len();
        self.view.page.index = clamp_page(self.view.page.index, total, self.view.page.size);
    }

    /// Indices (into `rows`) of the current page.
    fn page_indices(&self) -> (Vec<usize>, usize) {
        let filtered = self.filtered();
        let total = filtered.len();
        let size = self.view.page.size;
        let start = self.view.page.index.saturating_mul(size).min(total);
        let end = (start + size).min(total);
        (filtered[start..end].to_vec(), total)
    }

    fn visible_ids(&self) -> Vec<String> {
        self.page_indices()
            .0
            .into_iter()
            .map(|i| self.rows[i].id())
            .collect()
    }
}

/// A sortable, filterable, paginated table with row selection and a per-row
/// boolean flag.
///
/// `DataTable` is a cheap-to-clone handle; clones share state. The host owns
/// the selected IDs and the flag map, pushes them in with
/// [`set_value`](Self::set_value) / [`set_flags`](Self::set_flags), and learns
/// about user changes from [`WidgetEvent`]s. Sort, filter and page state are
/// owned by the table.
///
/// # Example
///
/// ```ignore
/// let table = DataTable::new(vec![
///     Column::new("name", "Name").sortable().filterable(),
///     Column::new("email", "Email"),
/// ])
/// .with_events(events.clone())
/// .with_rows(users);
///
/// table.toggle_sort("name", false);
/// table.toggle_page_selection();
/// ```
#[derive(Debug)]
pub struct DataTable<T: TableRow> {
    id: DataTableId,
    inner: Arc<RwLock<DataTableInner<T>>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl<T: TableRow> Clone for DataTable<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            events: self.events.clone(),
        }
    }
}

impl<T: TableRow> DataTable<T> {
    /// Create a table with the given columns and default configuration.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            id: DataTableId::new(),
            inner: Arc::new(RwLock::new(DataTableInner::new(
                columns,
                TableConfig::default(),
            ))),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        }
    }

    /// Set initial rows.
    pub fn with_rows(self, rows: Vec<T>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Apply a configuration.
    pub fn with_config(self, config: TableConfig) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection.set_max_selected(config.max_selected);
            guard.view.page.size = config.page_size.max(1);
            guard.config = config;
            guard.clamp();
        }
        self
    }

    /// Report events into a shared queue.
    pub fn with_events(mut self, events: EventQueue) -> Self {
        self.events = events;
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> DataTableId {
        self.id
    }

    /// Get the ID as a string (used in events).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    /// The queue this widget reports to.
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Column definitions.
    pub fn columns(&self) -> Vec<Column> {
        self.inner
            .read()
            .map(|g| g.columns.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Replace the row set.
    ///
    /// Selected IDs and flags are kept even when no row matches them any more.
    /// The page index goes back to 0; with [`ViewReset::All`] sort and filters
    /// are cleared too.
    pub fn set_rows(&self, rows: Vec<T>) {
        if let Ok(mut guard) = self.inner.write() {
            log::debug!("{}: {} rows", self.id, rows.len());
            guard.rows = rows;
            guard.view.page.index = 0;
            if guard.config.reset_on_rows == ViewReset::All {
                guard.view.sort.clear();
                guard.view.filters.clear();
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Number of rows, before filtering.
    pub fn row_count(&self) -> usize {
        self.inner.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    /// Get a row by ID.
    pub fn row(&self, id: &str) -> Option<T> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.rows.iter().find(|r| r.id() == id).cloned())
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Advance the sort on `column` through `asc -> desc -> off`.
    ///
    /// Without `multi` the column becomes the only sort key; with `multi` it
    /// is updated in place or appended to the chain. Unknown and non-sortable
    /// columns are ignored. Returns the column's new direction.
    pub fn toggle_sort(&self, column: &str, multi: bool) -> Option<SortDirection> {
        let mut guard = self.inner.write().ok()?;
        if !guard.column(column).is_some_and(|c| c.sortable) {
            return None;
        }

        let position = guard.view.sort.iter().position(|k| k.column == column);
        let next = match position.map(|p| guard.view.sort[p].direction) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };

        let key = next.map(|direction| SortKey {
            column: column.to_string(),
            direction,
        });
        if multi {
            match (position, key) {
                (Some(p), Some(key)) => guard.view.sort[p] = key,
                (Some(p), None) => {
                    guard.view.sort.remove(p);
                }
                (None, Some(key)) => guard.view.sort.push(key),
                (None, None) => {}
            }
        } else {
            guard.view.sort = key.into_iter().collect();
        }

        log::debug!("{}: sort {:?}", self.id, guard.view.sort);
        self.dirty.store(true, Ordering::SeqCst);
        next
    }

    /// Replace the whole comparator chain. Keys on non-sortable columns are
    /// dropped.
    pub fn set_sort(&self, keys: Vec<SortKey>) {
        if let Ok(mut guard) = self.inner.write() {
            let keys: Vec<SortKey> = keys
                .into_iter()
                .filter(|k| guard.column(&k.column).is_some_and(|c| c.sortable))
                .collect();
            guard.view.sort = keys;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Remove all sorting.
    pub fn clear_sort(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.view.sort.clear();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Current comparator chain.
    pub fn sort(&self) -> Vec<SortKey> {
        self.inner
            .read()
            .map(|g| g.view.sort.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Set the filter needle for a column. An empty needle removes the filter.
    ///
    /// The page index is clamped to the new page count.
    pub fn set_filter(&self, column: &str, needle: impl Into<String>) {
        let needle = needle.into();
        if let Ok(mut guard) = self.inner.write() {
            if !guard.column(column).is_some_and(|c| c.filterable) {
                return;
            }
            if needle.is_empty() {
                guard.view.filters.remove(column);
            } else {
                guard.view.filters.insert(column.to_string(), needle);
            }
            guard.clamp();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Remove every filter.
    pub fn clear_filters(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.view.filters.clear();
            guard.clamp();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Current filter needle for a column.
    pub fn filter(&self, column: &str) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.view.filters.get(column).cloned())
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Current page index.
    pub fn page_index(&self) -> usize {
        self.inner.read().map(|g| g.view.page.index).unwrap_or(0)
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.inner
            .read()
            .map(|g| g.view.page.size)
            .unwrap_or(super::config::DEFAULT_PAGE_SIZE)
    }

    /// Number of pages for the filtered rows (at least 1).
    pub fn page_count(&self) -> usize {
        self.inner
            .read()
            .map(|g| page_count(g.filtered().len(), g.view.page.size))
            .unwrap_or(1)
    }

    /// Jump to a page. Out-of-range indices are clamped.
    pub fn set_page(&self, index: usize) {
        if let Ok(mut guard) = self.inner.write() {
            guard.view.page.index = index;
            guard.clamp();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Go to the next page if there is one. Returns whether the page changed.
    pub fn next_page(&self) -> bool {
        if !self.can_next_page() {
            return false;
        }
        self.set_page(self.page_index() + 1);
        true
    }

    /// Go to the previous page if there is one. Returns whether the page changed.
    pub fn previous_page(&self) -> bool {
        if !self.can_previous_page() {
            return false;
        }
        self.set_page(self.page_index() - 1);
        true
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index() + 1 < self.page_count()
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index() > 0
    }

    /// Change the page size, keeping the first row of the current page visible.
    pub fn set_page_size(&self, size: usize) {
        let size = size.max(1);
        if let Ok(mut guard) = self.inner.write() {
            let first_row = guard.view.page.index * guard.view.page.size;
            guard.view.page.size = size;
            guard.view.page.index = first_row / size;
            guard.clamp();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    /// The current page, ready to render.
    pub fn view(&self) -> TableView<T> {
        let Ok(guard) = self.inner.read() else {
            return TableView {
                rows: Vec::new(),
                page_index: 0,
                page_size: super::config::DEFAULT_PAGE_SIZE,
                page_count: 1,
                total_rows: 0,
                summary: SelectionSummary::None,
            };
        };
        let (indices, total) = guard.page_indices();
        let rows: Vec<T> = indices.iter().map(|&i| guard.rows[i].clone()).collect();
        let ids: Vec<String> = rows.iter().map(TableRow::id).collect();
        TableView {
            rows,
            page_index: guard.view.page.index,
            page_size: guard.view.page.size,
            page_count: page_count(total, guard.view.page.size),
            total_rows: total,
            summary: SelectionSummary::from_visible(&ids, &guard.selection),
        }
    }

    /// IDs of the rows on the current page.
    pub fn visible_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.visible_ids())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Selected row IDs in selection order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.selection.ids().to_vec())
            .unwrap_or_default()
    }

    /// Check if a row is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.selection.contains(id))
            .unwrap_or(false)
    }

    /// Flip one row's selection (the row checkbox).
    pub fn toggle_row(&self, id: &str) -> SelectionOutcome {
        let Ok(mut guard) = self.inner.write() else {
            return SelectionOutcome::Rejected;
        };
        let outcome = guard.selection.toggle(id);
        self.report_selection(&mut guard, outcome);
        outcome
    }

    /// Select or deselect the whole visible page (the header checkbox).
    ///
    /// If every visible row is selected they are all deselected; otherwise the
    /// unselected ones are selected. Either way it is one change.
    pub fn toggle_page_selection(&self) -> SelectionOutcome {
        let Ok(mut guard) = self.inner.write() else {
            return SelectionOutcome::Rejected;
        };
        let visible = guard.visible_ids();
        let outcome = match SelectionSummary::from_visible(&visible, &guard.selection) {
            SelectionSummary::All => guard.selection.deselect_many(&visible),
            _ => guard.selection.select_many(&visible),
        };
        self.report_selection(&mut guard, outcome);
        outcome
    }

    /// Deselect every row.
    pub fn clear_selection(&self) -> SelectionOutcome {
        let Ok(mut guard) = self.inner.write() else {
            return SelectionOutcome::Rejected;
        };
        let outcome = guard.selection.clear(false);
        self.report_selection(&mut guard, outcome);
        outcome
    }

    /// Selection state of the current page.
    pub fn selection_summary(&self) -> SelectionSummary {
        self.inner
            .read()
            .map(|g| SelectionSummary::from_visible(&g.visible_ids(), &g.selection))
            .unwrap_or(SelectionSummary::None)
    }

    /// Push the host's selection in. Emits nothing; the echo of this table's
    /// own last change is skipped.
    pub fn set_value(&self, ids: &[String]) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.last_emitted_ids.as_deref() == Some(ids) {
                guard.last_emitted_ids = None;
                log::trace!("{}: skipping echo of own selection", self.id);
                return;
            }
            guard.last_emitted_ids = None;
            guard.selection.replace_all(ids.iter().cloned());
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    fn report_selection(&self, guard: &mut DataTableInner<T>, outcome: SelectionOutcome) {
        match outcome {
            SelectionOutcome::Changed => {
                let ids = guard.selection.ids().to_vec();
                guard.last_emitted_ids = Some(ids.clone());
                self.dirty.store(true, Ordering::SeqCst);
                self.events.push(WidgetEvent::SelectionChange {
                    widget_id: self.id_string(),
                    ids,
                });
            }
            SelectionOutcome::LimitReached(max) => {
                log::debug!("{}: selection limit {} reached", self.id, max);
                self.events.push(WidgetEvent::LimitReached {
                    widget_id: self.id_string(),
                    max,
                });
            }
            SelectionOutcome::Unchanged | SelectionOutcome::Rejected => {}
        }
    }

    // -------------------------------------------------------------------------
    // Flags
    // -------------------------------------------------------------------------

    /// The full flag map.
    pub fn flags(&self) -> FlagMap {
        self.inner
            .read()
            .map(|g| g.flags.clone())
            .unwrap_or_default()
    }

    /// Check if a row is flagged.
    pub fn is_flagged(&self, id: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.flags.is_flagged(id))
            .unwrap_or(false)
    }

    /// Set one row's flag (user action). Emits the whole updated map if the
    /// flag changed. Selection is not touched.
    pub fn set_flag(&self, id: &str, value: bool) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.flags.is_flagged(id) == value {
                return;
            }
            guard.flags.set(id, value);
            self.report_flags(&mut guard);
        }
    }

    /// Flip one row's flag (user action). Returns the new value.
    pub fn toggle_flag(&self, id: &str) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let value = guard.flags.toggle(id);
        self.report_flags(&mut guard);
        value
    }

    /// Push the host's flag map in, replacing the internal one. Emits nothing;
    /// the echo of this table's own last change is skipped.
    pub fn set_flags(&self, flags: FlagMap) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.last_emitted_flags.as_ref() == Some(&flags) {
                guard.last_emitted_flags = None;
                log::trace!("{}: skipping echo of own flags", self.id);
                return;
            }
            guard.last_emitted_flags = None;
            guard.flags.replace_all(flags);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    fn report_flags(&self, guard: &mut DataTableInner<T>) {
        let flags = guard.flags.clone();
        guard.last_emitted_flags = Some(flags.clone());
        self.dirty.store(true, Ordering::SeqCst);
        self.events.push(WidgetEvent::FlagChange {
            widget_id: self.id_string(),
            flags,
        });
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the table state has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
