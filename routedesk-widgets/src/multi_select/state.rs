//! MultiSelect widget state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::events::{EventQueue, WidgetEvent};
use crate::scheduler::{Scheduler, TimerToken};
use crate::selection::{SelectionModel, SelectionOutcome};

use super::filter::narrow_options;
use super::option::{OptionGroup, group_options};
use super::{MultiSelectConfig, OptionSource, SearchError, SelectOption};

/// Unique identifier for a MultiSelect widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MultiSelectId(usize);

impl MultiSelectId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for MultiSelectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__multi_select_{}", self.0)
    }
}

/// Where the search state machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No search has been dispatched since the last reset.
    #[default]
    Idle,
    /// The latest dispatched search has not resolved yet.
    Searching,
    /// The latest dispatched search resolved (possibly with no results).
    Settled,
}

/// A dispatched search: the query and the generation its result must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: String,
}

/// Internal state for a MultiSelect.
struct MultiSelectInner {
    config: MultiSelectConfig,
    source: Option<Arc<dyn OptionSource>>,

    // Selection
    selection: SelectionModel,
    /// Last known option for each selected value (badge labels).
    known: HashMap<String, SelectOption>,
    /// Last ID list this widget emitted, to recognize its echo.
    last_emitted: Option<Vec<String>>,

    // Input / dropdown
    query: String,
    open: bool,
    /// Displayed option set (static options or latest search results).
    options: Vec<SelectOption>,

    // Search
    phase: SearchPhase,
    /// Generation of the latest dispatched search.
    generation: u64,
    /// Bumped on every input change; a debounce timer only fires for the
    /// sequence number it was scheduled with.
    debounce_seq: u64,
    pending: Option<TimerToken>,
    mounted: bool,
}

impl std::fmt::Debug for MultiSelectInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSelectInner")
            .field("config", &self.config)
            .field("source", &self.source.as_ref().map(|_| "..."))
            .field("selection", &self.selection)
            .field("query", &self.query)
            .field("open", &self.open)
            .field("options", &self.options.len())
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl MultiSelectInner {
    fn new(config: MultiSelectConfig) -> Self {
        let mut selection = SelectionModel::new();
        selection.set_max_selected(config.max_selected);
        Self {
            options: config.default_options.clone(),
            config,
            source: None,
            selection,
            known: HashMap::new(),
            last_emitted: None,
            query: String::new(),
            open: false,
            phase: SearchPhase::Idle,
            generation: 0,
            debounce_seq: 0,
            pending: None,
            mounted: true,
        }
    }

    /// Whether the current input should lead to a search.
    fn wants_search(&self) -> bool {
        self.source.is_some()
            && (self.open || self.config.trigger_search_on_focus)
            && (!self.query.is_empty() || self.config.trigger_search_on_focus)
    }

    fn option_for(&self, value: &str) -> Option<&SelectOption> {
        self.known
            .get(value)
            .or_else(|| self.options.iter().find(|o| o.value == value))
    }
}

/// An async-searchable multi-select combobox.
///
/// `MultiSelect` is a cheap-to-clone handle; clones share state, which is how
/// a spawned search delivers its result back. The host owns the canonical
/// selection: it pushes it in with [`set_value`](Self::set_value) and learns
/// about user changes from [`WidgetEvent`]s in the widget's [`EventQueue`].
#[derive(Clone)]
pub struct MultiSelect {
    id: MultiSelectId,
    inner: Arc<RwLock<MultiSelectInner>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
    scheduler: Arc<dyn Scheduler>,
}

impl std::fmt::Debug for MultiSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSelect")
            .field("id", &self.id)
            .field("inner", &self.inner)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl MultiSelect {
    /// Create a MultiSelect with default configuration.
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            id: MultiSelectId::new(),
            inner: Arc::new(RwLock::new(MultiSelectInner::new(
                MultiSelectConfig::default(),
            ))),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
            scheduler,
        }
    }

    /// Replace the configuration.
    pub fn with_config(self, config: MultiSelectConfig) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            let source = guard.source.take();
            *guard = MultiSelectInner::new(config);
            guard.source = source;
        }
        self
    }

    /// Attach a remote search source.
    pub fn with_source(self, source: Arc<dyn OptionSource>) -> Self {
        self.set_source(Some(source));
        self
    }

    /// Report events into a shared queue.
    pub fn with_events(mut self, events: EventQueue) -> Self {
        self.events = events;
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> MultiSelectId {
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

    // -------------------------------------------------------------------------
    // Controlled props
    // -------------------------------------------------------------------------

    /// Push the host's selection in.
    ///
    /// Replaces membership wholesale and emits nothing. If `value` is exactly
    /// what this widget last emitted, it is the echo of that change and is
    /// skipped.
    pub fn set_value(&self, value: Vec<SelectOption>) {
        if let Ok(mut guard) = self.inner.write() {
            for option in &value {
                guard.selection.set_fixed(&option.value, option.fixed);
                guard.known.insert(option.value.clone(), option.clone());
            }
            let ids: Vec<String> = value.into_iter().map(|o| o.value).collect();
            Self::reconcile_locked(&mut guard, ids);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Push the host's selection in by value only.
    ///
    /// Labels are resolved from options seen earlier; values with no known
    /// option stay selected and display their value.
    pub fn set_value_ids(&self, ids: &[String]) {
        if let Ok(mut guard) = self.inner.write() {
            Self::reconcile_locked(&mut guard, ids.to_vec());
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    fn reconcile_locked(guard: &mut MultiSelectInner, ids: Vec<String>) {
        if guard.last_emitted.as_ref() == Some(&ids) {
            guard.last_emitted = None;
            log::trace!("multi-select: skipping echo of own change");
            return;
        }
        guard.last_emitted = None;
        guard.selection.replace_all(ids);
    }

    /// Push a static option list in. An empty list leaves the current
    /// options untouched.
    pub fn set_options(&self, options: Vec<SelectOption>) {
        if options.is_empty() {
            return;
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.options = options;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Attach or detach the remote search source.
    pub fn set_source(&self, source: Option<Arc<dyn OptionSource>>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.source = source;
        }
    }

    /// Enable or disable user interaction.
    pub fn set_disabled(&self, disabled: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.config.disabled = disabled;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Change the selection limit.
    pub fn set_max_selected(&self, max: Option<usize>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.config.max_selected = max;
            guard.selection.set_max_selected(max);
        }
    }

    /// Change the grouping attribute.
    pub fn set_group_by(&self, group_by: Option<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.config.group_by = group_by;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Selected values in selection order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.selection.ids().to_vec())
            .unwrap_or_default()
    }

    /// Selected options in selection order.
    ///
    /// A value whose option has not been seen yet is reported with the value
    /// as its label.
    pub fn selected_options(&self) -> Vec<SelectOption> {
        self.inner
            .read()
            .map(|g| {
                g.selection
                    .ids()
                    .iter()
                    .map(|id| {
                        g.option_for(id)
                            .cloned()
                            .unwrap_or_else(|| SelectOption::new(id.clone(), id.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check if a value is selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.selection.contains(value))
            .unwrap_or(false)
    }

    /// The displayed option set, before grouping and exclusion.
    pub fn options(&self) -> Vec<SelectOption> {
        self.inner
            .read()
            .map(|g| g.options.clone())
            .unwrap_or_default()
    }

    /// Current input text.
    pub fn query(&self) -> String {
        self.inner
            .read()
            .map(|g| g.query.clone())
            .unwrap_or_default()
    }

    /// Check if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.inner.read().map(|g| g.open).unwrap_or(false)
    }

    /// Check if a search is in flight (show the loading indicator).
    pub fn is_loading(&self) -> bool {
        self.phase() == SearchPhase::Searching
    }

    /// Current search phase.
    pub fn phase(&self) -> SearchPhase {
        self.inner.read().map(|g| g.phase).unwrap_or_default()
    }

    /// Generation of the latest dispatched search.
    pub fn generation(&self) -> u64 {
        self.inner.read().map(|g| g.generation).unwrap_or(0)
    }

    /// Check if a debounced search is waiting to fire.
    pub fn is_debouncing(&self) -> bool {
        self.inner
            .read()
            .map(|g| g.pending.is_some())
            .unwrap_or(false)
    }

    /// Check if user interaction is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner.read().map(|g| g.config.disabled).unwrap_or(false)
    }

    /// Options the user can still pick, grouped for display.
    ///
    /// Without a search source the option set is fuzzy-filtered by the query
    /// first. Already-selected values are excluded from every group, and
    /// groups left empty are dropped.
    pub fn selectable_groups(&self) -> Vec<OptionGroup> {
        let Ok(guard) = self.inner.read() else {
            return Vec::new();
        };

        let candidates = if guard.source.is_none() {
            narrow_options(&guard.query, &guard.options)
        } else {
            guard.options.clone()
        };

        group_options(&candidates, guard.config.group_by.as_deref())
            .into_iter()
            .map(|mut group| {
                group
                    .options
                    .retain(|o| !guard.selection.contains(&o.value));
                group
            })
            .filter(|group| !group.options.is_empty())
            .collect()
    }

    /// The "create" entry for the current query, if one should be offered.
    pub fn creatable_option(&self) -> Option<SelectOption> {
        let guard = self.inner.read().ok()?;
        if !guard.config.creatable || guard.query.is_empty() {
            return None;
        }
        let query = guard.query.as_str();
        let exists = guard.options.iter().any(|o| o.label == query)
            || guard.selection.contains(query)
            || guard.known.values().any(|o| o.label == query);
        (!exists).then(|| SelectOption::new(query, query))
    }

    // -------------------------------------------------------------------------
    // User interaction
    // -------------------------------------------------------------------------

    /// The input gained focus: open the dropdown, and search right away when
    /// trigger-on-focus is set or text is already typed.
    pub fn focus(&self) {
        let (cancel, search_now) = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            if guard.config.disabled || !guard.mounted {
                return;
            }
            guard.open = true;
            self.dirty.store(true, Ordering::SeqCst);
            let search_now = guard.wants_search();
            let cancel = if search_now {
                guard.debounce_seq += 1;
                guard.pending.take()
            } else {
                None
            };
            (cancel, search_now)
        };
        if let Some(token) = cancel {
            self.scheduler.cancel(token);
        }
        if search_now {
            self.run_search();
        }
    }

    /// The input lost focus: close the dropdown.
    ///
    /// A pending debounced search is dropped unless trigger-on-focus keeps
    /// searching while closed.
    pub fn blur(&self) {
        let cancel = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            guard.open = false;
            self.dirty.store(true, Ordering::SeqCst);
            if guard.config.trigger_search_on_focus {
                None
            } else {
                guard.debounce_seq += 1;
                guard.pending.take()
            }
        };
        if let Some(token) = cancel {
            self.scheduler.cancel(token);
        }
    }

    /// The user typed: update the query and restart the debounce timer.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        if self.is_disabled() {
            return;
        }
        self.input_changed(text);
    }

    fn input_changed(&self, text: String) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        if !guard.mounted || guard.query == text {
            return;
        }
        guard.query = text;
        self.dirty.store(true, Ordering::SeqCst);

        guard.debounce_seq += 1;
        if let Some(token) = guard.pending.take() {
            self.scheduler.cancel(token);
        }
        if guard.wants_search() {
            let seq = guard.debounce_seq;
            let this = self.clone();
            // Token is stored before the lock is released, so the timer
            // cannot fire ahead of it.
            let token = self.scheduler.schedule(
                guard.config.debounce_delay,
                Box::new(move || this.fire_debounce(seq)),
            );
            guard.pending = Some(token);
        }
    }

    fn fire_debounce(&self, seq: u64) {
        {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            if !guard.mounted || guard.debounce_seq != seq {
                return;
            }
            guard.pending = None;
        }
        self.run_search();
    }

    /// Pick an option.
    ///
    /// At the limit this emits `LimitReached` and keeps the query; otherwise a
    /// successful pick emits the new selection and clears the query.
    pub fn select(&self, option: &SelectOption) -> SelectionOutcome {
        let outcome = {
            let Ok(mut guard) = self.inner.write() else {
                return SelectionOutcome::Rejected;
            };
            if guard.config.disabled || option.disabled {
                return SelectionOutcome::Rejected;
            }
            let outcome = guard.selection.select(&option.value);
            match outcome {
                SelectionOutcome::LimitReached(max) => {
                    log::debug!("{}: selection limit {} reached", self.id, max);
                    self.events.push(WidgetEvent::LimitReached {
                        widget_id: self.id_string(),
                        max,
                    });
                }
                SelectionOutcome::Changed => {
                    guard.selection.set_fixed(&option.value, option.fixed);
                    guard.known.insert(option.value.clone(), option.clone());
                    self.emit_selection_locked(&mut guard);
                }
                _ => {}
            }
            outcome
        };
        if outcome.is_changed() {
            self.input_changed(String::new());
        }
        outcome
    }

    /// Pick an option by value from the displayed options or the create entry.
    pub fn select_value(&self, value: &str) -> SelectionOutcome {
        let option = self
            .inner
            .read()
            .ok()
            .and_then(|g| g.options.iter().find(|o| o.value == value).cloned())
            .or_else(|| self.creatable_option().filter(|o| o.value == value));
        match option {
            Some(option) => self.select(&option),
            None => SelectionOutcome::Unchanged,
        }
    }

    /// Remove one selected value (the badge's remove button).
    pub fn remove(&self, value: &str) -> SelectionOutcome {
        let Ok(mut guard) = self.inner.write() else {
            return SelectionOutcome::Rejected;
        };
        if guard.config.disabled {
            return SelectionOutcome::Rejected;
        }
        let outcome = guard.selection.remove(value);
        if outcome.is_changed() {
            self.emit_selection_locked(&mut guard);
        }
        outcome
    }

    /// Remove every non-fixed value (the clear-all button).
    pub fn clear_all(&self) -> SelectionOutcome {
        let Ok(mut guard) = self.inner.write() else {
            return SelectionOutcome::Rejected;
        };
        if guard.config.disabled {
            return SelectionOutcome::Rejected;
        }
        let outcome = guard.selection.clear(true);
        if outcome.is_changed() {
            self.emit_selection_locked(&mut guard);
        }
        outcome
    }

    fn emit_selection_locked(&self, guard: &mut MultiSelectInner) {
        let ids = guard.selection.ids().to_vec();
        guard.last_emitted = Some(ids.clone());
        self.dirty.store(true, Ordering::SeqCst);
        self.events.push(WidgetEvent::SelectionChange {
            widget_id: self.id_string(),
            ids,
        });
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Stamp a new search with the next generation and mark it in flight.
    ///
    /// Returns `None` once unmounted. Any result for an older generation is
    /// discarded from now on.
    pub fn dispatch_search(&self) -> Option<SearchTicket> {
        let mut guard = self.inner.write().ok()?;
        if !guard.mounted {
            return None;
        }
        guard.generation += 1;
        guard.phase = SearchPhase::Searching;
        self.dirty.store(true, Ordering::SeqCst);
        log::debug!(
            "{}: dispatching search #{} for {:?}",
            self.id,
            guard.generation,
            guard.query
        );
        Some(SearchTicket {
            generation: guard.generation,
            query: guard.query.clone(),
        })
    }

    /// Deliver a search result.
    ///
    /// Applied only if `generation` is the latest dispatched one. A failure
    /// shows as an empty result. Returns whether the result was applied.
    pub fn apply_results(
        &self,
        generation: u64,
        result: Result<Vec<SelectOption>, SearchError>,
    ) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if !guard.mounted || generation != guard.generation {
            log::debug!(
                "{}: discarding stale search #{} (latest #{})",
                self.id,
                generation,
                guard.generation
            );
            return false;
        }
        guard.options = match result {
            Ok(options) => options,
            Err(e) => {
                log::warn!("{}: search #{} failed: {}", self.id, generation, e);
                Vec::new()
            }
        };
        guard.phase = SearchPhase::Settled;
        self.dirty.store(true, Ordering::SeqCst);
        true
    }

    /// Dispatch a search for the current query and run it on the scheduler.
    fn run_search(&self) {
        let Some(source) = self.inner.read().ok().and_then(|g| g.source.clone()) else {
            return;
        };
        let Some(ticket) = self.dispatch_search() else {
            return;
        };
        let this = self.clone();
        self.scheduler.spawn(Box::pin(async move {
            let result = source.search(&ticket.query).await;
            this.apply_results(ticket.generation, result);
        }));
    }

    /// Tear the widget down: drop the pending debounce and make any in-flight
    /// search resolve as a no-op.
    pub fn unmount(&self) {
        let cancel = {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            guard.mounted = false;
            guard.generation += 1;
            guard.debounce_seq += 1;
            guard.phase = SearchPhase::Idle;
            guard.pending.take()
        };
        if let Some(token) = cancel {
            self.scheduler.cancel(token);
        }
        log::debug!("{}: unmounted", self.id);
    }

    /// Check if the widget is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.inner.read().map(|g| g.mounted).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the widget state has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
