//! Widget event types and the queue they are delivered through.
//!
//! Widgets push events while handling a user interaction. The host drains the
//! queue in the same turn and reacts (updating its canonical state, pushing
//! controlled values into other widgets). Controlled updates never produce
//! events, which keeps host -> widget -> host loops from forming.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::flags::FlagMap;

/// Identifies which host handler an event is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEventKind {
    /// Selection changed
    SelectionChange,
    /// Flag map changed
    FlagChange,
    /// A selection was refused because the limit was reached
    LimitReached,
}

/// A widget event to be dispatched to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// The user changed the selection. Carries the full resulting ID list in
    /// selection order.
    SelectionChange { widget_id: String, ids: Vec<String> },
    /// The user changed one flag. Carries the entire updated map.
    FlagChange { widget_id: String, flags: FlagMap },
    /// The user tried to select past `max`.
    LimitReached { widget_id: String, max: usize },
}

impl WidgetEvent {
    /// Which kind of event this is.
    pub fn kind(&self) -> WidgetEventKind {
        match self {
            WidgetEvent::SelectionChange { .. } => WidgetEventKind::SelectionChange,
            WidgetEvent::FlagChange { .. } => WidgetEventKind::FlagChange,
            WidgetEvent::LimitReached { .. } => WidgetEventKind::LimitReached,
        }
    }

    /// ID of the widget that produced the event.
    pub fn widget_id(&self) -> &str {
        match self {
            WidgetEvent::SelectionChange { widget_id, .. }
            | WidgetEvent::FlagChange { widget_id, .. }
            | WidgetEvent::LimitReached { widget_id, .. } => widget_id,
        }
    }
}

/// FIFO of pending widget events.
///
/// Cheap to clone; all clones share one queue so several widgets can report
/// to the same host.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<WidgetEvent>>>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    pub fn push(&self, event: WidgetEvent) {
        if let Ok(mut guard) = self.inner.lock() {
            log::trace!("widget event: {:?}", event);
            guard.push_back(event);
        }
    }

    /// Take every pending event in delivery order.
    pub fn drain(&self) -> Vec<WidgetEvent> {
        self.inner
            .lock()
            .map(|mut guard| guard.drain(..).collect())
            .unwrap_or_default()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// Check if no events are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
