//! Timer and task scheduling behind a swappable trait.
//!
//! Widgets never touch a clock directly. Debounce timers are scheduled and
//! cancelled by token, and async searches are handed to [`Scheduler::spawn`].
//! [`TokioScheduler`] runs them on a tokio runtime; [`ManualScheduler`] keeps a
//! virtual clock so tests decide exactly when timers fire and in which order
//! spawned searches resolve.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::runtime::{Handle, TryCurrentError};
use tokio_util::sync::CancellationToken;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl std::fmt::Display for TimerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Schedules delayed tasks and runs futures for widgets.
pub trait Scheduler: Send + Sync {
    /// Run `task` once `delay` has elapsed, unless cancelled first. `task`
    /// never runs before this returns, even with a zero delay.
    fn schedule(&self, delay: Duration, task: Task) -> TimerToken;

    /// Cancel a scheduled task. Unknown or already-fired tokens are ignored.
    fn cancel(&self, token: TimerToken);

    /// Drive a future to completion in the background.
    fn spawn(&self, future: BoxFuture<'static, ()>);
}

// =============================================================================
// Tokio
// =============================================================================

/// Scheduler backed by a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
    next_token: Arc<AtomicU64>,
    timers: Arc<Mutex<HashMap<TimerToken, CancellationToken>>>,
}

impl TokioScheduler {
    /// Create a scheduler on the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            next_token: Arc::new(AtomicU64::new(0)),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a scheduler on the runtime the caller is running in.
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.lock().map(|g| g.len()).unwrap_or(0)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerToken {
        let token = TimerToken(self.next_token.fetch_add(1, Ordering::SeqCst));
        let cancel = CancellationToken::new();
        if let Ok(mut guard) = self.timers.lock() {
            guard.insert(token, cancel.clone());
        }

        let timers = Arc::clone(&self.timers);
        self.handle.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Ok(mut guard) = timers.lock() {
                        guard.remove(&token);
                    }
                    task();
                }
            }
        });
        token
    }

    fn cancel(&self, token: TimerToken) {
        if let Ok(mut guard) = self.timers.lock()
            && let Some(cancel) = guard.remove(&token)
        {
            cancel.cancel();
        }
    }

    fn spawn(&self, future: BoxFuture<'static, ()>) {
        self.handle.spawn(future);
    }
}

// =============================================================================
// Manual (virtual clock)
// =============================================================================

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_token: u64,
    /// Keyed by (due time, token) so equal deadlines fire in schedule order.
    timers: BTreeMap<(Duration, u64), Task>,
    /// Spawned futures by spawn order. `None` once run.
    spawned: Vec<Option<BoxFuture<'static, ()>>>,
}

/// Deterministic scheduler with a virtual clock.
///
/// Timers only fire inside [`advance`](Self::advance). Spawned futures are
/// parked until [`run_spawned`](Self::run_spawned) drives one of them, so the
/// order in which async work completes is chosen by the caller.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("pending_timers", &self.pending_timers())
            .field("pending_spawned", &self.pending_spawned())
            .finish()
    }
}

impl ManualScheduler {
    /// Create a scheduler at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.lock().map(|g| g.now).unwrap_or_default()
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.inner.lock().map(|g| g.timers.len()).unwrap_or(0)
    }

    /// Number of spawned futures not yet run.
    pub fn pending_spawned(&self) -> usize {
        self.inner
            .lock()
            .map(|g| g.spawned.iter().filter(|f| f.is_some()).count())
            .unwrap_or(0)
    }

    /// Total number of futures spawned so far (run or not).
    pub fn spawned_count(&self) -> usize {
        self.inner.lock().map(|g| g.spawned.len()).unwrap_or(0)
    }

    /// Move the clock forward, firing every timer that comes due, in order.
    ///
    /// Tasks run without the scheduler lock held, so they may schedule,
    /// cancel or spawn.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let Ok(mut guard) = self.inner.lock() else {
                    return;
                };
                let due = guard
                    .timers
                    .keys()
                    .next()
                    .copied()
                    .filter(|(at, _)| *at <= target);
                match due {
                    Some(key) => {
                        guard.now = key.0;
                        guard.timers.remove(&key)
                    }
                    None => None,
                }
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        if let Ok(mut guard) = self.inner.lock() {
            guard.now = target;
        }
    }

    /// Run the spawned future with the given spawn index to completion.
    ///
    /// Returns false if there is no such future or it already ran.
    pub fn run_spawned(&self, index: usize) -> bool {
        let future = self
            .inner
            .lock()
            .ok()
            .and_then(|mut g| g.spawned.get_mut(index).and_then(Option::take));
        match future {
            Some(future) => {
                futures::executor::block_on(future);
                true
            }
            None => false,
        }
    }

    /// Run every pending spawned future in spawn order, including ones spawned
    /// while running. Returns how many ran.
    pub fn run_all_spawned(&self) -> usize {
        let mut ran = 0;
        let mut index = 0;
        while index < self.spawned_count() {
            if self.run_spawned(index) {
                ran += 1;
            }
            index += 1;
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerToken {
        let Ok(mut guard) = self.inner.lock() else {
            return TimerToken(u64::MAX);
        };
        let id = guard.next_token;
        guard.next_token += 1;
        let due = guard.now + delay;
        guard.timers.insert((due, id), task);
        TimerToken(id)
    }

    fn cancel(&self, token: TimerToken) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.timers.retain(|(_, id), _| *id != token.0);
        }
    }

    fn spawn(&self, future: BoxFuture<'static, ()>) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.spawned.push(Some(future));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_manual_timer_fires_at_deadline() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        scheduler.schedule(
            Duration::from_millis(500),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        scheduler.advance(Duration::from_millis(499));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn test_manual_cancel_prevents_firing() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let token = scheduler.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        scheduler.cancel(token);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_manual_spawned_run_in_chosen_order() {
        let scheduler = ManualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let log = Arc::clone(&log);
            scheduler.spawn(Box::pin(async move {
                log.lock().unwrap().push(name);
            }));
        }

        assert!(scheduler.run_spawned(2));
        assert!(scheduler.run_spawned(0));
        assert!(!scheduler.run_spawned(0));
        assert_eq!(scheduler.run_all_spawned(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["c", "a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_cancel_stops_timer() {
        let scheduler = TokioScheduler::current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let cancelled = scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let counter = Arc::clone(&fired);
        scheduler.schedule(
            Duration::from_millis(200),
            Box::new(move || {
                counter.fetch_add(10, Ordering::SeqCst);
            }),
        );
        scheduler.cancel(cancelled);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 10);
        assert_eq!(scheduler.pending_timers(), 0);
    }
}
