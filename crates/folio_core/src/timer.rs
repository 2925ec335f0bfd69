//! Timer scheduler
//!
//! One-shot callbacks keyed by [`TimerId`] on a virtual clock. Components
//! chain their own ticks by scheduling the next callback from inside the
//! current one, and cancel whatever is still pending when they are torn down.
//!
//! Time only moves when told to:
//! - `advance()` / `advance_to_next()` move the clock deterministically
//!   (tests, headless timelines)
//! - `start_background()` moves it from wall time on a dedicated thread
//!
//! Callbacks always run with the scheduler unlocked, so they may schedule or
//! cancel further timers.
//!
//! ```ignore
//! let scheduler = TimerScheduler::new();
//! let handle = scheduler.handle();
//!
//! let id = handle.schedule(Duration::from_millis(500), || println!("tick")).unwrap();
//! handle.cancel(id);
//! ```

use crate::lock;
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a pending timer
    pub struct TimerId;
}

/// Callback fired when a timer comes due
pub type TimerCallback = Box<dyn FnOnce() + Send>;

struct PendingTimer {
    deadline: Duration,
    /// Scheduling order, breaks ties between equal deadlines
    seq: u64,
    callback: TimerCallback,
}

/// Internal state of the timer scheduler
struct TimerInner {
    timers: SlotMap<TimerId, PendingTimer>,
    now: Duration,
    next_seq: u64,
}

impl TimerInner {
    fn insert(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = self.now + delay;
        let id = self.timers.insert(PendingTimer {
            deadline,
            seq,
            callback,
        });
        tracing::trace!(?id, ?deadline, "timer scheduled");
        id
    }

    fn remove(&mut self, id: TimerId) -> bool {
        let removed = self.timers.remove(id).is_some();
        if removed {
            tracing::trace!(?id, "timer cancelled");
        }
        removed
    }

    /// Earliest timer due at or before `until`
    fn next_due(&self, until: Duration) -> Option<TimerId> {
        self.timers
            .iter()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(id, _)| id)
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|t| t.deadline).min()
    }
}

/// Fire every timer due at or before `target`, then leave the clock at `target`
fn run_until(inner: &Mutex<TimerInner>, target: Duration) -> usize {
    let mut fired = 0;
    loop {
        let callback = {
            let mut guard = lock(inner);
            let Some(id) = guard.next_due(target) else {
                if guard.now < target {
                    guard.now = target;
                }
                break;
            };
            let Some(timer) = guard.timers.remove(id) else {
                break;
            };
            if guard.now < timer.deadline {
                guard.now = timer.deadline;
            }
            timer.callback
        };

        callback();
        fired += 1;
    }
    fired
}

/// Owner of the virtual clock and all pending timers
///
/// Typically created once by the page runtime and shared with components
/// via [`TimerHandle`].
pub struct TimerScheduler {
    inner: Arc<Mutex<TimerInner>>,
    /// Stop signal for the background thread
    stop_flag: Arc<AtomicBool>,
    /// Background thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                timers: SlotMap::with_key(),
                now: Duration::ZERO,
                next_seq: 0,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> TimerHandle {
        TimerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        lock(&self.inner).now
    }

    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        lock(&self.inner).insert(delay, Box::new(callback))
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        lock(&self.inner).remove(id)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        lock(&self.inner).timers.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.inner).timers.len()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        lock(&self.inner).next_deadline()
    }

    /// Move the clock forward, firing due timers in deadline order
    ///
    /// Timers scheduled by a callback fire in the same call if their deadline
    /// falls inside the window. Returns the number of callbacks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        run_until(&self.inner, target)
    }

    /// Jump to the earliest pending deadline and fire everything due there
    ///
    /// Returns false when nothing is pending.
    pub fn advance_to_next(&self) -> bool {
        match self.next_deadline() {
            Some(deadline) => {
                run_until(&self.inner, deadline);
                true
            }
            None => false,
        }
    }

    /// Drive the clock from wall time on a background thread
    ///
    /// Callbacks then run on that thread. Call `stop_background()` (or drop
    /// the scheduler) to join it.
    pub fn start_background(&mut self, resolution: Duration) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let origin = self.now();
        tracing::debug!(?resolution, "timer thread starting");

        self.thread_handle = Some(thread::spawn(move || {
            let started = Instant::now();
            while !stop_flag.load(Ordering::Relaxed) {
                thread::sleep(resolution);
                run_until(&inner, origin + started.elapsed());
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            tracing::debug!("timer thread stopped");
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// A weak handle to the timer scheduler
///
/// Components hold this rather than the scheduler itself. Every operation is
/// a no-op once the scheduler has been dropped.
#[derive(Clone)]
pub struct TimerHandle {
    inner: Weak<Mutex<TimerInner>>,
}

impl TimerHandle {
    /// Schedule a one-shot callback `delay` after the current virtual time
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> Option<TimerId>
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).insert(delay, Box::new(callback)))
    }

    /// Cancel a pending timer
    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).remove(id))
            .unwrap_or(false)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).timers.contains_key(id))
            .unwrap_or(false)
    }

    /// Current virtual time, or None if the scheduler is gone
    pub fn now(&self) -> Option<Duration> {
        self.inner.upgrade().map(|inner| lock(&inner).now)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
