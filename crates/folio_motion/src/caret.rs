//! Caret blink
//!
//! Toggles a visibility flag on a fixed interval for as long as the owner
//! lives. The blink is unsynchronized with whatever the caret is attached to;
//! typing progress never resets or delays it.
//!
//! Each caret owns its own timer chain. Dropping the caret (or calling
//! `stop()`) cancels the pending toggle.

use folio_core::{lock, TimerHandle, TimerId};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// Called with the new visibility after every toggle
pub type ToggleListener = Arc<dyn Fn(bool) + Send + Sync>;

struct CaretShared {
    interval: Duration,
    pending: Option<TimerId>,
    cancelled: bool,
    toggles: u64,
    listeners: SmallVec<[ToggleListener; 1]>,
}

/// An independently blinking caret
pub struct CaretBlink {
    shared: Arc<Mutex<CaretShared>>,
    visible: Arc<AtomicBool>,
    timers: TimerHandle,
}

impl CaretBlink {
    /// Start blinking, visible first, toggling every `interval`
    ///
    /// A zero interval disables blinking: the caret stays visible and no
    /// timer is scheduled.
    pub fn start(timers: TimerHandle, interval: Duration) -> Self {
        let caret = Self {
            shared: Arc::new(Mutex::new(CaretShared {
                interval,
                pending: None,
                cancelled: false,
                toggles: 0,
                listeners: SmallVec::new(),
            })),
            visible: Arc::new(AtomicBool::new(true)),
            timers,
        };

        if interval.is_zero() {
            tracing::debug!("caret blink disabled (zero interval)");
        } else {
            let mut guard = lock(&caret.shared);
            schedule_toggle(
                Arc::downgrade(&caret.shared),
                &mut guard,
                &caret.visible,
                &caret.timers,
            );
        }
        caret
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Shared visibility flag, for owners that render the caret elsewhere
    pub fn visibility(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.visible)
    }

    /// Number of toggles so far
    pub fn toggles(&self) -> u64 {
        lock(&self.shared).toggles
    }

    pub fn interval(&self) -> Duration {
        lock(&self.shared).interval
    }

    /// Check if a toggle is pending
    pub fn is_running(&self) -> bool {
        let guard = lock(&self.shared);
        !guard.cancelled && guard.pending.is_some()
    }

    pub fn on_toggle<F>(&self, listener: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        lock(&self.shared).listeners.push(Arc::new(listener));
    }

    /// Stop blinking and cancel the pending toggle
    pub fn stop(&mut self) {
        let pending = {
            let mut guard = lock(&self.shared);
            guard.cancelled = true;
            guard.pending.take()
        };
        if let Some(id) = pending {
            self.timers.cancel(id);
        }
    }
}

impl Drop for CaretBlink {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule_toggle(
    weak: Weak<Mutex<CaretShared>>,
    shared: &mut CaretShared,
    visible: &Arc<AtomicBool>,
    timers: &TimerHandle,
) {
    let visible = Arc::clone(visible);
    let next_timers = timers.clone();
    shared.pending = timers.schedule(shared.interval, move || toggle(weak, visible, next_timers));
}

fn toggle(weak: Weak<Mutex<CaretShared>>, visible: Arc<AtomicBool>, timers: TimerHandle) {
    let Some(shared) = weak.upgrade() else {
        return;
    };

    let (now_visible, listeners) = {
        let mut guard = lock(&shared);
        if guard.cancelled {
            return;
        }
        guard.pending = None;

        let now_visible = !visible.load(Ordering::SeqCst);
        visible.store(now_visible, Ordering::SeqCst);
        guard.toggles += 1;

        schedule_toggle(Arc::downgrade(&shared), &mut guard, &visible, &timers);
        (now_visible, guard.listeners.clone())
    };

    for listener in &listeners {
        listener(now_visible);
    }
}
