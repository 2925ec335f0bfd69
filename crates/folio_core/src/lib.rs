//! Folio Core Runtime
//!
//! The primitives the page components are built on:
//!
//! - **Timers**: a virtual-time scheduler with cancellable one-shot callbacks,
//!   optionally driven from wall time on a background thread
//! - **Viewport**: element bounds, scroll position and intersection
//!   observation behind the [`IntersectionSource`] capability
//!
//! # Example
//!
//! ```rust
//! use folio_core::timer::TimerScheduler;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = TimerScheduler::new();
//! let fired = Arc::new(AtomicBool::new(false));
//!
//! let flag = fired.clone();
//! scheduler.schedule(Duration::from_millis(100), move || flag.store(true, Ordering::SeqCst));
//!
//! scheduler.advance(Duration::from_millis(99));
//! assert!(!fired.load(Ordering::SeqCst));
//!
//! scheduler.advance(Duration::from_millis(1));
//! assert!(fired.load(Ordering::SeqCst));
//! ```

pub mod error;
pub mod geometry;
pub mod timer;
pub mod viewport;

pub use error::{FolioError, Result};
pub use geometry::Bounds;
pub use timer::{TimerHandle, TimerId, TimerScheduler};
pub use viewport::{
    ElementId, IntersectionCallback, IntersectionSource, ObservationId, UnavailableViewport,
    Viewport,
};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the guard if a callback panicked while holding it
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
