//! Scroll-triggered reveal
//!
//! A [`Reveal`] wraps one element and flips it from hidden to visible the
//! first time it intersects the viewport. The flip is one-way: later
//! intersection changes are ignored and the observation is released as soon
//! as the element has been seen.
//!
//! Detection and presentation are separate. The entry delay in
//! [`RevealStyle`] only shifts the visual transition; `is_visible()` turns
//! true the moment the element intersects.
//!
//! If the runtime cannot observe intersections at all, the reveal fails open
//! and shows its content immediately.

use folio_core::{lock, ElementId, IntersectionSource, ObservationId, TimerHandle};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// Visual parameters of a reveal transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealStyle {
    /// Length of the hidden-to-visible transition
    pub duration: Duration,
    /// Wait before the transition starts once visible
    pub delay: Duration,
    /// Downward offset of the hidden presentation, in pixels
    pub offset_px: f32,
    /// Opacity of the hidden presentation
    pub hidden_opacity: f32,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1000),
            delay: Duration::ZERO,
            offset_px: 40.0,
            hidden_opacity: 0.0,
        }
    }
}

impl RevealStyle {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// The resting presentation for either state
    pub fn presentation(&self, visible: bool) -> Presentation {
        if visible {
            Presentation::VISIBLE
        } else {
            Presentation {
                opacity: self.hidden_opacity,
                translate_y: self.offset_px,
            }
        }
    }

    /// Presentation `elapsed` after the element became visible
    ///
    /// Holds the hidden presentation through the delay, then eases out
    /// (cubic) to the visible one over `duration`.
    pub fn sample(&self, elapsed: Duration) -> Presentation {
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return self.presentation(false);
        };
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (running.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
        };
        self.presentation(false)
            .lerp(&Presentation::VISIBLE, ease_out_cubic(progress))
    }

    /// Check if the transition has finished `elapsed` after becoming visible
    pub fn is_settled(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// What the rendering layer applies to a revealed element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presentation {
    pub opacity: f32,
    pub translate_y: f32,
}

impl Presentation {
    pub const VISIBLE: Presentation = Presentation {
        opacity: 1.0,
        translate_y: 0.0,
    };

    pub fn lerp(&self, other: &Presentation, t: f32) -> Presentation {
        Presentation {
            opacity: self.opacity + (other.opacity - self.opacity) * t,
            translate_y: self.translate_y + (other.translate_y - self.translate_y) * t,
        }
    }
}

/// Monotonic reveal flag
///
/// Starts hidden. The first intersecting notification makes it visible and
/// nothing makes it hidden again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealState {
    visible: bool,
    revealed_at: Option<Duration>,
}

impl RevealState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Clock time of the reveal, when a clock was available
    pub fn revealed_at(&self) -> Option<Duration> {
        self.revealed_at
    }

    /// Apply an intersection notification
    ///
    /// Returns true only for the notification that made the state visible.
    pub fn on_intersect(&mut self, intersecting: bool, now: Option<Duration>) -> bool {
        if !intersecting || self.visible {
            return false;
        }
        self.visible = true;
        self.revealed_at = now;
        true
    }
}

/// Called once, when the element is revealed
pub type RevealListener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct RevealShared {
    state: RevealState,
    element: Option<ElementId>,
    observation: Option<ObservationId>,
    detached: bool,
    listeners: SmallVec<[RevealListener; 1]>,
}

/// Result of the notification that revealed the element
struct Revealed {
    observation: Option<ObservationId>,
    listeners: SmallVec<[RevealListener; 1]>,
}

impl Revealed {
    fn notify(&self) {
        for listener in &self.listeners {
            listener();
        }
    }
}

fn apply_intersect(
    shared: &Mutex<RevealShared>,
    clock: Option<&TimerHandle>,
    intersecting: bool,
) -> Option<Revealed> {
    let mut guard = lock(shared);
    if guard.detached {
        return None;
    }
    let now = clock.and_then(TimerHandle::now);
    if !guard.state.on_intersect(intersecting, now) {
        return None;
    }
    tracing::debug!(element = ?guard.element, "element revealed");
    Some(Revealed {
        observation: guard.observation.take(),
        listeners: guard.listeners.clone(),
    })
}

/// Reveal controller for one element
///
/// `attach()` starts observing; dropping the reveal (or `detach()`) releases
/// the observation if it is still held. The observation is released exactly
/// once, either on reveal or on detach, and callbacks arriving after
/// detach are ignored.
pub struct Reveal {
    shared: Arc<Mutex<RevealShared>>,
    style: RevealStyle,
    clock: Option<TimerHandle>,
    source: Option<Arc<dyn IntersectionSource>>,
}

impl Reveal {
    pub fn new(style: RevealStyle) -> Self {
        Self {
            shared: Arc::new(Mutex::new(RevealShared::default())),
            style,
            clock: None,
            source: None,
        }
    }

    /// Timestamp reveals on this clock so the transition can be sampled
    pub fn with_clock(mut self, clock: TimerHandle) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Begin observing `element`
    ///
    /// A reveal observes a single element for its whole life; further calls
    /// are ignored. A remounted element gets a fresh `Reveal`.
    pub fn attach(&mut self, source: Arc<dyn IntersectionSource>, element: ElementId) {
        {
            let mut guard = lock(&self.shared);
            if guard.detached || guard.element.is_some() {
                tracing::warn!(?element, "reveal already attached, ignoring");
                return;
            }
            guard.element = Some(element);
        }

        let weak_shared = Arc::downgrade(&self.shared);
        let weak_source: Weak<dyn IntersectionSource> = Arc::downgrade(&source);
        let clock = self.clock.clone();
        let on_change = Arc::new(move |intersecting: bool| {
            let Some(shared) = weak_shared.upgrade() else {
                return;
            };
            let Some(revealed) = apply_intersect(&shared, clock.as_ref(), intersecting) else {
                return;
            };
            if let (Some(id), Some(source)) = (revealed.observation, weak_source.upgrade()) {
                source.release(id);
            }
            revealed.notify();
        });

        // The source may notify synchronously, so no lock is held here
        let observed = source.observe(element, on_change);
        self.source = Some(Arc::clone(&source));

        match observed {
            Ok(id) => {
                let keep = {
                    let mut guard = lock(&self.shared);
                    let keep = !guard.state.is_visible() && !guard.detached;
                    if keep {
                        guard.observation = Some(id);
                    }
                    keep
                };
                if keep {
                    tracing::debug!(?element, observation = ?id, "reveal observing");
                } else {
                    // Already seen during the initial notification
                    source.release(id);
                }
            }
            Err(err) => {
                tracing::warn!(?element, %err, "intersection observation failed, revealing immediately");
                if let Some(revealed) = apply_intersect(&self.shared, self.clock.as_ref(), true) {
                    revealed.notify();
                }
            }
        }
    }

    /// Deliver an intersection state change
    ///
    /// Returns true if this change revealed the element.
    pub fn on_intersect(&self, intersecting: bool) -> bool {
        let Some(revealed) = apply_intersect(&self.shared, self.clock.as_ref(), intersecting) else {
            return false;
        };
        if let (Some(id), Some(source)) = (revealed.observation, self.source.as_ref()) {
            source.release(id);
        }
        revealed.notify();
        true
    }

    pub fn is_visible(&self) -> bool {
        lock(&self.shared).state.is_visible()
    }

    pub fn state(&self) -> RevealState {
        lock(&self.shared).state
    }

    pub fn element(&self) -> Option<ElementId> {
        lock(&self.shared).element
    }

    /// Check if an observation is still held
    pub fn is_observing(&self) -> bool {
        lock(&self.shared).observation.is_some()
    }

    pub fn style(&self) -> &RevealStyle {
        &self.style
    }

    pub fn on_reveal<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        lock(&self.shared).listeners.push(Arc::new(listener));
    }

    /// Presentation at the clock's current time
    pub fn presentation(&self) -> Presentation {
        match self.clock.as_ref().and_then(TimerHandle::now) {
            Some(now) => self.presentation_at(now),
            None => self.style.presentation(self.is_visible()),
        }
    }

    /// Presentation at clock time `now`
    pub fn presentation_at(&self, now: Duration) -> Presentation {
        let state = self.state();
        match (state.is_visible(), state.revealed_at()) {
            (false, _) => self.style.presentation(false),
            (true, Some(at)) => self.style.sample(now.saturating_sub(at)),
            (true, None) => self.style.presentation(true),
        }
    }

    /// Stop observing, releasing the observation if it is still held
    pub fn detach(&mut self) {
        let observation = {
            let mut guard = lock(&self.shared);
            if guard.detached {
                return;
            }
            guard.detached = true;
            guard.observation.take()
        };
        if let (Some(id), Some(source)) = (observation, self.source.as_ref()) {
            source.release(id);
            tracing::debug!(observation = ?id, "reveal detached before intersecting");
        }
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        self.detach();
    }
}
