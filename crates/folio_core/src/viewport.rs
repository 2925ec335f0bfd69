//! Viewport intersection observation
//!
//! Components that care whether an element is on screen go through the
//! [`IntersectionSource`] capability rather than a concrete viewport:
//!
//! - `observe(element, on_change)` registers interest and returns an
//!   [`ObservationId`]
//! - `release(id)` gives the observation back
//!
//! [`Viewport`] implements it geometrically from mounted element bounds and a
//! vertical scroll band. [`UnavailableViewport`] stands in for runtimes with
//! no observation support at all.
//!
//! Notifications follow the platform observer: one initial notification with
//! the current state when observation starts, then one per boundary crossing.

use crate::error::{FolioError, Result};
use crate::geometry::Bounds;
use crate::lock;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex};

new_key_type! {
    /// Handle to a mounted element
    pub struct ElementId;
    /// Handle to an active intersection observation
    pub struct ObservationId;
}

/// Receives `true` when the element enters the viewport and `false` when it leaves
pub type IntersectionCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Capability for observing whether an element intersects the viewport
pub trait IntersectionSource: Send + Sync {
    /// Begin observing `element`
    fn observe(
        &self,
        element: ElementId,
        on_change: IntersectionCallback,
    ) -> Result<ObservationId>;

    /// Stop an observation. Returns false if it was already released.
    fn release(&self, observation: ObservationId) -> bool;
}

struct Observation {
    element: ElementId,
    callback: IntersectionCallback,
    /// Last state delivered to the callback
    intersecting: bool,
}

/// Internal viewport state
struct ViewportInner {
    elements: SlotMap<ElementId, Bounds>,
    observations: SlotMap<ObservationId, Observation>,
    by_element: FxHashMap<ElementId, SmallVec<[ObservationId; 2]>>,
    scroll_y: f32,
    height: f32,
}

impl ViewportInner {
    fn intersects(&self, element: ElementId) -> bool {
        self.elements
            .get(element)
            .map(|b| b.overlaps_band(self.scroll_y, self.height))
            .unwrap_or(false)
    }

    /// Recompute every observation and collect the callbacks whose state flipped
    fn collect_changes(&mut self) -> Vec<(IntersectionCallback, bool)> {
        let mut changes = Vec::new();
        let ids: Vec<ObservationId> = self.observations.keys().collect();
        for id in ids {
            let Some(element) = self.observations.get(id).map(|o| o.element) else {
                continue;
            };
            let now = self.intersects(element);
            if let Some(obs) = self.observations.get_mut(id) {
                if obs.intersecting != now {
                    obs.intersecting = now;
                    changes.push((obs.callback.clone(), now));
                }
            }
        }
        changes
    }

    fn remove_observation(&mut self, id: ObservationId) -> bool {
        let Some(obs) = self.observations.remove(id) else {
            return false;
        };
        if let Some(list) = self.by_element.get_mut(&obs.element) {
            list.retain(|o| *o != id);
            if list.is_empty() {
                self.by_element.remove(&obs.element);
            }
        }
        true
    }
}

fn deliver(changes: Vec<(IntersectionCallback, bool)>) {
    for (callback, intersecting) in changes {
        callback(intersecting);
    }
}

/// Geometric viewport: a vertical band over mounted element bounds
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Viewport {
    inner: Arc<Mutex<ViewportInner>>,
}

impl Viewport {
    /// Create a viewport of the given visible height, scrolled to the top
    pub fn new(height: f32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewportInner {
                elements: SlotMap::with_key(),
                observations: SlotMap::with_key(),
                by_element: FxHashMap::default(),
                scroll_y: 0.0,
                height: height.max(0.0),
            })),
        }
    }

    /// Register a laid-out element
    pub fn mount(&self, bounds: Bounds) -> ElementId {
        let id = lock(&self.inner).elements.insert(bounds);
        tracing::trace!(?id, ?bounds, "element mounted");
        id
    }

    /// Remove an element along with every observation still attached to it
    ///
    /// Released observations receive no further notifications.
    pub fn unmount(&self, element: ElementId) -> bool {
        let mut inner = lock(&self.inner);
        if inner.elements.remove(element).is_none() {
            return false;
        }
        let observations = inner.by_element.remove(&element).unwrap_or_default();
        for id in &observations {
            inner.observations.remove(*id);
        }
        tracing::trace!(?element, released = observations.len(), "element unmounted");
        true
    }

    /// Update an element's bounds after relayout
    pub fn set_bounds(&self, element: ElementId, bounds: Bounds) -> Result<()> {
        let changes = {
            let mut inner = lock(&self.inner);
            let slot = inner
                .elements
                .get_mut(element)
                .ok_or(FolioError::UnknownElement(element))?;
            *slot = bounds;
            inner.collect_changes()
        };
        deliver(changes);
        Ok(())
    }

    /// Apply a new visible height and new element bounds in one step
    ///
    /// Intersections are recomputed once, against the finished layout, so an
    /// element never reports the state of a half-applied resize. Fails
    /// without changing anything if any element is unknown.
    pub fn relayout(&self, height: f32, moves: &[(ElementId, Bounds)]) -> Result<()> {
        let changes = {
            let mut inner = lock(&self.inner);
            if let Some((element, _)) = moves
                .iter()
                .find(|(element, _)| !inner.elements.contains_key(*element))
            {
                return Err(FolioError::UnknownElement(*element));
            }
            inner.height = height.max(0.0);
            for (element, bounds) in moves {
                if let Some(slot) = inner.elements.get_mut(*element) {
                    *slot = *bounds;
                }
            }
            inner.collect_changes()
        };
        deliver(changes);
        Ok(())
    }

    pub fn bounds(&self, element: ElementId) -> Option<Bounds> {
        lock(&self.inner).elements.get(element).copied()
    }

    /// Scroll so the band starts at `y` (clamped at 0)
    pub fn scroll_to(&self, y: f32) {
        let changes = {
            let mut inner = lock(&self.inner);
            inner.scroll_y = y.max(0.0);
            inner.collect_changes()
        };
        deliver(changes);
    }

    /// Change the visible height (window resize)
    pub fn resize(&self, height: f32) {
        let changes = {
            let mut inner = lock(&self.inner);
            inner.height = height.max(0.0);
            inner.collect_changes()
        };
        deliver(changes);
    }

    pub fn scroll_y(&self) -> f32 {
        lock(&self.inner).scroll_y
    }

    pub fn height(&self) -> f32 {
        lock(&self.inner).height
    }

    /// Check if an element currently intersects the visible band
    pub fn is_intersecting(&self, element: ElementId) -> bool {
        lock(&self.inner).intersects(element)
    }

    pub fn element_count(&self) -> usize {
        lock(&self.inner).elements.len()
    }

    pub fn observation_count(&self) -> usize {
        lock(&self.inner).observations.len()
    }
}

impl IntersectionSource for Viewport {
    fn observe(
        &self,
        element: ElementId,
        on_change: IntersectionCallback,
    ) -> Result<ObservationId> {
        let (id, initial) = {
            let mut inner = lock(&self.inner);
            if !inner.elements.contains_key(element) {
                return Err(FolioError::UnknownElement(element));
            }
            let intersecting = inner.intersects(element);
            let id = inner.observations.insert(Observation {
                element,
                callback: on_change.clone(),
                intersecting,
            });
            inner.by_element.entry(element).or_default().push(id);
            (id, intersecting)
        };
        tracing::trace!(?id, ?element, initial, "observation started");

        on_change(initial);
        Ok(id)
    }

    fn release(&self, observation: ObservationId) -> bool {
        let released = lock(&self.inner).remove_observation(observation);
        if released {
            tracing::trace!(?observation, "observation released");
        }
        released
    }
}

/// Intersection source for runtimes without observation support
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableViewport;

impl IntersectionSource for UnavailableViewport {
    fn observe(
        &self,
        _element: ElementId,
        _on_change: IntersectionCallback,
    ) -> Result<ObservationId> {
        Err(FolioError::ObserverUnavailable(
            "runtime has no intersection observer".to_string(),
        ))
    }

    fn release(&self, _observation: ObservationId) -> bool {
        false
    }
}
