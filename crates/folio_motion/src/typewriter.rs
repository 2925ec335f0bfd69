//! Typewriter text animation
//!
//! Cycles forever through an ordered list of phrases:
//!
//! ```text
//! Typing ──(full phrase)──► Holding ──(pause)──► Deleting ──(empty)──► Typing (next phrase)
//! ```
//!
//! [`TypewriterState`] is the pure machine: each `advance()` performs one
//! transition and returns how long to wait before the next one.
//! [`Typewriter`] runs that machine on the timer scheduler, one tick per
//! timer, alongside a [`CaretBlink`].
//!
//! Characters are grapheme clusters, so accented letters and emoji are typed
//! as a single step.
//!
//! # Example
//!
//! ```rust
//! use folio_core::TimerScheduler;
//! use folio_motion::{Typewriter, TypewriterTiming};
//! use std::time::Duration;
//!
//! let scheduler = TimerScheduler::new();
//! let typewriter = Typewriter::start(
//!     scheduler.handle(),
//!     ["Hi", "Yo"],
//!     TypewriterTiming::default(),
//! );
//!
//! scheduler.advance(Duration::from_millis(200));
//! assert_eq!(typewriter.text(), "Hi");
//! ```

use crate::caret::CaretBlink;
use folio_core::{lock, TimerHandle, TimerId};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Delays between typewriter transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypewriterTiming {
    /// Delay after typing a character
    pub type_delay: Duration,
    /// Delay after deleting a character
    pub delete_delay: Duration,
    /// Hold on the fully typed phrase before deleting
    pub pause: Duration,
    /// Caret toggle interval
    pub blink_interval: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            type_delay: Duration::from_millis(100),
            delete_delay: Duration::from_millis(50),
            pause: Duration::from_millis(2000),
            blink_interval: Duration::from_millis(500),
        }
    }
}

impl TypewriterTiming {
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Clamp the transition delays to at least 1ms
    ///
    /// A zero-delay chain would never let the clock move on.
    pub fn normalized(self) -> Self {
        let floor = Duration::from_millis(1);
        Self {
            type_delay: self.type_delay.max(floor),
            delete_delay: self.delete_delay.max(floor),
            pause: self.pause.max(floor),
            blink_interval: self.blink_interval,
        }
    }
}

/// Direction the current phrase is moving in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Typing,
    Deleting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Typing,
    /// Fully typed, waiting out the pause before reversing
    Holding,
    Deleting,
}

#[derive(Clone, Debug)]
struct Phrase {
    text: String,
    /// Byte offset of the end of each grapheme
    ends: Vec<usize>,
}

impl Phrase {
    fn new(text: String) -> Self {
        let ends = text
            .grapheme_indices(true)
            .map(|(start, g)| start + g.len())
            .collect();
        Self { text, ends }
    }

    fn len(&self) -> usize {
        self.ends.len()
    }

    fn prefix(&self, count: usize) -> &str {
        match count.checked_sub(1).and_then(|i| self.ends.get(i)) {
            Some(&end) => &self.text[..end],
            None => "",
        }
    }
}

/// Pure typewriter state machine
///
/// Invariants:
/// - `char_count` only grows while typing and only shrinks while deleting,
///   and stays within `0..=len(current phrase)`
/// - `phrase_index` advances (wrapping) only when deleting empties the phrase
#[derive(Clone, Debug)]
pub struct TypewriterState {
    phrases: Vec<Phrase>,
    phrase_index: usize,
    char_count: usize,
    phase: Phase,
}

impl TypewriterState {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| Phrase::new(p.into()))
                .collect(),
            phrase_index: 0,
            char_count: 0,
            phase: Phase::Typing,
        }
    }

    /// An empty phrase list makes the machine inert
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    /// Number of characters currently displayed
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn direction(&self) -> Direction {
        match self.phase {
            Phase::Typing | Phase::Holding => Direction::Typing,
            Phase::Deleting => Direction::Deleting,
        }
    }

    /// Check if the phrase is fully typed and waiting out the pause
    pub fn is_holding(&self) -> bool {
        self.phase == Phase::Holding
    }

    pub fn current_phrase(&self) -> Option<&str> {
        self.phrases.get(self.phrase_index).map(|p| p.text.as_str())
    }

    /// Length of the current phrase in characters
    pub fn current_len(&self) -> usize {
        self.phrases
            .get(self.phrase_index)
            .map(Phrase::len)
            .unwrap_or(0)
    }

    /// The displayed prefix of the current phrase
    pub fn display(&self) -> &str {
        self.phrases
            .get(self.phrase_index)
            .map(|p| p.prefix(self.char_count))
            .unwrap_or("")
    }

    /// Perform one transition and return the delay before the next
    ///
    /// Returns `None` only for an empty phrase list.
    pub fn advance(&mut self, timing: &TypewriterTiming) -> Option<Duration> {
        if self.phrases.is_empty() {
            return None;
        }
        let len = self.current_len();

        let delay = match self.phase {
            Phase::Typing if self.char_count < len => {
                self.char_count += 1;
                timing.type_delay
            }
            Phase::Typing => {
                self.phase = Phase::Holding;
                timing.pause
            }
            Phase::Holding => {
                self.phase = Phase::Deleting;
                timing.delete_delay
            }
            Phase::Deleting if self.char_count > 1 => {
                self.char_count -= 1;
                timing.delete_delay
            }
            Phase::Deleting => {
                // Emptied: move straight on to the next phrase
                self.char_count = 0;
                self.phase = Phase::Typing;
                self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
                timing.type_delay
            }
        };
        Some(delay)
    }
}

/// What the rendering layer paints for a typewriter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterFrame {
    pub text: String,
    pub caret_visible: bool,
}

/// Called whenever the text or the caret changes
pub type FrameListener = Arc<dyn Fn(&TypewriterFrame) + Send + Sync>;

struct TypewriterShared {
    state: TypewriterState,
    timing: TypewriterTiming,
    pending: Option<TimerId>,
    cancelled: bool,
    caret_visible: Arc<AtomicBool>,
    listeners: SmallVec<[FrameListener; 2]>,
}

impl TypewriterShared {
    fn frame(&self) -> TypewriterFrame {
        TypewriterFrame {
            text: self.state.display().to_string(),
            caret_visible: self.caret_visible.load(Ordering::SeqCst),
        }
    }
}

/// A running typewriter
///
/// Mounting is `start()`; unmounting is dropping (or `stop()`), which
/// cancels the pending tick and the caret blink so nothing fires afterwards.
///
/// With an empty phrase list the typewriter is inert: the text is empty, the
/// caret is hidden, and no timer is ever scheduled.
pub struct Typewriter {
    shared: Arc<Mutex<TypewriterShared>>,
    caret: Option<CaretBlink>,
    timers: TimerHandle,
}

impl Typewriter {
    /// Start typing the first phrase
    pub fn start<I, S>(timers: TimerHandle, phrases: I, timing: TypewriterTiming) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let timing = timing.normalized();
        let state = TypewriterState::new(phrases);

        if state.is_empty() {
            tracing::debug!("typewriter has no phrases, staying inert");
            return Self {
                shared: Arc::new(Mutex::new(TypewriterShared {
                    state,
                    timing,
                    pending: None,
                    cancelled: false,
                    caret_visible: Arc::new(AtomicBool::new(false)),
                    listeners: SmallVec::new(),
                })),
                caret: None,
                timers,
            };
        }

        let caret = CaretBlink::start(timers.clone(), timing.blink_interval);
        tracing::debug!(phrases = state.phrase_count(), "typewriter started");

        let shared = Arc::new(Mutex::new(TypewriterShared {
            state,
            timing,
            pending: None,
            cancelled: false,
            caret_visible: caret.visibility(),
            listeners: SmallVec::new(),
        }));

        let weak = Arc::downgrade(&shared);
        caret.on_toggle(move |_| {
            if let Some(shared) = weak.upgrade() {
                publish(&shared);
            }
        });

        {
            let mut guard = lock(&shared);
            schedule_tick(Arc::downgrade(&shared), &mut guard, &timers, timing.type_delay);
        }

        Self {
            shared,
            caret: Some(caret),
            timers,
        }
    }

    /// Current text and caret visibility
    pub fn frame(&self) -> TypewriterFrame {
        lock(&self.shared).frame()
    }

    pub fn text(&self) -> String {
        lock(&self.shared).state.display().to_string()
    }

    pub fn caret_visible(&self) -> bool {
        self.caret.as_ref().is_some_and(CaretBlink::is_visible)
    }

    /// Snapshot of the underlying state machine
    pub fn state(&self) -> TypewriterState {
        lock(&self.shared).state.clone()
    }

    pub fn timing(&self) -> TypewriterTiming {
        lock(&self.shared).timing
    }

    /// Check if a typing tick is pending
    pub fn is_running(&self) -> bool {
        let guard = lock(&self.shared);
        !guard.cancelled && guard.pending.is_some()
    }

    /// Register a listener for text and caret changes
    pub fn on_frame<F>(&self, listener: F)
    where
        F: Fn(&TypewriterFrame) + Send + Sync + 'static,
    {
        lock(&self.shared).listeners.push(Arc::new(listener));
    }

    /// Tear down: cancel the pending tick and stop the caret
    pub fn stop(&mut self) {
        let pending = {
            let mut guard = lock(&self.shared);
            guard.cancelled = true;
            guard.pending.take()
        };
        if let Some(id) = pending {
            self.timers.cancel(id);
        }
        if let Some(caret) = self.caret.as_mut() {
            caret.stop();
        }
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule_tick(
    weak: Weak<Mutex<TypewriterShared>>,
    shared: &mut TypewriterShared,
    timers: &TimerHandle,
    delay: Duration,
) {
    let next_timers = timers.clone();
    shared.pending = timers.schedule(delay, move || tick(weak, next_timers));
}

fn tick(weak: Weak<Mutex<TypewriterShared>>, timers: TimerHandle) {
    let Some(shared) = weak.upgrade() else {
        return;
    };

    let (frame, listeners) = {
        let mut guard = lock(&shared);
        if guard.cancelled {
            return;
        }
        guard.pending = None;

        let timing = guard.timing;
        let Some(delay) = guard.state.advance(&timing) else {
            return;
        };
        tracing::trace!(
            phrase = guard.state.phrase_index(),
            chars = guard.state.char_count(),
            direction = ?guard.state.direction(),
            "typewriter tick"
        );

        schedule_tick(Arc::downgrade(&shared), &mut guard, &timers, delay);
        (guard.frame(), guard.listeners.clone())
    };

    for listener in &listeners {
        listener(&frame);
    }
}

fn publish(shared: &Mutex<TypewriterShared>) {
    let (frame, listeners) = {
        let guard = lock(shared);
        if guard.cancelled {
            return;
        }
        (guard.frame(), guard.listeners.clone())
    };
    for listener in &listeners {
        listener(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::TimerScheduler;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_state_scenario_two_phrases() {
        let timing = TypewriterTiming::default();
        let mut state = TypewriterState::new(["Hi", "Yo"]);
        assert_eq!(state.display(), "");
        assert_eq!(state.direction(), Direction::Typing);

        assert_eq!(state.advance(&timing), Some(ms(100)));
        assert_eq!(state.display(), "H");
        assert_eq!(state.advance(&timing), Some(ms(100)));
        assert_eq!(state.display(), "Hi");

        // Fully typed: hold for the pause
        assert_eq!(state.advance(&timing), Some(ms(2000)));
        assert!(state.is_holding());
        assert_eq!(state.display(), "Hi");

        // Pause over: reverse
        assert_eq!(state.advance(&timing), Some(ms(50)));
        assert_eq!(state.direction(), Direction::Deleting);

        assert_eq!(state.advance(&timing), Some(ms(50)));
        assert_eq!(state.display(), "H");
        assert_eq!(state.advance(&timing), Some(ms(100)));
        assert_eq!(state.char_count(), 0);
        assert_eq!(state.phrase_index(), 1);
        assert_eq!(state.direction(), Direction::Typing);

        state.advance(&timing);
        assert_eq!(state.display(), "Y");
        state.advance(&timing);
        assert_eq!(state.display(), "Yo");
    }

    #[test]
    fn test_display_progression() {
        let timing = TypewriterTiming::default();
        let mut state = TypewriterState::new(["Hi", "Yo"]);
        let mut shown = vec![state.display().to_string()];
        for _ in 0..8 {
            state.advance(&timing);
            let text = state.display().to_string();
            if shown.last() != Some(&text) {
                shown.push(text);
            }
        }
        assert_eq!(shown, vec!["", "H", "Hi", "H", "", "Y", "Yo"]);
    }

    #[test]
    fn test_visits_every_phrase_cyclically() {
        let timing = TypewriterTiming::default();
        let phrases = ["Photographer", "Backpacker", "Trailblazer"];
        let mut state = TypewriterState::new(phrases);
        let mut visits = vec![state.phrase_index()];

        for _ in 0..500 {
            state.advance(&timing);
            assert!(state.char_count() <= state.current_len());
            if visits.last() != Some(&state.phrase_index()) {
                visits.push(state.phrase_index());
            }
        }

        assert!(visits.len() > phrases.len() * 2);
        for (i, index) in visits.iter().enumerate() {
            assert_eq!(*index, i % phrases.len());
        }
    }

    #[test]
    fn test_count_moves_with_direction() {
        let timing = TypewriterTiming::default();
        let mut state = TypewriterState::new(["abc", "de"]);

        for _ in 0..200 {
            let before = (state.phrase_index(), state.char_count(), state.direction());
            state.advance(&timing);
            let after = (state.phrase_index(), state.char_count());

            if after.0 == before.0 {
                match before.2 {
                    Direction::Typing => assert!(after.1 >= before.1),
                    Direction::Deleting => assert!(after.1 <= before.1),
                }
            } else {
                // Index only moves when deleting empties the phrase
                assert_eq!(before.2, Direction::Deleting);
                assert_eq!(after.1, 0);
            }
        }
    }

    #[test]
    fn test_graphemes_type_as_one_character() {
        let timing = TypewriterTiming::default();
        let mut state = TypewriterState::new(["Café 🏔️"]);
        assert_eq!(state.current_len(), 6);

        for _ in 0..4 {
            state.advance(&timing);
        }
        assert_eq!(state.display(), "Café");
        state.advance(&timing);
        state.advance(&timing);
        assert_eq!(state.display(), "Café 🏔️");
    }

    #[test]
    fn test_single_phrase_loops_onto_itself() {
        let timing = TypewriterTiming::default();
        let mut state = TypewriterState::new(["a"]);

        state.advance(&timing); // "a"
        state.advance(&timing); // hold
        state.advance(&timing); // reverse
        state.advance(&timing); // "" and wrap
        assert_eq!(state.phrase_index(), 0);
        assert_eq!(state.direction(), Direction::Typing);
        state.advance(&timing);
        assert_eq!(state.display(), "a");
    }

    #[test]
    fn test_empty_state_is_inert() {
        let mut state = TypewriterState::new(Vec::<String>::new());
        assert_eq!(state.advance(&TypewriterTiming::default()), None);
        assert_eq!(state.display(), "");
        assert_eq!(state.current_phrase(), None);
    }

    #[test]
    fn test_typewriter_follows_timers() {
        let scheduler = TimerScheduler::new();
        let typewriter =
            Typewriter::start(scheduler.handle(), ["Hi", "Yo"], TypewriterTiming::default());

        assert_eq!(typewriter.text(), "");
        scheduler.advance(ms(100));
        assert_eq!(typewriter.text(), "H");
        scheduler.advance(ms(100));
        assert_eq!(typewriter.text(), "Hi");

        // t=300 enters the hold, t=2300 reverses, t=2350 deletes
        scheduler.advance(ms(2100));
        assert_eq!(typewriter.text(), "Hi");
        assert_eq!(typewriter.state().direction(), Direction::Deleting);
        scheduler.advance(ms(50));
        assert_eq!(typewriter.text(), "H");
        scheduler.advance(ms(50));
        assert_eq!(typewriter.text(), "");
        assert_eq!(typewriter.state().phrase_index(), 1);
        scheduler.advance(ms(100));
        assert_eq!(typewriter.text(), "Y");
    }

    #[test]
    fn test_caret_blinks_independently_of_typing() {
        let scheduler = TimerScheduler::new();
        let typewriter =
            Typewriter::start(scheduler.handle(), ["Hi"], TypewriterTiming::default());

        let mut toggles = Vec::new();
        let mut last = typewriter.caret_visible();
        for step in 1..=60 {
            scheduler.advance(ms(50));
            let now = typewriter.caret_visible();
            if now != last {
                toggles.push(step * 50);
                last = now;
            }
        }

        // Every 500ms, straight through typing, holding and deleting
        assert_eq!(toggles, vec![500, 1000, 1500, 2000, 2500, 3000]);
    }

    #[test]
    fn test_frame_listener() {
        let scheduler = TimerScheduler::new();
        let typewriter =
            Typewriter::start(scheduler.handle(), ["Hi"], TypewriterTiming::default());
        let frames = Arc::new(Mutex::new(Vec::new()));

        let sink = frames.clone();
        typewriter.on_frame(move |f| sink.lock().unwrap().push(f.clone()));
        scheduler.advance(ms(500));

        let frames = frames.lock().unwrap();
        let texts: Vec<&str> = frames.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["H", "Hi", "Hi", "Hi"]);
        // The last frame is the caret toggle at 500ms
        assert!(!frames[3].caret_visible);
    }

    #[test]
    fn test_drop_cancels_all_timers() {
        let scheduler = TimerScheduler::new();
        let typewriter =
            Typewriter::start(scheduler.handle(), ["Hi", "Yo"], TypewriterTiming::default());
        let frames = Arc::new(Mutex::new(0));

        let sink = frames.clone();
        typewriter.on_frame(move |_| *sink.lock().unwrap() += 1);
        scheduler.advance(ms(150));
        assert_eq!(scheduler.pending_count(), 2);

        drop(typewriter);
        assert_eq!(scheduler.pending_count(), 0);

        let seen = *frames.lock().unwrap();
        scheduler.advance(ms(10_000));
        assert_eq!(*frames.lock().unwrap(), seen);
    }

    #[test]
    fn test_stop_without_drop() {
        let scheduler = TimerScheduler::new();
        let mut typewriter =
            Typewriter::start(scheduler.handle(), ["Hi"], TypewriterTiming::default());

        scheduler.advance(ms(100));
        typewriter.stop();
        assert!(!typewriter.is_running());

        scheduler.advance(ms(10_000));
        assert_eq!(typewriter.text(), "H");
    }

    #[test]
    fn test_empty_phrases_schedule_nothing() {
        let scheduler = TimerScheduler::new();
        let typewriter = Typewriter::start(
            scheduler.handle(),
            Vec::<String>::new(),
            TypewriterTiming::default(),
        );

        assert_eq!(scheduler.pending_count(), 0);
        scheduler.advance(ms(10_000));
        assert_eq!(
            typewriter.frame(),
            TypewriterFrame {
                text: String::new(),
                caret_visible: false,
            }
        );
        assert!(!typewriter.is_running());
    }

    #[test]
    fn test_zero_delays_are_clamped() {
        let scheduler = TimerScheduler::new();
        let timing = TypewriterTiming {
            type_delay: Duration::ZERO,
            delete_delay: Duration::ZERO,
            pause: Duration::ZERO,
            blink_interval: Duration::ZERO,
        };
        let typewriter = Typewriter::start(scheduler.handle(), ["Hi"], timing);

        // Terminates: one transition per millisecond
        scheduler.advance(ms(2));
        assert_eq!(typewriter.text(), "Hi");
    }
}
