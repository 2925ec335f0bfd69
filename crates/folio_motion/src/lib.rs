//! Folio Motion Components
//!
//! The two pieces of the page that change on their own:
//!
//! - **Typewriter**: cycles through phrases, typing and deleting one
//!   character per tick, with an independently blinking caret
//! - **Reveal**: flips an element from hidden to visible the first time it
//!   enters the viewport, and never back
//!
//! Each comes as a pure state machine ([`TypewriterState`], [`RevealState`])
//! plus a component that wires it to the runtime primitives in `folio_core`
//! ([`Typewriter`] on timers, [`Reveal`] on intersection observation).
//! Components clean up after themselves on drop: pending timers are
//! cancelled and observations are released.

pub mod caret;
pub mod reveal;
pub mod typewriter;

pub use caret::CaretBlink;
pub use reveal::{Presentation, Reveal, RevealListener, RevealState, RevealStyle};
pub use typewriter::{
    Direction, FrameListener, Typewriter, TypewriterFrame, TypewriterState, TypewriterTiming,
};
