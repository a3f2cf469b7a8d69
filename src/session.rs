//! Core session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! events go in, a new `Session` plus a list of effects come out, and the
//! runtime executes the effects and feeds completions back as events.

mod effect;
pub mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Notice};
pub use event::SessionEvent;
pub use state::{Session, SessionPhase};
pub use transition::{transition, TransitionError, TransitionResult};
