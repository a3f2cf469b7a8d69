//! Session runtime
//!
//! Executes the effects produced by the state machine against the real
//! collaborators and broadcasts client-visible events.

mod executor;
mod traits;

#[cfg(test)]
mod testing;

pub use executor::{SessionRuntime, SseEvent};
pub use traits::{LeafletSource, ProductSearch};
