//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into discrete [`types::Command`] values.
//! The engine never sees key codes; the mapping here is the whole input
//! gateway.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
