//! Live address suggestions for a text input.
//!
//! The debounce/cancel/staleness rules live in a pure state machine
//! (`AutocompleteState`); `AutocompleteController` binds it to real
//! timers, a suggestion resolver, and a caller-supplied callback.

pub mod controller;
pub mod state;

pub use controller::{AutocompleteConfig, AutocompleteController};
pub use state::{AutocompleteState, Effect, Phase};
