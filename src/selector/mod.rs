//! The symptom selector component.
//!
//! Unidirectional flow: an incoming `SelectorEvent` is applied to
//! `SelectorState`, which returns the `Effect` (network call) it needs, and
//! the page is re-rendered from state by the pure functions in `render`.
//! The dropdown's active flags are derived from the selection at render time,
//! so the two can never diverge.

pub mod render;
pub mod state;

pub use state::*;
