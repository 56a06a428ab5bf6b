//! Local browser UI for the selector.
//!
//! Serves the page rendered from `SelectorState` and accepts the form posts
//! that drive it. The router is composable: `selector_router()` returns a
//! `Router` that can be mounted on any axum server.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::{ServeError, UiError};
pub use router::selector_router;
pub use server::{start_ui_server, UiServer, UiSession};
