//! Reactor server and CLI plumbing.
//!
//! - [`server::app`] mounts the HTTP routes from [`routes`] over a shared
//!   [`state::AppState`]
//! - [`wiring`] turns a [`reactor_config::ReactorConfig`] into that state
//! - [`live::follow`] drives debounced detection from a line stream
//! - [`client`] talks to a running server and keeps the last good result

pub mod client;
pub mod live;
pub mod routes;
pub mod server;
pub mod state;
pub mod wiring;

pub use routes::ApiError;
pub use state::{AppState, SharedState};
