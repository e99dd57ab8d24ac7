//! REST API for the overlay designer
//!
//! HTTP endpoints for editing effects and the theme, fetching the composed
//! stylesheet, persisting designs, and a WebSocket for panel refreshes.

pub mod routes;
pub mod server;
pub mod shared;
pub mod types;
pub mod websocket;

pub use routes::create_router;
pub use server::run_server;
pub use shared::{SharedState, SharedStateHandle};
pub use types::*;
