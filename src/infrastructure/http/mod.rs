//! HTTP API layer: router, handlers, and request/response types.

pub mod handlers;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use server::{build_router, build_state, serve};
