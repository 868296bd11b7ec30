//! HTTP API module
//!
//! Router assembly, response envelopes, the authentication middleware,
//! and the REST handlers.

pub mod envelope;
pub mod http;
pub mod middleware;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
