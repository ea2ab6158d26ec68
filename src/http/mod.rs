//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/gate.rs (classify, authenticate, throttle, headers)
//!     → services.rs (status API) or the static front-end
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;
pub mod services;

pub use server::{build_router, AppState, Components, HttpServer};
