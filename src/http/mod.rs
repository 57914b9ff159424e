//! HTTP protocol subsystem.
//!
//! # Data Flow
//! ```text
//! HttpAdapter::init
//!     → routes.rs (RouteRegistry shared via the container)
//!     → controllers resolve the registry and add routes
//! HttpAdapter::start
//!     → server.rs (bind, snapshot routes, serve with middleware)
//! HttpAdapter::stop
//!     → graceful shutdown, start() returns
//! ```

pub mod routes;
pub mod server;

use thiserror::Error;

pub use routes::RouteRegistry;
pub use server::HttpAdapter;

/// Errors raised by the HTTP adapter and its route table.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("HTTP adapter already started")]
    AlreadyStarted,

    #[error("HTTP adapter used before init")]
    NotInitialized,

    #[error("route '{0}' already registered")]
    DuplicateRoute(String),
}
