//! Application bootstrapping scaffold.
//!
//! Wires components (dependency-injected units) and adapters (long-running
//! protocol front-ends) into one process with coordinated startup and
//! graceful shutdown.

// Core
pub mod app;
pub mod component;
pub mod container;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

// Protocol adapters and features
pub mod features;
pub mod http;

pub use app::{App, AppError};
pub use component::{Adapter, BoxError, Component, OnStart};
pub use container::Container;
pub use http::HttpAdapter;
pub use lifecycle::Shutdown;
