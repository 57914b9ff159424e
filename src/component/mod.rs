//! Extension points of the scaffold.
//!
//! Everything attached to an [`App`](crate::app::App) is a [`Component`]: a
//! unit that wires its own dependencies from the [`Container`]. Two
//! capabilities build on top of it:
//!
//! - [`Adapter`]: a protocol endpoint with its own long-running `start` loop
//! - [`OnStart`]: a one-shot hook that runs after initialization
//!
//! # Design Decisions
//! - `init` takes `&self` and may be called more than once; implementations
//!   keep state behind `OnceLock`, atomics or mutexes and must be idempotent
//! - Errors are boxed so adapters can surface whatever their protocol layer
//!   produces

use async_trait::async_trait;

use crate::container::Container;

/// Error type returned by component and adapter callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A unit that initializes its dependencies from a container.
pub trait Component: Send + Sync {
    /// Wire dependencies. Called at registration and again at start.
    fn init(&self, container: &Container) -> Result<(), BoxError>;

    /// Name used in logs, metrics and errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// An independently running protocol endpoint.
#[async_trait]
pub trait Adapter: Component {
    /// Serve until stopped or failed. The return value is the terminal status.
    async fn start(&self) -> Result<(), BoxError>;

    /// Request graceful termination; the pending `start` call should return.
    async fn stop(&self) -> Result<(), BoxError>;
}

/// Lifecycle hook executed once after every component is initialized.
#[async_trait]
pub trait OnStart: Component {
    async fn on_start(&self) -> Result<(), BoxError>;
}
