//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger()
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every ShutdownSignal::recv() resolves
//!     → App::stop() on the orchestrator
//!     → Adapter::stop() on each HTTP listener
//! ```
//!
//! # Design Decisions
//! - The token is passed in explicitly; nothing here is global state
//! - Triggering is one-shot and observable by late subscribers

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::spawn_signal_listener;
