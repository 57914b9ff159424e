//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator, adapters, components produce:
//!     → logging.rs (structured log events via the shared Logger)
//!     → metrics.rs (adapter gauges and exit counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::Logger;
