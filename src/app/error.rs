//! Orchestrator error types.

use std::fmt;

use thiserror::Error;

use crate::component::BoxError;

/// Errors returned by registration, startup and shutdown.
#[derive(Debug, Error)]
pub enum AppError {
    /// `start` was called with nothing to serve.
    #[error("no adapters attached to the app")]
    NoAdapters,

    /// `start` was already called on this app.
    #[error("app already started")]
    AlreadyStarted,

    /// The adapter instance is already registered.
    #[error("adapter '{name}' already exists")]
    DuplicateAdapter { name: &'static str },

    /// The component instance is already registered.
    #[error("component '{name}' already exists")]
    DuplicateComponent { name: &'static str },

    /// `init` failed while wiring dependencies.
    #[error("{kind} '{name}' failed to initialize: {source}")]
    Init {
        kind: &'static str,
        name: &'static str,
        #[source]
        source: BoxError,
    },

    /// A component's start hook failed.
    #[error("component '{name}' start hook failed: {source}")]
    OnStart {
        name: &'static str,
        #[source]
        source: BoxError,
    },

    /// One or more adapters exited with an error.
    #[error("{0}")]
    Adapters(AdapterFailures),

    /// One or more adapters failed to stop.
    #[error("{0}")]
    Stop(AdapterFailures),
}

impl AppError {
    /// Collected adapter failures, if this error carries any.
    pub fn failures(&self) -> Option<&AdapterFailures> {
        match self {
            AppError::Adapters(failures) | AppError::Stop(failures) => Some(failures),
            _ => None,
        }
    }
}

/// Result type for orchestrator operations.
pub type AppResult<T> = Result<T, AppError>;

/// A single adapter's terminal error.
#[derive(Debug)]
pub struct AdapterFailure {
    pub adapter: &'static str,
    pub error: BoxError,
}

impl fmt::Display for AdapterFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.adapter, self.error)
    }
}

/// Every failure observed across adapters, in arrival order.
///
/// Displays one failure per line so no failure masks another.
#[derive(Debug, Default)]
pub struct AdapterFailures(Vec<AdapterFailure>);

impl AdapterFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, adapter: &'static str, error: BoxError) {
        self.0.push(AdapterFailure { adapter, error });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdapterFailure> {
        self.0.iter()
    }

    /// Names of the failed adapters.
    pub fn adapters(&self) -> Vec<&'static str> {
        self.0.iter().map(|failure| failure.adapter).collect()
    }

    /// `Ok(())` when empty, otherwise the failures wrapped by `wrap`.
    pub fn into_result(self, wrap: fn(AdapterFailures) -> AppError) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(wrap(self))
        }
    }
}

impl fmt::Display for AdapterFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl IntoIterator for AdapterFailures {
    type Item = AdapterFailure;
    type IntoIter = std::vec::IntoIter<AdapterFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_display_every_entry() {
        let mut failures = AdapterFailures::new();
        failures.push("http", "address in use".into());
        failures.push("grpc", "tls handshake".into());

        let err = AppError::Adapters(failures);
        assert_eq!(err.to_string(), "http: address in use\ngrpc: tls handshake");
        assert_eq!(err.failures().map(|f| f.adapters()), Some(vec!["http", "grpc"]));
    }

    #[test]
    fn empty_failures_are_ok() {
        assert!(AdapterFailures::new().into_result(AppError::Stop).is_ok());

        let mut failures = AdapterFailures::new();
        failures.push("http", "boom".into());
        assert!(matches!(
            failures.into_result(AppError::Stop),
            Err(AppError::Stop(f)) if f.len() == 1
        ));
    }

    #[test]
    fn init_error_keeps_source() {
        let err = AppError::Init {
            kind: "adapter",
            name: "http",
            source: "router missing".into(),
        };
        assert_eq!(err.to_string(), "adapter 'http' failed to initialize: router missing");
        assert!(std::error::Error::source(&err).is_some());
    }
}
