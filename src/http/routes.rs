//! Shared route table.
//!
//! The HTTP adapter registers a [`RouteRegistry`] in the container during
//! `init`; controllers resolve it and add their routes. The adapter serves a
//! snapshot of the table when it starts.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use axum::routing::MethodRouter;
use axum::Router;

use crate::http::HttpError;

#[derive(Default)]
struct Table {
    router: Router,
    paths: HashSet<String>,
}

/// Route table shared between the HTTP adapter and controllers.
#[derive(Default)]
pub struct RouteRegistry {
    table: Mutex<Table>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. Each path may be registered once.
    pub fn route(&self, path: &str, method_router: MethodRouter) -> Result<(), HttpError> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if !table.paths.insert(path.to_string()) {
            return Err(HttpError::DuplicateRoute(path.to_string()));
        }
        let router = std::mem::take(&mut table.router);
        table.router = router.route(path, method_router);
        tracing::debug!(path, "Route registered");
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .paths
            .contains(path)
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let mut paths: Vec<String> = table.paths.iter().cloned().collect();
        paths.sort();
        paths
    }

    /// Copy of the router as currently registered.
    pub fn snapshot(&self) -> Router {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .router
            .clone()
    }
}
