//! HTTP adapter.
//!
//! # Responsibilities
//! - Create the shared route table and publish it through the container
//! - Serve the `/hello` greeting
//! - Wire up middleware (tracing, request timeout)
//! - Bind the listener and serve until stopped

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::component::{Adapter, BoxError, Component};
use crate::config::HttpConfig;
use crate::container::Container;
use crate::http::{HttpError, RouteRegistry};
use crate::lifecycle::Shutdown;

/// Adapter serving the routes registered in the shared [`RouteRegistry`].
pub struct HttpAdapter {
    config: HttpConfig,
    routes: OnceLock<Arc<RouteRegistry>>,
    shutdown: Shutdown,
    started: AtomicBool,
    local_addr: watch::Sender<Option<SocketAddr>>,
}

impl HttpAdapter {
    pub fn new(config: HttpConfig) -> Self {
        let (local_addr, _) = watch::channel(None);
        Self {
            config,
            routes: OnceLock::new(),
            shutdown: Shutdown::new(),
            started: AtomicBool::new(false),
            local_addr,
        }
    }

    /// Address the listener is bound to, once `start` has bound it.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.borrow()
    }

    /// Wait until the listener is bound and return its address.
    pub async fn ready(&self) -> SocketAddr {
        let mut rx = self.local_addr.subscribe();
        let addr = match rx.wait_for(Option::is_some).await {
            Ok(addr) => *addr,
            Err(_) => None,
        };
        match addr {
            Some(addr) => addr,
            None => std::future::pending().await,
        }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    #[allow(deprecated)]
    fn build_router(&self, routes: &RouteRegistry) -> Router {
        routes
            .snapshot()
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }
}

impl Component for HttpAdapter {
    fn init(&self, container: &Container) -> Result<(), BoxError> {
        if self.routes.get().is_some() {
            return Ok(());
        }

        let routes = Arc::new(RouteRegistry::new());
        routes.route("/hello", get(hello))?;
        container.share(routes.clone())?;
        let _ = self.routes.set(routes);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[async_trait]
impl Adapter for HttpAdapter {
    async fn start(&self) -> Result<(), BoxError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(HttpError::AlreadyStarted.into());
        }
        let routes = self.routes.get().ok_or(HttpError::NotInitialized)?;

        let listener = TcpListener::bind(&self.config.bind_address)
            .await
            .map_err(HttpError::Bind)?;
        let addr = listener.local_addr().map_err(HttpError::Bind)?;
        self.local_addr.send_replace(Some(addr));

        tracing::info!(
            address = %addr,
            routes = ?routes.paths(),
            "HTTP adapter listening"
        );

        let app = self.build_router(routes);
        let mut signal = self.shutdown.subscribe();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { signal.recv().await })
            .await
            .map_err(HttpError::Serve)?;

        tracing::info!("HTTP adapter stopped");
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        tracing::info!("HTTP adapter shutting down");
        self.shutdown.trigger();
        Ok(())
    }
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello world" }))
}
