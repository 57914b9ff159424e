//! Authentication controller.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::{routing::get, Json};
use serde_json::{json, Value};

use crate::component::{BoxError, Component, OnStart};
use crate::container::Container;
use crate::http::RouteRegistry;

pub const LOGIN_PATH: &str = "/login";

/// Registers the authentication routes on the shared route table.
#[derive(Debug, Default)]
pub struct AuthController {
    registered: AtomicBool,
}

impl AuthController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for AuthController {
    fn init(&self, container: &Container) -> Result<(), BoxError> {
        if self.registered.load(Ordering::SeqCst) {
            return Ok(());
        }
        let routes = container.resolve::<RouteRegistry>()?;
        routes.route(LOGIN_PATH, get(login))?;
        self.registered.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "auth"
    }
}

#[async_trait]
impl OnStart for AuthController {
    async fn on_start(&self) -> Result<(), BoxError> {
        tracing::info!(path = LOGIN_PATH, "Auth routes ready");
        Ok(())
    }
}

async fn login() -> Json<Value> {
    Json(json!({ "message": "Login will be implemented" }))
}
