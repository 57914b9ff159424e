//! Application lifecycle orchestrator.
//!
//! # Data Flow
//! ```text
//! Registration (single-threaded, &mut self):
//!     add_adapter / add_component / add_lifecycle_component
//!     → duplicate check (Arc identity)
//!     → init(container)
//!     → appended to ordered registry
//!
//! start(&shutdown):
//!     spawn one task per adapter ──► exit channel (capacity = adapter count)
//!     components in order: init again → on_start hook
//!     drain exit channel ◄── shutdown signal → stop()
//!     → aggregated AdapterFailures
//! ```
//!
//! # Design Decisions
//! - Adapters run concurrently and in isolation; a panic is reported as a failure
//! - Components run strictly in order on the caller's task
//! - A failed or panicking start hook stops and drains the adapters before returning
//! - `start` and `stop` are one-shot
//! - A repeated `stop` is a no-op
//! - No timeout: shutdown waits for every adapter to return

mod error;
mod registry;

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::mpsc;

use crate::component::{Adapter, BoxError, Component, OnStart};
use crate::container::Container;
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, Logger};

pub use error::{AdapterFailure, AdapterFailures, AppError, AppResult};
pub use registry::InstanceId;
use registry::{ComponentEntry, Registry};

/// Terminal status reported by an adapter task.
struct AdapterExit {
    adapter: &'static str,
    outcome: Result<(), BoxError>,
}

/// An application where adapters and components are attached.
pub struct App {
    container: Container,
    adapters: Registry<Arc<dyn Adapter>>,
    components: Registry<ComponentEntry>,
    logger: Arc<Logger>,
    started: AtomicBool,
    stopped: AtomicBool,
}

impl App {
    /// Create an app around `container`.
    ///
    /// If the container already provides a [`Logger`] it is adopted; otherwise
    /// the current default subscriber is registered as the logger.
    pub fn new(container: Container) -> Self {
        let logger = seed_logger(&container);
        Self {
            container,
            adapters: Registry::new(),
            components: Registry::new(),
            logger,
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Initialize `adapter` against the container and attach it.
    pub fn add_adapter<A: Adapter + 'static>(&mut self, adapter: Arc<A>) -> AppResult<()> {
        let id = InstanceId::of(&adapter);
        let name = adapter.name();
        if self.adapters.contains(id) {
            return Err(AppError::DuplicateAdapter { name });
        }

        adapter
            .init(&self.container)
            .map_err(|source| AppError::Init {
                kind: "adapter",
                name,
                source,
            })?;
        self.logger
            .in_scope(|| tracing::info!(adapter = name, "Adapter initialized"));

        self.adapters.insert(id, adapter);
        Ok(())
    }

    /// Initialize `component` against the container and attach it.
    pub fn add_component<C: Component + 'static>(&mut self, component: Arc<C>) -> AppResult<()> {
        let id = InstanceId::of(&component);
        self.register_component(id, component, None)
    }

    /// Attach a component whose [`OnStart`] hook runs during [`App::start`].
    pub fn add_lifecycle_component<C: OnStart + 'static>(
        &mut self,
        component: Arc<C>,
    ) -> AppResult<()> {
        let id = InstanceId::of(&component);
        let hook: Arc<dyn OnStart> = component.clone();
        self.register_component(id, component, Some(hook))
    }

    fn register_component(
        &mut self,
        id: InstanceId,
        component: Arc<dyn Component>,
        hook: Option<Arc<dyn OnStart>>,
    ) -> AppResult<()> {
        let name = component.name();
        if self.components.contains(id) {
            return Err(AppError::DuplicateComponent { name });
        }

        component
            .init(&self.container)
            .map_err(|source| AppError::Init {
                kind: "component",
                name,
                source,
            })?;
        self.logger.in_scope(|| {
            tracing::info!(component = name, hook = hook.is_some(), "Component initialized")
        });

        self.components.insert(id, ComponentEntry { component, hook });
        Ok(())
    }

    /// Start every adapter, run component hooks and block until all adapters exit.
    ///
    /// Triggering `shutdown` stops the adapters. Returns every adapter failure,
    /// or the first component failure (after stopping the adapters). Only the
    /// first call runs; later calls return [`AppError::AlreadyStarted`].
    pub async fn start(&self, shutdown: &Shutdown) -> AppResult<()> {
        if self.adapters.is_empty() {
            return Err(AppError::NoAdapters);
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(AppError::AlreadyStarted);
        }

        let (exits_tx, mut exits) = mpsc::channel(self.adapters.len());
        for adapter in self.adapters.iter() {
            let adapter = adapter.clone();
            let exits_tx = exits_tx.clone();
            metrics::record_adapter_started(adapter.name());
            tokio::spawn(async move {
                let outcome = guarded("adapter", adapter.start()).await;
                let _ = exits_tx
                    .send(AdapterExit {
                        adapter: adapter.name(),
                        outcome,
                    })
                    .await;
            });
        }
        // The channel closes once the last adapter task drops its sender.
        drop(exits_tx);

        if let Err(err) = self.start_components().await {
            self.logger.in_scope(|| {
                tracing::error!(error = %err, "Component startup failed, stopping adapters")
            });
            self.stop_logged().await;
            let mut failures = AdapterFailures::new();
            while let Some(exit) = exits.recv().await {
                self.record_exit(exit, &mut failures);
            }
            return Err(err);
        }

        let mut signal = shutdown.subscribe();
        let mut stopping = false;
        let mut failures = AdapterFailures::new();
        loop {
            tokio::select! {
                exit = exits.recv() => match exit {
                    Some(exit) => self.record_exit(exit, &mut failures),
                    None => break,
                },
                _ = signal.recv(), if !stopping => {
                    stopping = true;
                    self.logger.in_scope(|| tracing::info!("Shutdown requested, stopping adapters"));
                    self.stop_logged().await;
                }
            }
        }

        self.logger.in_scope(|| {
            tracing::info!(failed = failures.len(), "All adapters exited")
        });
        failures.into_result(AppError::Adapters)
    }

    /// Stop every adapter, collecting all failures.
    ///
    /// Only the first call reaches the adapters; later calls return `Ok(())`.
    pub async fn stop(&self) -> AppResult<()> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            self.logger
                .in_scope(|| tracing::debug!("Stop already performed, ignoring"));
            return Ok(());
        }

        let mut failures = AdapterFailures::new();
        for adapter in self.adapters.iter() {
            let name = adapter.name();
            if let Err(error) = guarded("adapter", adapter.stop()).await {
                self.logger.in_scope(|| {
                    tracing::error!(adapter = name, error = %error, "Adapter failed to stop")
                });
                failures.push(name, error);
            }
        }
        failures.into_result(AppError::Stop)
    }

    /// Whether [`App::stop`] has already run.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    async fn start_components(&self) -> AppResult<()> {
        for entry in self.components.iter() {
            let name = entry.component.name();
            catch_init(|| entry.component.init(&self.container)).map_err(|source| {
                AppError::Init {
                    kind: "component",
                    name,
                    source,
                }
            })?;

            if let Some(hook) = &entry.hook {
                guarded("component", hook.on_start())
                    .await
                    .map_err(|source| AppError::OnStart { name, source })?;
                self.logger
                    .in_scope(|| tracing::debug!(component = name, "Start hook completed"));
            }
        }
        Ok(())
    }

    async fn stop_logged(&self) {
        if let Err(err) = self.stop().await {
            self.logger
                .in_scope(|| tracing::error!(error = %err, "Shutdown finished with errors"));
        }
    }

    fn record_exit(&self, exit: AdapterExit, failures: &mut AdapterFailures) {
        let AdapterExit { adapter, outcome } = exit;
        metrics::record_adapter_exit(adapter, outcome.is_ok());
        match outcome {
            Ok(()) => self
                .logger
                .in_scope(|| tracing::info!(adapter, "Adapter exited")),
            Err(error) => {
                self.logger.in_scope(|| {
                    tracing::error!(adapter, error = %error, "Adapter exited with error")
                });
                failures.push(adapter, error);
            }
        }
    }
}

fn seed_logger(container: &Container) -> Arc<Logger> {
    let logger = Arc::new(Logger::current());
    match container.share(logger.clone()) {
        Ok(()) => logger,
        // A logger registered before the app was created takes precedence.
        // Resolving it fails only if its singleton factory already panicked.
        Err(_) => container.resolve::<Logger>().unwrap_or(logger),
    }
}

/// Await a callback, turning a panic into an error.
async fn guarded<F>(kind: &'static str, future: F) -> Result<(), BoxError>
where
    F: Future<Output = Result<(), BoxError>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => Err(panicked(kind, panic)),
    }
}

/// Run a component's `init`, turning a panic into an error.
fn catch_init<F>(f: F) -> Result<(), BoxError>
where
    F: FnOnce() -> Result<(), BoxError>,
{
    std::panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|panic| Err(panicked("component", panic)))
}

fn panicked(kind: &'static str, panic: Box<dyn Any + Send>) -> BoxError {
    format!("{} panicked: {}", kind, panic_message(panic.as_ref())).into()
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
