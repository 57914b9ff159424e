//! Shared scripted adapters and components for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scaffold::component::{Adapter, BoxError, Component, OnStart};
use scaffold::container::Container;
use scaffold::lifecycle::Shutdown;

/// Shared record of callback order across mocks.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// How a [`MockAdapter`]'s `start` behaves.
#[derive(Clone, Copy)]
pub enum Run {
    /// Return `Ok` after the delay.
    ExitAfter(Duration),
    /// Return an error after the delay.
    FailAfter(Duration, &'static str),
    /// Panic immediately.
    Panic,
    /// Serve until `stop` is called.
    UntilStopped,
}

pub struct MockAdapter {
    label: &'static str,
    run: Run,
    stop_error: Option<&'static str>,
    shutdown: Shutdown,
    pub init_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
}

impl MockAdapter {
    pub fn new(label: &'static str, run: Run) -> Arc<Self> {
        Arc::new(Self::build(label, run, None))
    }

    pub fn failing_stop(label: &'static str, run: Run, error: &'static str) -> Arc<Self> {
        Arc::new(Self::build(label, run, Some(error)))
    }

    fn build(label: &'static str, run: Run, stop_error: Option<&'static str>) -> Self {
        Self {
            label,
            run,
            stop_error,
            shutdown: Shutdown::new(),
            init_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn inits(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

impl Component for MockAdapter {
    fn init(&self, _container: &Container) -> Result<(), BoxError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

#[async_trait]
impl Adapter for MockAdapter {
    async fn start(&self) -> Result<(), BoxError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        match self.run {
            Run::ExitAfter(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Run::FailAfter(delay, error) => {
                tokio::time::sleep(delay).await;
                Err(error.into())
            }
            Run::Panic => panic!("{} exploded", self.label),
            Run::UntilStopped => {
                self.shutdown.subscribe().recv().await;
                Ok(())
            }
        }
    }

    async fn stop(&self) -> Result<(), BoxError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.shutdown.trigger();
        match self.stop_error {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

/// Component recording its callbacks into a shared journal.
pub struct MockComponent {
    label: &'static str,
    journal: Journal,
    hook_error: Option<&'static str>,
    hook_panics: bool,
    wired: AtomicUsize,
    pub init_calls: AtomicUsize,
    pub hook_calls: AtomicUsize,
}

impl MockComponent {
    pub fn new(label: &'static str, journal: &Journal) -> Arc<Self> {
        Arc::new(Self::build(label, journal, None))
    }

    pub fn failing_hook(label: &'static str, journal: &Journal, error: &'static str) -> Arc<Self> {
        Arc::new(Self::build(label, journal, Some(error)))
    }

    pub fn panicking_hook(label: &'static str, journal: &Journal) -> Arc<Self> {
        let mut component = Self::build(label, journal, None);
        component.hook_panics = true;
        Arc::new(component)
    }

    fn build(label: &'static str, journal: &Journal, hook_error: Option<&'static str>) -> Self {
        Self {
            label,
            journal: journal.clone(),
            hook_error,
            hook_panics: false,
            wired: AtomicUsize::new(0),
            init_calls: AtomicUsize::new(0),
            hook_calls: AtomicUsize::new(0),
        }
    }

    pub fn inits(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn hooks(&self) -> usize {
        self.hook_calls.load(Ordering::SeqCst)
    }

    /// Side effects performed by `init`; stays at 1 when `init` is idempotent.
    pub fn wired(&self) -> usize {
        self.wired.load(Ordering::SeqCst)
    }
}

impl Component for MockComponent {
    fn init(&self, _container: &Container) -> Result<(), BoxError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.wired.load(Ordering::SeqCst) == 0 {
            self.wired.fetch_add(1, Ordering::SeqCst);
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:init", self.label));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

#[async_trait]
impl OnStart for MockComponent {
    async fn on_start(&self) -> Result<(), BoxError> {
        self.hook_calls.fetch_add(1, Ordering::SeqCst);
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:on_start", self.label));
        if self.hook_panics {
            panic!("{} hook exploded", self.label);
        }
        match self.hook_error {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

/// Component whose `init` always fails.
pub struct BrokenComponent;

impl Component for BrokenComponent {
    fn init(&self, container: &Container) -> Result<(), BoxError> {
        container.resolve::<MissingDependency>()?;
        Ok(())
    }
}

pub struct MissingDependency;
