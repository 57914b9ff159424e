//! Dependency container.
//!
//! # Data Flow
//! ```text
//! Adapter/Component init
//!     → singleton()/instance()/share() registers a slot keyed by TypeId
//!     → resolve::<T>() finds the slot
//!     → lazy factory runs once, result cached
//!     → Arc<T> handed to every consumer
//! ```
//!
//! # Design Decisions
//! - One slot per type; a second registration is rejected, never replaced
//! - Factories run outside the map lock so they may resolve other types
//! - Cheap to clone: every clone sees the same registry

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn FnOnce() -> Instance + Send>;

/// Errors raised by registration and resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    /// Nothing registered for the requested type.
    #[error("no provider registered for type '{0}'")]
    Missing(&'static str),

    /// The type already has a provider.
    #[error("type '{0}' is already registered")]
    AlreadyRegistered(&'static str),

    /// The stored value could not be downcast to the requested type.
    #[error("provider for '{expected}' produced '{actual}'")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

struct Slot {
    type_name: &'static str,
    instance: OnceLock<Instance>,
    factory: Mutex<Option<Factory>>,
}

impl Slot {
    fn ready(type_name: &'static str, instance: Instance) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(instance);
        Self {
            type_name,
            instance: cell,
            factory: Mutex::new(None),
        }
    }

    fn lazy(type_name: &'static str, factory: Factory) -> Self {
        Self {
            type_name,
            instance: OnceLock::new(),
            factory: Mutex::new(Some(factory)),
        }
    }

    fn get(&self) -> Option<Instance> {
        if let Some(instance) = self.instance.get() {
            return Some(instance.clone());
        }
        // Concurrent first resolves wait here; only one takes the factory.
        let mut factory = self.factory.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(instance) = self.instance.get() {
            return Some(instance.clone());
        }
        let build = factory.take()?;
        let instance = build();
        Some(self.instance.get_or_init(|| instance).clone())
    }
}

/// Process-wide registry resolving dependencies by type.
#[derive(Clone, Default)]
pub struct Container {
    slots: Arc<DashMap<TypeId, Arc<Slot>>>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a provider exists for `T`.
    pub fn has<T: Any>(&self) -> bool {
        self.has_type(TypeId::of::<T>())
    }

    /// Whether a provider exists for the given type id.
    pub fn has_type(&self, id: TypeId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Resolve the shared instance of `T`, running its factory on first use.
    pub fn resolve<T: Any + Send + Sync>(&self) -> ContainerResult<Arc<T>> {
        // Clone the slot out so the shard lock is released before a factory runs.
        let slot = self
            .slots
            .get(&TypeId::of::<T>())
            .map(|entry| entry.value().clone())
            .ok_or(ContainerError::Missing(type_name::<T>()))?;

        let instance = slot
            .get()
            .ok_or(ContainerError::Missing(type_name::<T>()))?;

        instance
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                expected: type_name::<T>(),
                actual: slot.type_name,
            })
    }

    /// Register a lazily built singleton. The factory runs at most once.
    pub fn singleton<T, F>(&self, factory: F) -> ContainerResult<()>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T + Send + 'static,
    {
        let factory: Factory = Box::new(move || Arc::new(factory()) as Instance);
        self.insert::<T>(Slot::lazy(type_name::<T>(), factory))
    }

    /// Register an already constructed value.
    pub fn instance<T: Any + Send + Sync>(&self, value: T) -> ContainerResult<()> {
        self.share(Arc::new(value))
    }

    /// Register a value the caller keeps a handle to.
    pub fn share<T: Any + Send + Sync>(&self, value: Arc<T>) -> ContainerResult<()> {
        self.insert::<T>(Slot::ready(type_name::<T>(), value))
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn insert<T: Any>(&self, slot: Slot) -> ContainerResult<()> {
        match self.slots.entry(TypeId::of::<T>()) {
            Entry::Occupied(_) => Err(ContainerError::AlreadyRegistered(type_name::<T>())),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(slot));
                tracing::trace!(type_name = type_name::<T>(), "Provider registered");
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for entry in self.slots.iter() {
            list.entry(&entry.value().type_name);
        }
        list.finish()
    }
}
