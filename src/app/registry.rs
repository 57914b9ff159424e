//! Ordered, identity-keyed registration sets.

use std::sync::Arc;

use crate::component::{Component, OnStart};

/// Identity of a registered instance: the address of its `Arc` allocation.
///
/// Stable for as long as the registry holds a clone of the `Arc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(usize);

impl InstanceId {
    pub fn of<T: ?Sized>(instance: &Arc<T>) -> Self {
        Self(Arc::as_ptr(instance).cast::<()>() as usize)
    }
}

/// A component plus the start hook chosen for it at registration.
#[derive(Clone)]
pub(crate) struct ComponentEntry {
    pub component: Arc<dyn Component>,
    pub hook: Option<Arc<dyn OnStart>>,
}

/// Insertion-ordered set; iteration order is registration order.
pub(crate) struct Registry<T> {
    entries: Vec<(InstanceId, T)>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.entries.iter().any(|(existing, _)| *existing == id)
    }

    /// Append `value`. Returns `false` without inserting if `id` is present.
    pub fn insert(&mut self, id: InstanceId, value: T) -> bool {
        if self.contains(id) {
            return false;
        }
        self.entries.push((id, value));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_follows_allocation() {
        let a = Arc::new(1u8);
        let b = Arc::new(1u8);
        assert_eq!(InstanceId::of(&a), InstanceId::of(&a.clone()));
        assert_ne!(InstanceId::of(&a), InstanceId::of(&b));
    }

    #[test]
    fn registry_keeps_order_and_rejects_duplicates() {
        let first = Arc::new("first");
        let second = Arc::new("second");

        let mut registry = Registry::new();
        assert!(registry.insert(InstanceId::of(&first), first.clone()));
        assert!(registry.insert(InstanceId::of(&second), second.clone()));
        assert!(!registry.insert(InstanceId::of(&first), first.clone()));

        let order: Vec<&str> = registry.iter().map(|s| **s).collect();
        assert_eq!(order, vec!["first", "second"]);
        assert_eq!(registry.len(), 2);
    }
}
