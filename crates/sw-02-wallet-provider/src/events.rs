//! # Provider Event Listeners
//!
//! Listener registration with handle-based cleanup.

use crate::ports::outbound::ProviderEvent;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Callback invoked with the raw event payload.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

type CancelFn = Box<dyn FnOnce() + Send>;

/// A registration handle.
///
/// When dropped, the listener is automatically removed. A detached handle
/// refers to no registration and does nothing.
#[must_use = "dropping a Subscription removes its listener"]
pub struct Subscription {
    cancel: Option<CancelFn>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle that is not bound to any listener.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<ProviderEvent, Vec<(u64, Listener)>>,
}

/// Listener table for providers that push events.
///
/// Registrations are not deduplicated: registering the same callback twice
/// invokes it twice.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, event: ProviderEvent, listener: Listener) -> Subscription {
        let id = {
            let mut registry = self.inner.lock();
            registry.next_id += 1;
            let id = registry.next_id;
            registry
                .listeners
                .entry(event)
                .or_default()
                .push((id, listener));
            id
        };

        let weak: Weak<Mutex<Registry>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut registry = inner.lock();
            if let Some(listeners) = registry.listeners.get_mut(&event) {
                listeners.retain(|(listener_id, _)| *listener_id != id);
            }
            debug!(%event, id, "listener removed");
        })
    }

    /// Invoke every listener for `event`; returns how many ran.
    ///
    /// Listeners run outside the registry lock, so they may register or
    /// unsubscribe freely.
    pub fn emit(&self, event: ProviderEvent, payload: &Value) -> usize {
        let listeners: Vec<Listener> = self
            .inner
            .lock()
            .listeners
            .get(&event)
            .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        for listener in &listeners {
            listener(payload);
        }
        listeners.len()
    }

    pub fn listener_count(&self, event: ProviderEvent) -> usize {
        self.inner
            .lock()
            .listeners
            .get(&event)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Listener) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let listener: Listener = Arc::new(move |_: &Value| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, listener)
    }

    #[test]
    fn test_emit_reaches_registered_listener() {
        let registry = ListenerRegistry::new();
        let (count, listener) = counter();
        let _sub = registry.register(ProviderEvent::ChainChanged, listener);

        assert_eq!(registry.emit(ProviderEvent::ChainChanged, &json!("0x1")), 1);
        assert_eq!(registry.emit(ProviderEvent::AccountsChanged, &json!([])), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let registry = ListenerRegistry::new();
        let (count, listener) = counter();
        let sub = registry.register(ProviderEvent::AccountsChanged, listener);
        sub.unsubscribe();

        registry.emit(ProviderEvent::AccountsChanged, &json!([]));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(registry.listener_count(ProviderEvent::AccountsChanged), 0);
    }

    #[test]
    fn test_drop_removes_listener() {
        let registry = ListenerRegistry::new();
        let (_, listener) = counter();
        {
            let _sub = registry.register(ProviderEvent::AccountsChanged, listener);
            assert_eq!(registry.listener_count(ProviderEvent::AccountsChanged), 1);
        }
        assert_eq!(registry.listener_count(ProviderEvent::AccountsChanged), 0);
    }

    #[test]
    fn test_duplicates_not_deduplicated() {
        let registry = ListenerRegistry::new();
        let (count, listener) = counter();
        let _a = registry.register(ProviderEvent::ChainChanged, Arc::clone(&listener));
        let _b = registry.register(ProviderEvent::ChainChanged, listener);

        registry.emit(ProviderEvent::ChainChanged, &json!("0x5"));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handle_outliving_registry_is_harmless() {
        let registry = ListenerRegistry::new();
        let (_, listener) = counter();
        let sub = registry.register(ProviderEvent::ChainChanged, listener);
        drop(registry);
        sub.unsubscribe();
    }

    #[test]
    fn test_detached_handle() {
        let sub = Subscription::detached();
        assert!(!sub.is_active());
        sub.unsubscribe();
    }
}
