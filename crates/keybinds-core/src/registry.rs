/// Subscription registry.
///
/// A concurrently-mutated multimap from bind target to subscription
/// records. Reads happen on the input-dispatch path, writes arrive from
/// the embedding runtime's registration calls, so all access goes
/// through one brief mutex and dispatch works off snapshots (see
/// `dispatch.rs`).
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::context::InputContext;
use crate::event::InputEvent;
use crate::key::{BindTarget, KeyName};

/// What a callback's return value asks of the current dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DispatchFlow {
    /// Keep invoking the remaining subscriptions in this cycle.
    Continue,
    /// Skip the remaining subscriptions in this cycle. Never affects
    /// the forwarding call to the original function or later cycles.
    Block,
}

/// Positional arguments handed to a callback, per its call shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeybindArgs<'a> {
    None,
    Event(InputEvent),
    Key(&'a str),
    EventAndKey(InputEvent, &'a str),
}

/// Externally-owned invocable. The registry holds the only reference
/// for the lifetime of the subscription and drops it on removal.
pub type KeybindCallback = Box<dyn Fn(KeybindArgs<'_>) -> Result<DispatchFlow> + Send + Sync>;

/// Argument shape of a subscription's callback, resolved once at
/// registration from filter-presence and wildcard-ness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// Filtered, exact key: the callback learns nothing it doesn't know.
    NoArgs,
    /// Unfiltered, exact key: receives the resolved event kind.
    EventOnly,
    /// Filtered wildcard: receives the triggering key name.
    KeyOnly,
    /// Unfiltered wildcard: receives event kind then key name.
    EventAndKey,
}

impl CallShape {
    fn resolve(has_filter: bool, is_wildcard: bool) -> Self {
        match (has_filter, is_wildcard) {
            (false, false) => CallShape::EventOnly,
            (false, true) => CallShape::EventAndKey,
            (true, false) => CallShape::NoArgs,
            (true, true) => CallShape::KeyOnly,
        }
    }
}

/// Stable identity for a registered subscription, usable for removal.
/// Handles are allocated from a counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindHandle(u64);

/// One registered interest.
pub struct KeybindEntry {
    handle: BindHandle,
    filter: Option<InputEvent>,
    context: InputContext,
    shape: CallShape,
    enabled: AtomicBool,
    callback: KeybindCallback,
}

impl KeybindEntry {
    pub fn handle(&self) -> BindHandle {
        self.handle
    }

    pub fn shape(&self) -> CallShape {
        self.shape
    }

    pub fn invoke(&self, args: KeybindArgs<'_>) -> Result<DispatchFlow> {
        (self.callback)(args)
    }

    fn matches(&self, event: InputEvent, context: InputContext) -> bool {
        self.enabled.load(Ordering::Relaxed)
            && self.context == context
            && self.filter.is_none_or(|f| f == event)
    }
}

#[derive(Default)]
struct RegistryInner {
    /// Wildcard subscriptions, in registration order.
    any: Vec<Arc<KeybindEntry>>,
    /// Exact-key subscriptions, in registration order per key.
    by_key: HashMap<KeyName, Vec<Arc<KeybindEntry>>>,
}

/// Registry of keybind subscriptions.
///
/// `register` never fails and growth is unbounded; removal by unknown
/// handle is a no-op.
#[derive(Default)]
pub struct KeybindRegistry {
    inner: Mutex<RegistryInner>,
    next_handle: AtomicU64,
}

impl KeybindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription. `key = None` registers a wildcard that
    /// matches every key.
    pub fn register(
        &self,
        key: Option<KeyName>,
        filter: Option<InputEvent>,
        context: InputContext,
        callback: KeybindCallback,
    ) -> BindHandle {
        let handle = BindHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let target = BindTarget::from_key(key);
        let entry = Arc::new(KeybindEntry {
            handle,
            filter,
            context,
            shape: CallShape::resolve(filter.is_some(), target.is_any_key()),
            enabled: AtomicBool::new(true),
            callback,
        });
        let mut inner = self.inner.lock().unwrap();
        match target {
            BindTarget::AnyKey => inner.any.push(entry),
            BindTarget::Key(key) => inner.by_key.entry(key).or_default().push(entry),
        }
        handle
    }

    /// Remove the subscription with the given handle, if any.
    pub fn deregister(&self, handle: BindHandle) {
        let mut inner = self.inner.lock().unwrap();
        inner.any.retain(|entry| entry.handle != handle);
        inner.by_key.retain(|_, entries| {
            entries.retain(|entry| entry.handle != handle);
            !entries.is_empty()
        });
    }

    /// Remove every subscription registered under exactly this target.
    /// Wildcard subscriptions are only removed when `AnyKey` is
    /// explicitly passed.
    pub fn deregister_by_key(&self, target: &BindTarget) {
        let mut inner = self.inner.lock().unwrap();
        match target {
            BindTarget::AnyKey => inner.any.clear(),
            BindTarget::Key(key) => {
                inner.by_key.remove(key);
            }
        }
    }

    /// Remove every subscription.
    pub fn deregister_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.any.clear();
        inner.by_key.clear();
    }

    /// Enable or disable a subscription without removing it. Disabled
    /// subscriptions are skipped at snapshot time. Returns `false` for
    /// an unknown handle.
    pub fn set_enabled(&self, handle: BindHandle, enabled: bool) -> bool {
        let inner = self.inner.lock().unwrap();
        let found = inner
            .any
            .iter()
            .chain(inner.by_key.values().flatten())
            .find(|entry| entry.handle == handle);
        match found {
            Some(entry) => {
                entry.enabled.store(enabled, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.any.len() + inner.by_key.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collect the subscriptions a dispatch for `(key, event, context)`
    /// must invoke: wildcards first in registration order, then exact
    /// matches in registration order. The lock is released before the
    /// caller invokes anything, so callbacks may re-enter the registry.
    pub fn snapshot(
        &self,
        key: &KeyName,
        event: InputEvent,
        context: InputContext,
    ) -> Vec<Arc<KeybindEntry>> {
        let inner = self.inner.lock().unwrap();
        let mut matched: Vec<Arc<KeybindEntry>> = Vec::new();
        for entry in &inner.any {
            if entry.matches(event, context) {
                matched.push(entry.clone());
            }
        }
        if let Some(entries) = inner.by_key.get(key) {
            for entry in entries {
                if entry.matches(event, context) {
                    matched.push(entry.clone());
                }
            }
        }
        matched
    }
}
