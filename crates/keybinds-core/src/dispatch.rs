/// Event dispatch.
///
/// Selects matching subscriptions from the registry, orders them
/// (wildcards first, then exact matches, each in registration order),
/// and invokes them until one signals `Block` or one fails.
use std::sync::Arc;

use anyhow::Result;

use crate::context::InputContext;
use crate::event::InputEvent;
use crate::key::KeyName;
use crate::registry::{CallShape, DispatchFlow, KeybindArgs, KeybindRegistry};

/// Exclusive section of the embedding runtime (its interpreter lock or
/// equivalent). Held for the callback-invocation loop only; the dedup
/// and classification steps run outside it.
pub trait RuntimeGate: Send + Sync {
    fn with_exclusive(&self, f: &mut dyn FnMut() -> Result<()>) -> Result<()>;
}

/// Gate for embeddings with no exclusive-execution requirement.
#[derive(Debug, Default)]
pub struct NullGate;

impl RuntimeGate for NullGate {
    fn with_exclusive(&self, f: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        f()
    }
}

pub struct Dispatcher {
    registry: Arc<KeybindRegistry>,
    gate: Box<dyn RuntimeGate>,
}

impl Dispatcher {
    pub fn new(registry: Arc<KeybindRegistry>, gate: Box<dyn RuntimeGate>) -> Self {
        Self { registry, gate }
    }

    /// Dispatch one deduplicated event to every matching subscription.
    ///
    /// The snapshot is taken under the registry lock and the lock is
    /// released before any callback runs, so callbacks may register or
    /// deregister subscriptions (including themselves) freely; such
    /// changes take effect from the next dispatch.
    ///
    /// A callback error aborts the remaining snapshot and propagates.
    /// A `Block` return skips the remaining snapshot silently.
    pub fn dispatch(&self, key: &KeyName, event: InputEvent, context: InputContext) -> Result<()> {
        let snapshot = self.registry.snapshot(key, event, context);
        if snapshot.is_empty() {
            return Ok(());
        }

        self.gate.with_exclusive(&mut || {
            for entry in &snapshot {
                let args = match entry.shape() {
                    CallShape::NoArgs => KeybindArgs::None,
                    CallShape::EventOnly => KeybindArgs::Event(event),
                    CallShape::KeyOnly => KeybindArgs::Key(key.as_str()),
                    CallShape::EventAndKey => KeybindArgs::EventAndKey(event, key.as_str()),
                };
                if entry.invoke(args)? == DispatchFlow::Block {
                    return Ok(());
                }
            }
            Ok(())
        })
    }
}
