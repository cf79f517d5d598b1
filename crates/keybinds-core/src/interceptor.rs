/// The interception service.
///
/// One long-lived object owning the dedup filter, context classifier,
/// subscription registry, and dispatcher. The hook boundary calls
/// `on_input_event` for every intercepted call and then forwards to the
/// original function on its own; nothing here affects control flow
/// visible to the host.
use std::sync::{Arc, Mutex};

use log::{error, warn};

use crate::context::{ClassId, ClassResolver, ContextClassifier, InputContext};
use crate::dedup::DedupFilter;
use crate::dispatch::{Dispatcher, NullGate, RuntimeGate};
use crate::event::InputEvent;
use crate::key::{BindTarget, KeyName};
use crate::poll::PressedKeysDiff;
use crate::registry::{BindHandle, KeybindCallback, KeybindRegistry};

/// Argument layout of one intercepted call, marshalled out of the raw
/// boundary. `event` is the unvalidated byte the host passed.
#[derive(Debug, Clone)]
pub struct InputFrame {
    pub controller: i32,
    pub key: KeyName,
    pub event: u8,
    pub amount_depressed: f32,
    pub is_gamepad: bool,
    pub invoker_class: ClassId,
}

pub struct InputInterceptor {
    dedup: Mutex<DedupFilter>,
    classifier: ContextClassifier,
    registry: Arc<KeybindRegistry>,
    dispatcher: Dispatcher,
    pressed_keys: Mutex<PressedKeysDiff>,
}

impl InputInterceptor {
    pub fn new(resolver: Box<dyn ClassResolver>, gate: Box<dyn RuntimeGate>) -> Self {
        let registry = Arc::new(KeybindRegistry::new());
        Self {
            dedup: Mutex::new(DedupFilter::new()),
            classifier: ContextClassifier::new(resolver),
            registry: registry.clone(),
            dispatcher: Dispatcher::new(registry, gate),
            pressed_keys: Mutex::new(PressedKeysDiff::new()),
        }
    }

    /// Service with no runtime exclusive section.
    pub fn with_resolver(resolver: Box<dyn ClassResolver>) -> Self {
        Self::new(resolver, Box::new(NullGate))
    }

    /// Handle one intercepted input call: classify, validate, dedup,
    /// dispatch. Callback failures are reported here and never reach
    /// the hook boundary; the caller forwards to the original function
    /// regardless of what happens in this method.
    pub fn on_input_event(&self, frame: &InputFrame) {
        let context = self.classifier.classify(frame.invoker_class);

        let Some(event) = InputEvent::from_raw(frame.event) else {
            warn!(
                "ignoring input event with out-of-range kind {} for key {}",
                frame.event, frame.key
            );
            return;
        };

        if !self.dedup.lock().unwrap().admit(&frame.key, event) {
            return;
        }

        if let Err(err) = self.dispatcher.dispatch(&frame.key, event, context) {
            error!("keybind callback failed for key {}: {err:#}", frame.key);
        }
    }

    /// Polling fallback: feed one frame of the engine's pressed-keys
    /// array. Edges dispatch as gameplay-context events, bypassing the
    /// dedup filter (the diff is already edge-triggered).
    pub fn on_pressed_keys_frame(&self, keys: &[KeyName]) {
        let edges = self.pressed_keys.lock().unwrap().update(keys);
        for (key, event) in edges {
            if let Err(err) = self
                .dispatcher
                .dispatch(&key, event, InputContext::Gameplay)
            {
                error!("keybind callback failed for key {key}: {err:#}");
            }
        }
    }

    // Registration API, consumed by the embedding runtime's bindings.

    /// Register a keybind. `key = None` registers a wildcard that
    /// receives every key.
    pub fn register_keybind(
        &self,
        key: Option<KeyName>,
        filter: Option<InputEvent>,
        context: InputContext,
        callback: KeybindCallback,
    ) -> BindHandle {
        self.registry.register(key, filter, context, callback)
    }

    /// Remove one keybind by handle. Unknown handles are a no-op.
    pub fn deregister_keybind(&self, handle: BindHandle) {
        self.registry.deregister(handle);
    }

    /// Remove every keybind registered under exactly this target.
    pub fn deregister_by_key(&self, target: &BindTarget) {
        self.registry.deregister_by_key(target);
    }

    /// Remove every keybind.
    pub fn deregister_all(&self) {
        self.registry.deregister_all();
    }

    /// Enable or disable a keybind without removing it.
    pub fn set_keybind_enabled(&self, handle: BindHandle, enabled: bool) -> bool {
        self.registry.set_enabled(handle, enabled)
    }

    pub fn registry(&self) -> &Arc<KeybindRegistry> {
        &self.registry
    }
}
