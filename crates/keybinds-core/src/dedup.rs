/// Duplicate-fire suppression.
///
/// The engine re-announces a held key's current state on every polling
/// tick, which would flood subscribers with identical press/release
/// notifications. Only edge transitions and explicit repeats are
/// meaningful, so a freshly observed event is dropped when it matches
/// the last recorded kind for that key. `Repeat` events are expected to
/// recur and are never suppressed.
use std::collections::HashMap;

use crate::event::InputEvent;
use crate::key::KeyName;

/// Per-key last-event state machine.
///
/// Entries are created lazily on first observation and live for the
/// process lifetime; there is no eviction.
#[derive(Debug, Default)]
pub struct DedupFilter {
    previous: HashMap<KeyName, InputEvent>,
}

impl DedupFilter {
    pub fn new() -> Self {
        Self {
            previous: HashMap::new(),
        }
    }

    /// Whether `event` should be suppressed as a duplicate of the last
    /// recorded kind for `key`. First observation is never suppressed.
    pub fn should_suppress(&self, key: &KeyName, event: InputEvent) -> bool {
        event != InputEvent::Repeat && self.previous.get(key) == Some(&event)
    }

    /// Record `event` as the latest kind observed for `key`.
    pub fn record(&mut self, key: &KeyName, event: InputEvent) {
        self.previous.insert(key.clone(), event);
    }

    /// Combined gate: returns `true` if the event should reach the
    /// dispatcher, recording it as the new latest kind. Suppressed
    /// events are not recorded.
    pub fn admit(&mut self, key: &KeyName, event: InputEvent) -> bool {
        if self.should_suppress(key, event) {
            return false;
        }
        self.record(key, event);
        true
    }
}
