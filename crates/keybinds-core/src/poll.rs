/// Pressed-keys frame diffing.
///
/// Fallback edge detector for hosts where the detour cannot be
/// installed: the integration feeds the engine's `PressedKeys` array
/// once per frame and this turns it into press/release transitions.
/// The per-frame lists are very small, so a linear search is fine.
use crate::event::InputEvent;
use crate::key::KeyName;

/// Tracks the previous frame's pressed keys and emits edges.
#[derive(Debug, Default)]
pub struct PressedKeysDiff {
    last_frame: Vec<KeyName>,
}

impl PressedKeysDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare this frame's pressed keys against the previous frame.
    ///
    /// Keys present now but not last frame yield `Pressed`; keys
    /// present last frame but not now yield `Released`, in that order.
    /// Keys held across both frames yield nothing, which makes a
    /// separate dedup pass unnecessary on this path.
    pub fn update(&mut self, this_frame: &[KeyName]) -> Vec<(KeyName, InputEvent)> {
        let mut edges = Vec::new();
        for key in this_frame {
            if !self.last_frame.contains(key) {
                edges.push((key.clone(), InputEvent::Pressed));
            }
        }
        for key in &self.last_frame {
            if !this_frame.contains(key) {
                edges.push((key.clone(), InputEvent::Released));
            }
        }
        self.last_frame.clear();
        self.last_frame.extend_from_slice(this_frame);
        edges
    }
}
