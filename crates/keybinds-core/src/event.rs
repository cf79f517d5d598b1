/// Input event kinds.
///
/// Ordinals mirror `Core.Object.EInputEvent` exactly; the host passes
/// these values across the hook boundary as raw bytes, so they must
/// never be reordered.
/// Phase of an input occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InputEvent {
    Pressed = 0,
    Released = 1,
    Repeat = 2,
    DoubleClick = 3,
    Axis = 4,
}

/// Out-of-range sentinel (`IE_MAX`). Used only for validation.
pub const MAX_EVENT: u8 = 5;

impl InputEvent {
    /// Validate a raw byte from the host. Returns `None` for `>= IE_MAX`.
    pub fn from_raw(raw: u8) -> Option<InputEvent> {
        match raw {
            0 => Some(InputEvent::Pressed),
            1 => Some(InputEvent::Released),
            2 => Some(InputEvent::Repeat),
            3 => Some(InputEvent::DoubleClick),
            4 => Some(InputEvent::Axis),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_host_enum() {
        assert_eq!(InputEvent::Pressed.as_raw(), 0);
        assert_eq!(InputEvent::Released.as_raw(), 1);
        assert_eq!(InputEvent::Repeat.as_raw(), 2);
        assert_eq!(InputEvent::DoubleClick.as_raw(), 3);
        assert_eq!(InputEvent::Axis.as_raw(), 4);
        assert_eq!(MAX_EVENT, 5);
    }

    #[test]
    fn from_raw_round_trips() {
        for raw in 0..MAX_EVENT {
            let event = InputEvent::from_raw(raw).unwrap();
            assert_eq!(event.as_raw(), raw);
        }
    }

    #[test]
    fn from_raw_rejects_out_of_range() {
        assert_eq!(InputEvent::from_raw(MAX_EVENT), None);
        assert_eq!(InputEvent::from_raw(255), None);
    }
}
