// Fnmap Input Layer - Event Normalizer
// Pure conversion from raw stream events to the internal representation

use crate::input::event::{
    DeviceSignal, NormalizedEvent, Origin, SystemKeyEvent, KEYBOARD_PAGE,
};
use crate::phase::Phase;
use crate::table;

/// Normalize a raw device signal.
///
/// Returns `None` (discard, not an error) unless the signal is on the
/// keyboard usage page and its usage is one of the twelve mapped
/// number-row positions. A non-zero value is a press, zero a release.
/// Redundant zero-value reports are absorbed downstream by the store's
/// idempotent clear, so no transition memory is kept here.
pub fn normalize_device(signal: &DeviceSignal) -> Option<NormalizedEvent> {
    if signal.usage_page != KEYBOARD_PAGE {
        return None;
    }
    let key = table::key_for_usage(signal.usage)?;
    Some(NormalizedEvent {
        key,
        phase: Phase::from_value(signal.value),
        origin: Origin::Device,
        timestamp: signal.timestamp,
    })
}

/// Normalize a raw system keystroke.
///
/// Returns `None` unless the key code is in the static remap table;
/// unrelated keys never reach the engine and pass through trivially.
pub fn normalize_system(event: &SystemKeyEvent) -> Option<NormalizedEvent> {
    let key = table::key_for_system_code(event.key_code)?;
    Some(NormalizedEvent {
        key,
        phase: Phase::from_is_press(event.is_press),
        origin: Origin::System,
        timestamp: event.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::LogicalKey;

    #[test]
    fn test_device_signal_keyboard_page() {
        let signal = DeviceSignal {
            usage_page: KEYBOARD_PAGE,
            usage: 0x1E,
            value: 1,
            timestamp: 10,
        };
        let ev = normalize_device(&signal).unwrap();
        assert_eq!(ev.key, LogicalKey::Digit1);
        assert!(ev.phase.is_press());
        assert_eq!(ev.origin, Origin::Device);
        assert_eq!(ev.timestamp, 10);
    }

    #[test]
    fn test_device_signal_release() {
        let signal = DeviceSignal {
            usage_page: KEYBOARD_PAGE,
            usage: 0x2D,
            value: 0,
            timestamp: 20,
        };
        let ev = normalize_device(&signal).unwrap();
        assert_eq!(ev.key, LogicalKey::Minus);
        assert!(ev.phase.is_release());
    }

    #[test]
    fn test_device_signal_wrong_page_discarded() {
        // Generic Desktop page (pointer movement) must not produce events
        let signal = DeviceSignal {
            usage_page: 0x01,
            usage: 0x1E,
            value: 1,
            timestamp: 0,
        };
        assert!(normalize_device(&signal).is_none());
    }

    #[test]
    fn test_device_signal_unmapped_usage_discarded() {
        let signal = DeviceSignal {
            usage_page: KEYBOARD_PAGE,
            usage: 0x04, // A
            value: 1,
            timestamp: 0,
        };
        assert!(normalize_device(&signal).is_none());
    }

    #[test]
    fn test_system_event_mapped() {
        let event = SystemKeyEvent {
            key_code: 18,
            is_press: true,
            timestamp: 30,
        };
        let ev = normalize_system(&event).unwrap();
        assert_eq!(ev.key, LogicalKey::Digit1);
        assert!(ev.phase.is_press());
        assert_eq!(ev.origin, Origin::System);
    }

    #[test]
    fn test_system_event_unmapped_discarded() {
        let event = SystemKeyEvent {
            key_code: 0, // A
            is_press: true,
            timestamp: 0,
        };
        assert!(normalize_system(&event).is_none());
    }
}
