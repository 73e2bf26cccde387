// Fnmap Input Layer - Event Types
// Raw collaborator-facing events and the normalized internal form

use crate::key::LogicalKey;
use crate::phase::Phase;

/// HID keyboard usage page
pub const KEYBOARD_PAGE: u16 = 0x07;

/// Milliseconds on the host's monotonic event clock.
///
/// Both streams stamp their events on the same clock; the correlation
/// window is measured in this unit.
pub type Timestamp = u64;

/// Raw signal from the special device's input report callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSignal {
    /// HID usage page of the element that changed
    pub usage_page: u16,
    /// HID usage within the page
    pub usage: u16,
    /// Raw element value (non-zero = pressed, zero = released)
    pub value: i64,
    /// Event time on the host clock
    pub timestamp: Timestamp,
}

/// Raw keystroke from the system-wide interception callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemKeyEvent {
    /// System virtual key code
    pub key_code: u16,
    /// True for key-down, false for key-up
    pub is_press: bool,
    /// Event time on the host clock
    pub timestamp: Timestamp,
}

/// Which stream an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Keyboard-page signal attributed to the special device
    Device,
    /// Keystroke delivered by the system to all applications
    System,
}

/// Minimal internal representation shared by both streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub key: LogicalKey,
    pub phase: Phase,
    pub origin: Origin,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_page_constant() {
        // Keyboard/Keypad page from the HID usage tables
        assert_eq!(KEYBOARD_PAGE, 0x07);
    }

    #[test]
    fn test_normalized_event_fields() {
        let ev = NormalizedEvent {
            key: LogicalKey::Digit1,
            phase: Phase::Press,
            origin: Origin::Device,
            timestamp: 42,
        };
        assert_eq!(ev.key, LogicalKey::Digit1);
        assert!(ev.phase.is_press());
        assert_eq!(ev.origin, Origin::Device);
        assert_eq!(ev.timestamp, 42);
    }
}
