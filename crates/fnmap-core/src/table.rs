// Fnmap Remap Table
// Reverse lookups from raw stream codes to logical keys

use std::collections::HashMap;
use std::sync::OnceLock;

use strum::IntoEnumIterator;

use crate::key::LogicalKey;

/// Look up the logical key for a device HID usage.
///
/// Returns `None` for usages outside the twelve mapped number-row
/// positions; the caller discards those signals.
pub fn key_for_usage(usage: u16) -> Option<LogicalKey> {
    static BY_USAGE: OnceLock<HashMap<u16, LogicalKey>> = OnceLock::new();
    BY_USAGE
        .get_or_init(|| LogicalKey::iter().map(|k| (k.usage(), k)).collect())
        .get(&usage)
        .copied()
}

/// Look up the logical key for a system virtual key code.
///
/// Returns `None` for key codes outside the remap table; those events
/// never reach the engine and pass through trivially.
pub fn key_for_system_code(key_code: u16) -> Option<LogicalKey> {
    static BY_CODE: OnceLock<HashMap<u16, LogicalKey>> = OnceLock::new();
    BY_CODE
        .get_or_init(|| LogicalKey::iter().map(|k| (k.system_code(), k)).collect())
        .get(&key_code)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lookup() {
        assert_eq!(key_for_usage(0x1E), Some(LogicalKey::Digit1));
        assert_eq!(key_for_usage(0x27), Some(LogicalKey::Digit0));
        assert_eq!(key_for_usage(0x2D), Some(LogicalKey::Minus));
        assert_eq!(key_for_usage(0x2E), Some(LogicalKey::Equal));
    }

    #[test]
    fn test_usage_lookup_unmapped() {
        assert_eq!(key_for_usage(0x04), None); // A
        assert_eq!(key_for_usage(0x28), None); // Enter
        assert_eq!(key_for_usage(0), None);
    }

    #[test]
    fn test_system_code_lookup() {
        assert_eq!(key_for_system_code(18), Some(LogicalKey::Digit1));
        assert_eq!(key_for_system_code(29), Some(LogicalKey::Digit0));
        assert_eq!(key_for_system_code(24), Some(LogicalKey::Equal));
    }

    #[test]
    fn test_system_code_lookup_unmapped() {
        assert_eq!(key_for_system_code(0), None); // A
        assert_eq!(key_for_system_code(122), None); // F1 itself is not remapped
    }

    #[test]
    fn test_lookups_invert_key_tables() {
        use strum::IntoEnumIterator;
        for key in LogicalKey::iter() {
            assert_eq!(key_for_usage(key.usage()), Some(key));
            assert_eq!(key_for_system_code(key.system_code()), Some(key));
        }
    }
}
