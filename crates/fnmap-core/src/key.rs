// Fnmap Logical Keys
// Canonical identifiers for the twelve remappable number-row positions

use std::fmt;
use std::str::FromStr;

use strum_macros::EnumIter;

/// One physical number-row key position, independent of which stream
/// reported it.
///
/// The same position is known by three different codes: the HID usage the
/// device stream reports, the virtual key code the system stream reports,
/// and the function-key code it rewrites to. All three are fixed at
/// compile time; the accessors below are total over the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum LogicalKey {
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Digit0,
    Minus,
    Equal,
}

impl LogicalKey {
    /// Number of remappable positions.
    pub const COUNT: usize = 12;

    /// HID usage on the keyboard usage page, as reported by the device
    /// stream.
    pub fn usage(self) -> u16 {
        match self {
            LogicalKey::Digit1 => 0x1E,
            LogicalKey::Digit2 => 0x1F,
            LogicalKey::Digit3 => 0x20,
            LogicalKey::Digit4 => 0x21,
            LogicalKey::Digit5 => 0x22,
            LogicalKey::Digit6 => 0x23,
            LogicalKey::Digit7 => 0x24,
            LogicalKey::Digit8 => 0x25,
            LogicalKey::Digit9 => 0x26,
            LogicalKey::Digit0 => 0x27,
            LogicalKey::Minus => 0x2D,
            LogicalKey::Equal => 0x2E,
        }
    }

    /// Virtual key code the system stream reports for this position.
    pub fn system_code(self) -> u16 {
        match self {
            LogicalKey::Digit1 => 18,
            LogicalKey::Digit2 => 19,
            LogicalKey::Digit3 => 20,
            LogicalKey::Digit4 => 21,
            LogicalKey::Digit5 => 23,
            LogicalKey::Digit6 => 22,
            LogicalKey::Digit7 => 26,
            LogicalKey::Digit8 => 28,
            LogicalKey::Digit9 => 25,
            LogicalKey::Digit0 => 29,
            LogicalKey::Minus => 27,
            LogicalKey::Equal => 24,
        }
    }

    /// Function-key code this position rewrites to when the remap is
    /// authorized (F1 through F12, in row order).
    pub fn target_code(self) -> u16 {
        match self {
            LogicalKey::Digit1 => 122,
            LogicalKey::Digit2 => 120,
            LogicalKey::Digit3 => 99,
            LogicalKey::Digit4 => 118,
            LogicalKey::Digit5 => 96,
            LogicalKey::Digit6 => 97,
            LogicalKey::Digit7 => 98,
            LogicalKey::Digit8 => 100,
            LogicalKey::Digit9 => 101,
            LogicalKey::Digit0 => 109,
            LogicalKey::Minus => 103,
            LogicalKey::Equal => 111,
        }
    }

    /// Function-key number (1-12) for display purposes.
    pub fn function_number(self) -> u8 {
        match self {
            LogicalKey::Digit1 => 1,
            LogicalKey::Digit2 => 2,
            LogicalKey::Digit3 => 3,
            LogicalKey::Digit4 => 4,
            LogicalKey::Digit5 => 5,
            LogicalKey::Digit6 => 6,
            LogicalKey::Digit7 => 7,
            LogicalKey::Digit8 => 8,
            LogicalKey::Digit9 => 9,
            LogicalKey::Digit0 => 10,
            LogicalKey::Minus => 11,
            LogicalKey::Equal => 12,
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalKey::Digit1 => "1",
            LogicalKey::Digit2 => "2",
            LogicalKey::Digit3 => "3",
            LogicalKey::Digit4 => "4",
            LogicalKey::Digit5 => "5",
            LogicalKey::Digit6 => "6",
            LogicalKey::Digit7 => "7",
            LogicalKey::Digit8 => "8",
            LogicalKey::Digit9 => "9",
            LogicalKey::Digit0 => "0",
            LogicalKey::Minus => "minus",
            LogicalKey::Equal => "equal",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LogicalKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(LogicalKey::Digit1),
            "2" => Ok(LogicalKey::Digit2),
            "3" => Ok(LogicalKey::Digit3),
            "4" => Ok(LogicalKey::Digit4),
            "5" => Ok(LogicalKey::Digit5),
            "6" => Ok(LogicalKey::Digit6),
            "7" => Ok(LogicalKey::Digit7),
            "8" => Ok(LogicalKey::Digit8),
            "9" => Ok(LogicalKey::Digit9),
            "0" => Ok(LogicalKey::Digit0),
            "minus" => Ok(LogicalKey::Minus),
            "equal" => Ok(LogicalKey::Equal),
            _ => Err(()),
        }
    }
}
