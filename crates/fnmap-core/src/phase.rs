use std::fmt;

/// Phase of a key event, shared by both streams.
///
/// The device stream derives the phase from the raw report value
/// (non-zero is a press, zero is a release); the system stream reports it
/// directly. Auto-repeat arrives as additional press events while the key
/// is held and is resolved by the decision engine, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Release,
    Press,
}

impl Phase {
    /// Returns true if this is a press event
    pub fn is_press(self) -> bool {
        matches!(self, Phase::Press)
    }

    /// Returns true if this is a release event
    pub fn is_release(self) -> bool {
        matches!(self, Phase::Release)
    }

    /// Derive the phase from a raw device report value
    pub fn from_value(value: i64) -> Self {
        if value != 0 {
            Phase::Press
        } else {
            Phase::Release
        }
    }

    /// Derive the phase from the system stream's press flag
    pub fn from_is_press(is_press: bool) -> Self {
        if is_press {
            Phase::Press
        } else {
            Phase::Release
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Release => write!(f, "release"),
            Phase::Press => write!(f, "press"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_properties() {
        assert!(Phase::Press.is_press());
        assert!(!Phase::Press.is_release());

        assert!(Phase::Release.is_release());
        assert!(!Phase::Release.is_press());
    }

    #[test]
    fn test_phase_from_value() {
        assert_eq!(Phase::from_value(1), Phase::Press);
        assert_eq!(Phase::from_value(-1), Phase::Press);
        assert_eq!(Phase::from_value(0), Phase::Release);
    }

    #[test]
    fn test_phase_from_is_press() {
        assert_eq!(Phase::from_is_press(true), Phase::Press);
        assert_eq!(Phase::from_is_press(false), Phase::Release);
    }
}
