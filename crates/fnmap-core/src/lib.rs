// Fnmap Core Library
// Event-correlation engine for device-conditional key remapping

pub mod input;
pub mod key;
pub mod phase;
pub mod settings;
pub mod state;
pub mod table;
pub mod transform;

pub use input::{
    normalize_device, normalize_system, DeviceSignal, NormalizedEvent, Origin, SystemKeyEvent,
    Timestamp, KEYBOARD_PAGE,
};
pub use key::LogicalKey;
pub use phase::Phase;
pub use settings::{default_settings_content, Settings, SettingsError, DEFAULT_WINDOW_MS};
pub use state::{CorrelationStore, PendingEntry, SharedCorrelationStore};
pub use table::{key_for_system_code, key_for_usage};
pub use transform::{CorrelationPolicy, PolicyParseError, RemapEngine, Verdict};
