// Fnmap Input Layer
// Raw event types and the event normalizer

pub mod event;
pub mod normalize;

pub use event::{DeviceSignal, NormalizedEvent, Origin, SystemKeyEvent, Timestamp, KEYBOARD_PAGE};
pub use normalize::{normalize_device, normalize_system};
