// Fnmap Transform Layer
// Remap decision engine and correlation policy

pub mod engine;

pub use engine::{CorrelationPolicy, PolicyParseError, RemapEngine, Verdict};
