// Fnmap State Layer
// Correlation store shared by both producer contexts

pub mod store;

pub use store::{CorrelationStore, PendingEntry, SharedCorrelationStore};
