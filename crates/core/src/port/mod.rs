// Port Layer - Interfaces for external dependencies

pub mod id_provider; // Request IDs
pub mod time_provider;

// Re-exports
pub use id_provider::{IdProvider, UuidProvider};
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
