//! Repository layer
//!
//! The configuration store is the single shared resource behind the engine.
//! Stores serialize concurrent commits, reject stale fingerprints and
//! enforce the document-wide invariants on every change.
//!
//! The store is trait-based so the engine can run against any backend and
//! tests can observe exactly what gets committed.

mod invariants;
mod memory;
mod store;

// Re-export traits
pub use store::ConfigurationStore;

// Re-export implementations
pub use memory::InMemoryConfigStore;

pub use invariants::check_document;
