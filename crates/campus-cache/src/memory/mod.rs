//! In-memory security store.

pub mod store;

pub use store::MemorySecurityStore;
