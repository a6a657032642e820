//! Core traits defined in `campus-core` and implemented by other crates.

pub mod security_store;

pub use security_store::SecurityStore;
