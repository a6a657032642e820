//! # campus-cache
//!
//! Security state store implementations for Campus. Supports two modes:
//!
//! - **memory**: in-process map with per-entry deadlines, for tests and single-node use
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate,
//!   shared by every node so lockout counters and revocations are global
//!
//! The provider is selected at runtime based on configuration and wrapped
//! in a [`StoreManager`] that bounds every round-trip with a timeout.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
