//! # campus-core
//!
//! Core crate for the Campus trust layer. Contains configuration schemas,
//! the unified error system, and the key-value contract the security
//! state store implementations fulfil.
//!
//! This crate has **no** internal dependencies on other Campus crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
