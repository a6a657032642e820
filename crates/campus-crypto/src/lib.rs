//! # campus-crypto
//!
//! Stateless primitives for storing personally-identifiable data as
//! ciphertext while keeping it searchable by exact match.
//!
//! - [`FieldCipher`] encrypts with AES-256-GCM under a process-wide key.
//!   Output layout is `IV ‖ ciphertext ‖ tag`.
//! - [`search_hash`] is a deterministic SHA-256 digest of the plaintext,
//!   stored beside the ciphertext for equality lookups.
//! - [`EncryptedField`] / [`SearchableField`] are the persisted shapes,
//!   produced and consumed by pure transforms at the persistence boundary.
//!
//! The key is supplied by configuration and never rotated here.

pub mod cipher;
pub mod error;
pub mod field;
pub mod hash;

pub use cipher::FieldCipher;
pub use error::CryptoError;
pub use field::{EncryptedField, SearchableField};
pub use hash::{SearchHash, search_hash};
