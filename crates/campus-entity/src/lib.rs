//! # campus-entity
//!
//! Domain models the trust layer reads and writes. A [`principal::Principal`]
//! is a row of the `principals` table; its [`principal::Role`] resolves to a
//! fixed permission set at token issuance.

pub mod principal;
