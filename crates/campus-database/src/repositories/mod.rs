//! Repositories over the Campus schema.

pub mod principal;

pub use principal::PgPrincipalDirectory;
