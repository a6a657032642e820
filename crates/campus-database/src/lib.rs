//! # campus-database
//!
//! PostgreSQL connection management, migrations, and the
//! [`repositories::PgPrincipalDirectory`] that backs authentication.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::PgPrincipalDirectory;
