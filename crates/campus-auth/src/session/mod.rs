//! Session state: refresh-token registry, revocation list, and the flows
//! that drive them.

pub mod manager;
pub mod registry;
pub mod revocation;

pub use manager::{AuthManager, AuthTokens, RefreshedToken};
pub use registry::RefreshRegistry;
pub use revocation::RevocationList;
