//! # campus-auth
//!
//! Authentication and session state for the Campus platform.
//!
//! ## Modules
//!
//! - `jwt`: bearer token signing, verification and claims
//! - `password`: Argon2id credential hashing and policy enforcement
//! - `lockout`: distributed failed-attempt counting and account lockout
//! - `session`: refresh-token registry, revocation list, and the
//!   [`AuthManager`] that ties them together

pub mod error;
pub mod jwt;
pub mod lockout;
pub mod password;
pub mod session;

pub use error::{AuthError, TokenError};
pub use jwt::{Claims, TokenCodec, TokenType};
pub use lockout::{LockoutPolicy, LockoutState};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{AuthManager, AuthTokens, RefreshedToken};
