//! Bearer token signing, verification and claims.

pub mod claims;
pub mod codec;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, TokenType};
pub use codec::{IssuedToken, TokenCodec};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
