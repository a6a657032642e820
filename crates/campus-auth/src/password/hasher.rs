//! Argon2id credential hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use campus_core::error::AppError;

/// Hashes and verifies credentials using Argon2id.
///
/// Verification reads its cost parameters from the stored PHC string, so
/// hashes produced under older parameters keep verifying after a change.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Creates a hasher with the library's recommended parameters.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Creates a hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext credential with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a plaintext credential against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when the stored
    /// hash is unusable.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::error::ErrorKind;

    fn cheap() -> PasswordHasher {
        PasswordHasher::with_params(Params::new(1024, 1, 1, None).unwrap())
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap();
        let hash = hasher.hash_password("Tr1cky-Passphrase!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("Tr1cky-Passphrase!", &hash).unwrap());
        assert!(!hasher.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = cheap();
        assert_ne!(
            hasher.hash_password("same").unwrap(),
            hasher.hash_password("same").unwrap()
        );
    }

    #[test]
    fn test_verify_uses_stored_params() {
        let hash = cheap().hash_password("secret").unwrap();
        assert!(PasswordHasher::new().verify_password("secret", &hash).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_internal_error() {
        let err = cheap().verify_password("x", "not-a-phc-string").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
