//! Principal repository implementing the directory contract.

use async_trait::async_trait;
use sqlx::PgPool;

use campus_core::error::{AppError, ErrorKind};
use campus_core::result::AppResult;
use campus_crypto::{EncryptedField, FieldCipher, search_hash};
use campus_entity::principal::{Principal, PrincipalDirectory, Role};

const PRINCIPAL_COLUMNS: &str = "id, login, credential_hash, display_name, role, active, \
     last_authenticated_at, credential_changed_at";

/// PostgreSQL-backed principal directory.
///
/// The contact email is PII and only ever reaches the table as
/// ciphertext beside its search hash; lookups go through the hash.
#[derive(Debug, Clone)]
pub struct PgPrincipalDirectory {
    pool: PgPool,
    cipher: FieldCipher,
}

impl PgPrincipalDirectory {
    /// Create a new principal directory.
    pub fn new(pool: PgPool, cipher: FieldCipher) -> Self {
        Self { pool, cipher }
    }

    /// Insert a principal and return its generated id.
    ///
    /// The optional email is sealed and written by the same statement, so
    /// a principal never exists without the email it was created with.
    pub async fn create(
        &self,
        login: &str,
        credential_hash: &str,
        display_name: &str,
        role: Role,
        email: Option<&str>,
    ) -> AppResult<i64> {
        let (ciphertext, hash) = seal_email(&self.cipher, email)?;
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO principals \
             (login, credential_hash, display_name, role, email_ciphertext, email_search_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(login)
        .bind(credential_hash)
        .bind(display_name)
        .bind(role)
        .bind(ciphertext)
        .bind(hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create principal", e))
    }

    /// Encrypt and store the principal's contact email.
    pub async fn set_email(&self, id: i64, email: &str) -> AppResult<()> {
        let (ciphertext, hash) = seal_email(&self.cipher, Some(email))?;
        let result = sqlx::query(
            "UPDATE principals SET email_ciphertext = $2, email_search_hash = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(ciphertext)
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to store principal email", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Principal {id} not found")));
        }
        Ok(())
    }

    /// Decrypt the principal's contact email, if one is stored.
    pub async fn email(&self, id: i64) -> AppResult<Option<String>> {
        let row: Option<Option<Vec<u8>>> =
            sqlx::query_scalar("SELECT email_ciphertext FROM principals WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to load principal email", e))?;

        match row.flatten() {
            Some(bytes) => {
                let field = EncryptedField::from_bytes(&bytes)?;
                Ok(Some(self.cipher.open(&field)?))
            }
            None => Ok(None),
        }
    }

    /// Exact-match lookup by email without decrypting any row.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        let hash = search_hash(&normalize_email(email));
        sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE email_search_hash = $1"
        ))
        .bind(hash.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find principal by email", e))
    }
}

#[async_trait]
impl PrincipalDirectory for PgPrincipalDirectory {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<Principal>> {
        sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE login = $1"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find principal by login", e))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Principal>> {
        sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find principal by id", e))
    }

    async fn save(&self, principal: &Principal) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE principals SET credential_hash = $2, display_name = $3, role = $4, \
             active = $5, last_authenticated_at = $6, credential_changed_at = $7 \
             WHERE id = $1",
        )
        .bind(principal.id)
        .bind(&principal.credential_hash)
        .bind(&principal.display_name)
        .bind(principal.role)
        .bind(principal.active)
        .bind(principal.last_authenticated_at)
        .bind(principal.credential_changed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save principal", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Principal {} not found",
                principal.id
            )));
        }
        Ok(())
    }
}

/// Emails compare case-insensitively, so the hash is taken over one form.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Column values for an optional email: ciphertext bytes and search hash.
fn seal_email(
    cipher: &FieldCipher,
    email: Option<&str>,
) -> AppResult<(Option<Vec<u8>>, Option<String>)> {
    match email {
        Some(email) => {
            let sealed = cipher.seal_searchable(&normalize_email(email))?;
            Ok((
                Some(sealed.encrypted.to_bytes()),
                Some(sealed.search_hash.as_str().to_string()),
            ))
        }
        None => Ok((None, None)),
    }
}

fn db_error(context: &str, e: sqlx::Error) -> AppError {
    let kind = match &e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, context.to_string(), e)
}
