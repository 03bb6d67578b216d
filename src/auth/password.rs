use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("argon2 hashing failed: {0}")]
    Hash(password_hash::Error),
    #[error("stored credential is not an argon2 PHC string: {0}")]
    MalformedHash(password_hash::Error),
    #[error("password worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

fn hash_blocking(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            PasswordError::Hash(e)
        })
}

fn verify_blocking(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored credential does not parse");
        PasswordError::MalformedHash(e)
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "argon2 verify_password error");
            Err(PasswordError::Hash(e))
        }
    }
}

/// Hash with Argon2id and a fresh random salt, returning the PHC string.
/// Runs on the blocking pool so request workers are not stalled.
pub async fn hash_password(plain: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_blocking(&plain)).await?
}

/// Constant-time check of `plain` against a stored PHC string.
///
/// `Ok(false)` is a mismatch; `MalformedHash` means the stored value is not a hash at all.
pub async fn verify_password(plain: String, stored: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_blocking(&plain, &stored)).await?
}
