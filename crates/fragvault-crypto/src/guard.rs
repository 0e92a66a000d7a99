//! Access gate: one-way secret hashing and verification
//!
//! Uses the Argon2id PHC format with a fresh random salt per hash. This
//! gates access only — encryption key material comes from the separate
//! derivation in `kdf`, so neither role weakens the other.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};

use fragvault_core::{VaultError, VaultResult};

/// Hash a secret into an Argon2id PHC string (salt embedded).
///
/// The output allows verification but not recovery of the secret.
pub fn hash_secret(secret: &SecretString) -> VaultResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hashing secret: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a candidate secret against a stored PHC hash.
///
/// Recomputes with the embedded salt and parameters; the comparison inside
/// the argon2 crate is constant-time.
pub fn verify_secret(secret: &SecretString, hash: &str) -> VaultResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| VaultError::Format(format!("stored secret hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(secret.expose_secret().as_bytes(), &parsed)
        .is_ok())
}
