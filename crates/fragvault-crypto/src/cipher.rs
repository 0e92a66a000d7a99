//! Per-fragment XChaCha20-Poly1305 encryption/decryption
//!
//! Encrypted fragment wire format:
//! ```text
//! [24 bytes: nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! nonce = HKDF(file_salt, "fragvault-nonce" || index_be)
//! AAD   = index_be (8 bytes) || file_salt (16 bytes)
//! ```
//!
//! The AAD binds each fragment to its position and file, preventing
//! fragment reordering and cross-file substitution. Failures are
//! fragment-local: decrypting one fragment never affects its siblings.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};

use fragvault_core::{EncryptedFragment, Fragment, VaultError, VaultResult, FILE_SALT_SIZE};

use crate::keys::{derive_nonce, FragmentKey};
use crate::{NONCE_SIZE, TAG_SIZE};

/// Encrypt a single fragment under the fragment key.
pub fn encrypt_fragment(
    key: &FragmentKey,
    file_salt: &[u8; FILE_SALT_SIZE],
    fragment: &Fragment,
) -> VaultResult<EncryptedFragment> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let nonce_bytes = derive_nonce(file_salt, fragment.index)?;
    let nonce = XNonce::from_slice(&nonce_bytes);
    let aad = build_aad(fragment.index, file_salt);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: &fragment.bytes,
                aad: &aad,
            },
        )
        .map_err(|e| anyhow::anyhow!("fragment {} encryption failed: {e}", fragment.index))?;

    let mut data = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    data.extend_from_slice(&nonce_bytes);
    data.extend_from_slice(&ciphertext);

    Ok(EncryptedFragment {
        index: fragment.index,
        data,
    })
}

/// Decrypt a single fragment, verifying its tag.
///
/// A structurally malformed input fails with `Format`; a tag mismatch
/// (tampered ciphertext, wrong key, or a fragment moved to another index)
/// fails with `Auth` — deliberately indistinguishable from a wrong secret.
pub fn decrypt_fragment(
    key: &FragmentKey,
    file_salt: &[u8; FILE_SALT_SIZE],
    encrypted: &EncryptedFragment,
) -> VaultResult<Fragment> {
    if encrypted.data.len() < NONCE_SIZE + TAG_SIZE {
        return Err(VaultError::Format(format!(
            "encrypted fragment {} too short: {} bytes (minimum {})",
            encrypted.index,
            encrypted.data.len(),
            NONCE_SIZE + TAG_SIZE
        )));
    }

    let (nonce_bytes, ciphertext) = encrypted.data.split_at(NONCE_SIZE);
    let nonce = XNonce::from_slice(nonce_bytes);
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let aad = build_aad(encrypted.index, file_salt);

    let bytes = cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: &aad,
            },
        )
        .map_err(|_| VaultError::Auth)?;

    Ok(Fragment {
        index: encrypted.index,
        bytes,
    })
}

/// Build AAD: index (8 bytes BE) || file_salt (16 bytes)
fn build_aad(index: u64, file_salt: &[u8; FILE_SALT_SIZE]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(8 + FILE_SALT_SIZE);
    aad.extend_from_slice(&index.to_be_bytes());
    aad.extend_from_slice(file_salt);
    aad
}
