//! Key hierarchy: master key → fragment sub-key, deterministic nonces,
//! file salt generation

use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use fragvault_core::FILE_SALT_SIZE;

use crate::kdf::MasterKey;
use crate::{KEY_SIZE, NONCE_SIZE};

/// The 256-bit key used for fragment AEAD, derived from the master key.
/// Zeroized on drop.
#[derive(Clone)]
pub struct FragmentKey {
    bytes: [u8; KEY_SIZE],
}

impl FragmentKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for FragmentKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for FragmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 16-byte per-file salt.
pub fn generate_file_salt() -> [u8; FILE_SALT_SIZE] {
    let mut salt = [0u8; FILE_SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Derive the fragment encryption key from the master key via HKDF-SHA256.
///
/// The domain string keeps this sub-key independent from any other use of
/// the master key.
pub fn derive_fragment_key(master: &MasterKey) -> anyhow::Result<FragmentKey> {
    let hkdf = Hkdf::<Sha256>::new(None, master.as_bytes());
    let mut okm = [0u8; KEY_SIZE];
    hkdf.expand(b"fragvault-fragment", &mut okm)
        .map_err(|e| anyhow::anyhow!("HKDF expand failed: {e}"))?;
    Ok(FragmentKey::from_bytes(okm))
}

/// Derive the nonce for a fragment deterministically from the file salt and
/// fragment index.
///
/// Uniqueness within a file's key scope is structural: two fragments of one
/// file always have distinct indices, and two files always have distinct
/// salts (and therefore distinct keys), so a (key, nonce) pair can never
/// repeat without a prior precondition violation.
pub fn derive_nonce(
    file_salt: &[u8; FILE_SALT_SIZE],
    index: u64,
) -> anyhow::Result<[u8; NONCE_SIZE]> {
    let hkdf = Hkdf::<Sha256>::new(None, file_salt);
    let mut info = Vec::with_capacity(15 + 8);
    info.extend_from_slice(b"fragvault-nonce");
    info.extend_from_slice(&index.to_be_bytes());

    let mut nonce = [0u8; NONCE_SIZE];
    hkdf.expand(&info, &mut nonce)
        .map_err(|e| anyhow::anyhow!("HKDF expand failed: {e}"))?;
    Ok(nonce)
}
