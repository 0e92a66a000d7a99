use serde::{Deserialize, Serialize};

/// Length of the per-file salt stored on the catalog record.
pub const FILE_SALT_SIZE: usize = 16;

/// An ordered plaintext chunk of a file. Indices are 0-based and
/// contiguous; concatenating fragments in index order reproduces the
/// original byte stream exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub index: u64,
    pub bytes: Vec<u8>,
}

/// Authenticated-encryption output for a single fragment.
///
/// `data` is the wire form `[24-byte nonce][ciphertext][16-byte tag]`.
/// The nonce is derived deterministically from (file salt, index) but is
/// still carried explicitly so decryption never depends on the derivation
/// staying in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedFragment {
    pub index: u64,
    pub data: Vec<u8>,
}

/// Opaque reference to a stored fragment (an object key in the fragment
/// store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentRef(pub String);

impl FragmentRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FragmentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog entry for an uploaded file.
///
/// Created exactly once, after every fragment upload has acknowledged
/// success; a record existing implies all of its fragments are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    /// Argon2id PHC string gating access; one-way, never reveals the secret.
    pub secret_hash: String,
    /// Per-file salt for encryption key and nonce derivation (hex on the wire).
    #[serde(with = "hex_salt")]
    pub file_salt: [u8; FILE_SALT_SIZE],
    /// Storage references in fragment index order.
    pub fragment_refs: Vec<FragmentRef>,
    /// Fragment size used at upload time, persisted so download does not
    /// rely on a shared constant staying in sync.
    pub fragment_size: u32,
    /// Original file size in bytes.
    pub total_size: u64,
    /// Unix timestamp of the upload commit.
    pub created_at: u64,
}

mod hex_salt {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::FILE_SALT_SIZE;

    pub fn serialize<S: Serializer>(salt: &[u8; FILE_SALT_SIZE], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(salt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<[u8; FILE_SALT_SIZE], D::Error> {
        let encoded = String::deserialize(d)?;
        let bytes = hex::decode(&encoded).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("file_salt must be 16 bytes"))
    }
}
