//! fragvault-crypto: secret-derived fragment encryption and the access gate
//!
//! Key material:
//! ```text
//! Secret (caller-supplied, ephemeral)
//!   ├── Access gate: Argon2id PHC hash, own random salt (guard.rs)
//!   │     — one-way, verified constant-time, never used for encryption
//!   └── Master key: Argon2id(secret, file_salt) (kdf.rs)
//!         └── Fragment key: HKDF-SHA256, domain "fragvault-fragment" (keys.rs)
//!               └── Fragment AEAD: XChaCha20-Poly1305,
//!                   nonce = HKDF(file_salt, "fragvault-nonce" || index),
//!                   AAD   = index_be || file_salt (cipher.rs)
//! ```
//!
//! The gate hash and the encryption key use independent salts and
//! derivations, so compromising one never weakens the other.

pub mod cipher;
pub mod guard;
pub mod kdf;
pub mod keys;

pub use cipher::{decrypt_fragment, encrypt_fragment};
pub use guard::{hash_secret, verify_secret};
pub use kdf::{derive_master_key, KdfParams, MasterKey};
pub use keys::{derive_fragment_key, derive_nonce, generate_file_salt, FragmentKey};

/// Size of derived keys in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;
