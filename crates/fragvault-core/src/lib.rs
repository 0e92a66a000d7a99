//! fragvault-core: shared error taxonomy, record types, and configuration

pub mod config;
pub mod error;
pub mod types;

pub use error::{VaultError, VaultResult};
pub use types::{EncryptedFragment, FileRecord, Fragment, FragmentRef, FILE_SALT_SIZE};
