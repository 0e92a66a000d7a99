//! Download flow: lookup → gate → fetch + decrypt → reassemble
//!
//! The secret is verified against the stored hash before any fragment is
//! fetched, so a wrong secret costs no storage I/O. Per-fragment
//! authentication failures surface as the same `Auth` error as a wrong
//! secret — callers get no oracle separating corruption from a bad guess.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use fragvault_core::config::VaultConfig;
use fragvault_core::{EncryptedFragment, VaultError, VaultResult};
use fragvault_crypto::{
    decrypt_fragment, derive_fragment_key, derive_master_key, verify_secret, KdfParams,
};
use fragvault_storage::{Catalog, FragmentStore};

use crate::gather::gather_indexed;

pub struct DownloadRequest {
    pub file_id: String,
    pub secret: SecretString,
}

/// Download a file: verify the secret, fetch and decrypt all fragments
/// concurrently, reassemble byte-exactly.
pub async fn download(
    store: Arc<dyn FragmentStore>,
    catalog: &dyn Catalog,
    config: &VaultConfig,
    request: DownloadRequest,
) -> VaultResult<Vec<u8>> {
    if request.file_id.trim().is_empty() {
        return Err(VaultError::Validation("no file id provided".into()));
    }
    if request.secret.expose_secret().is_empty() {
        return Err(VaultError::Validation("no secret provided".into()));
    }

    let record = catalog
        .find_by_id(&request.file_id)
        .await?
        .ok_or_else(|| VaultError::NotFound(format!("file {}", request.file_id)))?;

    if !verify_secret(&request.secret, &record.secret_hash)? {
        debug!(file_id = %record.id, "secret verification failed");
        return Err(VaultError::Auth);
    }

    // Gate passed; re-derive the encryption key from the persisted salt.
    let kdf_params = KdfParams {
        mem_cost_kib: config.crypto.argon2_mem_cost_kib,
        time_cost: config.crypto.argon2_time_cost,
        parallelism: config.crypto.argon2_parallelism,
    };
    let master_key = derive_master_key(&request.secret, &record.file_salt, &kdf_params)?;
    let fragment_key = derive_fragment_key(&master_key)?;
    let file_salt = record.file_salt;

    let fragment_count = record.fragment_refs.len();
    debug!(file_id = %record.id, fragments = fragment_count, "download: fetching and decrypting");

    let file_id = record.id.clone();
    let jobs = record
        .fragment_refs
        .into_iter()
        .enumerate()
        .map(|(index, reference)| {
            let store = store.clone();
            let key = fragment_key.clone();
            let file_id = file_id.clone();
            async move {
                let index = index as u64;
                let data = store.get(&reference).await?;
                let fragment = decrypt_fragment(&key, &file_salt, &EncryptedFragment { index, data })
                    .inspect_err(|err| {
                        // Index attribution stays server-side; the caller
                        // sees only the uniform error.
                        warn!(file_id = %file_id, index, error = %err, "fragment decryption failed");
                    })?;
                Ok((index, fragment))
            }
        });

    let fragments = gather_indexed(config.engine.max_inflight, fragment_count, jobs).await?;
    let data = fragvault_fragment::merge(fragments)?;

    if data.len() as u64 != record.total_size {
        return Err(VaultError::Format(format!(
            "reassembled size {} does not match record size {}",
            data.len(),
            record.total_size
        )));
    }

    info!(file_id = %record.id, bytes = data.len(), "download complete");
    Ok(data)
}
