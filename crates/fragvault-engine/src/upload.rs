//! Upload flow: fragment → encrypt → store → commit
//!
//! State machine: Idle → Fragmenting → Encrypting/Uploading (one bounded
//! task set, since each fragment is encrypted and stored independently)
//! → Committed | Aborted. The catalog record is the commit point; an
//! aborted upload leaves no record and its stored fragments orphaned.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use uuid::Uuid;

use fragvault_core::config::VaultConfig;
use fragvault_core::{FileRecord, FragmentRef, VaultError, VaultResult};
use fragvault_crypto::{
    derive_fragment_key, derive_master_key, encrypt_fragment, generate_file_salt, hash_secret,
    KdfParams,
};
use fragvault_storage::{Catalog, FragmentStore};

use crate::gather::gather_indexed;

pub struct UploadRequest {
    pub name: String,
    pub owner_id: String,
    pub data: Vec<u8>,
    pub secret: SecretString,
}

#[derive(Debug)]
pub struct UploadReceipt {
    pub file_id: String,
    pub fragment_refs: Vec<FragmentRef>,
    pub fragment_count: usize,
    pub total_size: u64,
}

/// Upload a file: every fragment is encrypted under key material derived
/// from `(secret, fresh file salt)` and stored; only after all puts
/// succeed is the catalog record created.
pub async fn upload(
    store: Arc<dyn FragmentStore>,
    catalog: &dyn Catalog,
    config: &VaultConfig,
    request: UploadRequest,
) -> VaultResult<UploadReceipt> {
    if request.name.trim().is_empty() {
        return Err(VaultError::Validation("no file name provided".into()));
    }
    if request.secret.expose_secret().is_empty() {
        return Err(VaultError::Validation("no secret provided".into()));
    }
    if request.data.is_empty() {
        // Zero fragments would make an unretrievable record; reject up front.
        return Err(VaultError::Validation("file is empty".into()));
    }

    let total_size = request.data.len() as u64;
    let fragments = fragvault_fragment::split(&request.data, config.engine.fragment_size)?;
    let fragment_count = fragments.len();

    let file_salt = generate_file_salt();
    let kdf_params = KdfParams {
        mem_cost_kib: config.crypto.argon2_mem_cost_kib,
        time_cost: config.crypto.argon2_time_cost,
        parallelism: config.crypto.argon2_parallelism,
    };
    let master_key = derive_master_key(&request.secret, &file_salt, &kdf_params)?;
    let fragment_key = derive_fragment_key(&master_key)?;

    let file_id = Uuid::new_v4().to_string();
    debug!(
        file_id = %file_id,
        fragments = fragment_count,
        bytes = total_size,
        "upload: encrypting and storing"
    );

    let jobs = fragments.into_iter().map(|fragment| {
        let store = store.clone();
        let key = fragment_key.clone();
        let scope = file_id.clone();
        async move {
            let index = fragment.index;
            let encrypted = encrypt_fragment(&key, &file_salt, &fragment)?;
            let reference = store.put(&scope, index, encrypted.data).await?;
            Ok((index, reference))
        }
    });

    let fragment_refs = match gather_indexed(config.engine.max_inflight, fragment_count, jobs).await
    {
        Ok(refs) => refs,
        Err(err) => {
            warn!(
                file_id = %file_id,
                error = %err,
                "upload aborted; already-stored fragments remain orphaned"
            );
            return Err(err);
        }
    };

    // Commit point: all fragments acknowledged, now and only now write the
    // catalog record.
    let secret_hash = hash_secret(&request.secret)?;
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let record = FileRecord {
        id: file_id.clone(),
        name: request.name,
        owner_id: request.owner_id,
        secret_hash,
        file_salt,
        fragment_refs: fragment_refs.clone(),
        fragment_size: config.engine.fragment_size,
        total_size,
        created_at,
    };
    catalog.create(record).await?;

    info!(
        file_id = %file_id,
        fragments = fragment_count,
        bytes = total_size,
        "upload committed"
    );

    Ok(UploadReceipt {
        file_id,
        fragment_refs,
        fragment_count,
        total_size,
    })
}
