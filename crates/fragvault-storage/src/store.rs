//! Fragment store trait and the OpenDAL-backed implementation

use async_trait::async_trait;
use opendal::Operator;

use fragvault_core::{FragmentRef, VaultError, VaultResult};

/// Object storage for encrypted fragments.
///
/// `put` stores one fragment under a caller-chosen scope and index and
/// returns an opaque reference; `get` fetches the exact bytes back. No
/// implementation retries — a failed call is reported as-is.
#[async_trait]
pub trait FragmentStore: Send + Sync {
    async fn put(&self, scope: &str, index: u64, data: Vec<u8>) -> VaultResult<FragmentRef>;
    async fn get(&self, reference: &FragmentRef) -> VaultResult<Vec<u8>>;
}

/// Fragment store backed by an OpenDAL operator (S3-compatible).
///
/// Object key layout: `{prefix}/fragments/{scope}/{index}`. The scope is
/// unique per upload attempt, so an aborted upload can never collide with
/// a committed one.
pub struct OpendalStore {
    op: Operator,
    prefix: String,
}

impl OpendalStore {
    pub fn new(op: Operator, prefix: impl Into<String>) -> Self {
        Self {
            op,
            prefix: prefix.into(),
        }
    }

    fn key(&self, scope: &str, index: u64) -> String {
        format!("{}/fragments/{scope}/{index}", self.prefix)
    }
}

#[async_trait]
impl FragmentStore for OpendalStore {
    async fn put(&self, scope: &str, index: u64, data: Vec<u8>) -> VaultResult<FragmentRef> {
        let key = self.key(scope, index);
        self.op
            .write(&key, data)
            .await
            .map_err(|e| VaultError::Storage(format!("writing fragment {index} ({key}): {e}")))?;
        tracing::debug!(key = %key, "fragment stored");
        Ok(FragmentRef(key))
    }

    async fn get(&self, reference: &FragmentRef) -> VaultResult<Vec<u8>> {
        let buffer = self
            .op
            .read(reference.as_str())
            .await
            .map_err(|e| VaultError::Storage(format!("reading fragment {reference}: {e}")))?;
        Ok(buffer.to_bytes().to_vec())
    }
}
