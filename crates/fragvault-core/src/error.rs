use thiserror::Error;

pub type VaultResult<T> = Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Deliberately identical for a wrong secret and for a fragment that
    /// fails authentication, so callers cannot distinguish the two cases.
    #[error("invalid secret or corrupted data")]
    Auth,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("malformed data: {0}")]
    Format(String),

    #[error("missing fragment at index {0}")]
    MissingFragment(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VaultError {
    /// The message safe to return across the service boundary.
    ///
    /// Storage and internal errors keep their detail server-side (tracing);
    /// the caller only ever sees a generic failure for those.
    pub fn public_message(&self) -> String {
        match self {
            VaultError::Validation(_)
            | VaultError::NotFound(_)
            | VaultError::Auth
            | VaultError::Format(_)
            | VaultError::MissingFragment(_) => self.to_string(),
            VaultError::Storage(_) | VaultError::Io(_) | VaultError::Other(_) => {
                "internal error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_message_is_uniform() {
        // Wrong secret and corrupted fragment must render identically.
        assert_eq!(VaultError::Auth.to_string(), "invalid secret or corrupted data");
    }

    #[test]
    fn test_public_message_hides_storage_detail() {
        let err = VaultError::Storage("s3://bucket/secret-path: connection refused".into());
        assert_eq!(err.public_message(), "internal error");
    }

    #[test]
    fn test_public_message_keeps_safe_variants() {
        let err = VaultError::NotFound("file abc".into());
        assert_eq!(err.public_message(), "not found: file abc");

        let err = VaultError::MissingFragment(3);
        assert_eq!(err.public_message(), "missing fragment at index 3");
    }
}
