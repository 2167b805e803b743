//! Presign Module
//!
//! Issues time-limited links for photo objects. [`Presigner`] is the signing
//! capability; [`PresignedUrlRepository`] scopes keys to the photo namespace.

mod link;

pub use link::ExpiringLinkPresigner;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::ErrorKind;

// == Presign Error ==
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresignError {
    #[error("object key cannot be empty")]
    EmptyKey,

    #[error("failed to generate presigned URL: {0}")]
    Signer(String),

    #[error("presign timed out after {0:?}")]
    Timeout(Duration),
}

impl PresignError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Presign
    }
}

// == Presigner Port ==
/// Signs a GET link for a fully qualified object key.
#[async_trait]
pub trait Presigner: Send + Sync {
    async fn presign(&self, object_key: &str, lifetime: Duration) -> Result<String, PresignError>;
}

// == Presigned Url Repository ==
/// Namespaced access to a [`Presigner`] with a fixed link lifetime.
#[derive(Clone)]
pub struct PresignedUrlRepository {
    presigner: Arc<dyn Presigner>,
    namespace: String,
    lifetime: Duration,
}

impl PresignedUrlRepository {
    /// # Arguments
    /// * `presigner` - Signing backend
    /// * `namespace` - Prefix prepended to every key, e.g. `n8n_bikes`
    /// * `lifetime` - Validity of each issued link
    pub fn new(
        presigner: Arc<dyn Presigner>,
        namespace: impl Into<String>,
        lifetime: Duration,
    ) -> Self {
        Self {
            presigner,
            namespace: namespace.into(),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Full object key for a stored photo key.
    pub fn object_key(&self, key: &str) -> String {
        format!("{}/{}", self.namespace, key)
    }

    pub async fn presigned_url(&self, key: &str) -> Result<String, PresignError> {
        if key.is_empty() {
            return Err(PresignError::EmptyKey);
        }

        self.presigner
            .presign(&self.object_key(key), self.lifetime)
            .await
    }
}

impl std::fmt::Debug for PresignedUrlRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresignedUrlRepository")
            .field("namespace", &self.namespace)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
