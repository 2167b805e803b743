//! Expiring link presigner
//!
//! Issues `<base>/<object key>?X-Expires=<unix seconds>` links.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{PresignError, Presigner};

#[derive(Debug, Clone)]
pub struct ExpiringLinkPresigner {
    base_url: Url,
}

impl ExpiringLinkPresigner {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn parse(base_url: &str) -> Result<Self, PresignError> {
        Url::parse(base_url)
            .map(Self::new)
            .map_err(|e| PresignError::Signer(format!("invalid base url {}: {}", base_url, e)))
    }

    fn link(&self, object_key: &str, expires_at: i64) -> Result<Url, PresignError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PresignError::Signer(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(object_key.split('/'));
        url.query_pairs_mut()
            .clear()
            .append_pair("X-Expires", &expires_at.to_string());
        Ok(url)
    }
}

#[async_trait]
impl Presigner for ExpiringLinkPresigner {
    async fn presign(&self, object_key: &str, lifetime: Duration) -> Result<String, PresignError> {
        let lifetime = chrono::Duration::from_std(lifetime)
            .map_err(|e| PresignError::Signer(e.to_string()))?;
        let expires_at = chrono::Utc::now()
            .checked_add_signed(lifetime)
            .ok_or_else(|| PresignError::Signer(format!("lifetime {} out of range", lifetime)))?
            .timestamp();

        self.link(object_key, expires_at).map(String::from)
    }
}
