//! Photo enrichment
//!
//! Fills every photo's `url` with a presigned link. Each presign call runs
//! concurrently, bounded per pass, and each result is written back to the
//! slot it came from, so completion order never matters.

use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::models::HasPhotos;
use crate::presign::{PresignError, PresignedUrlRepository};

/// Which photo groups of each item get links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupScope {
    First,
    All,
}

/// What happens to an item when one of its photos cannot be signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The whole item is removed from the result
    DropListing,
    /// The photo keeps an empty url and the item is kept
    EmptyUrl,
}

// (item, group, photo)
#[derive(Debug, Clone, Copy)]
struct Slot {
    item: usize,
    group: usize,
    photo: usize,
}

#[derive(Debug, Clone)]
pub struct PhotoEnricher {
    urls: PresignedUrlRepository,
    concurrency: usize,
    timeout: Duration,
}

impl PhotoEnricher {
    /// # Arguments
    /// * `urls` - Namespaced link issuer
    /// * `concurrency` - Max presign calls in flight per pass, `0` for no limit
    /// * `timeout` - Per-call deadline; an expired call is a failure
    pub fn new(urls: PresignedUrlRepository, concurrency: usize, timeout: Duration) -> Self {
        Self {
            urls,
            concurrency,
            timeout,
        }
    }

    /// Enriches `items` in place and returns the survivors in their original order.
    pub async fn enrich<T: HasPhotos>(
        &self,
        mut items: Vec<T>,
        scope: GroupScope,
        policy: FailurePolicy,
    ) -> Vec<T> {
        let jobs = collect_jobs(&items, scope);
        if jobs.is_empty() {
            return items;
        }

        let limit = match self.concurrency {
            0 => jobs.len(),
            n => n,
        };

        let results: Vec<(Slot, Result<String, PresignError>)> = stream::iter(jobs)
            .map(|(slot, key)| async move { (slot, self.sign(&key).await) })
            .buffer_unordered(limit)
            .collect()
            .await;

        let mut failed = vec![false; items.len()];
        for (slot, result) in results {
            let photo = &mut items[slot.item].photo_groups_mut()[slot.group][slot.photo];
            match result {
                Ok(url) => photo.url = url,
                Err(err) => {
                    tracing::warn!(
                        key = %photo.key,
                        kind = ?err.kind(),
                        error = %err,
                        "Photo could not be presigned"
                    );
                    photo.url = String::new();
                    failed[slot.item] = true;
                }
            }
        }

        match policy {
            FailurePolicy::EmptyUrl => items,
            FailurePolicy::DropListing => {
                let before = items.len();
                let kept: Vec<T> = items
                    .into_iter()
                    .zip(failed)
                    .filter_map(|(item, failed)| (!failed).then_some(item))
                    .collect();
                if kept.len() < before {
                    tracing::warn!(dropped = before - kept.len(), "Listings dropped from result");
                }
                kept
            }
        }
    }

    async fn sign(&self, key: &str) -> Result<String, PresignError> {
        match tokio::time::timeout(self.timeout, self.urls.presigned_url(key)).await {
            Ok(result) => result,
            Err(_) => Err(PresignError::Timeout(self.timeout)),
        }
    }
}

fn collect_jobs<T: HasPhotos>(items: &[T], scope: GroupScope) -> Vec<(Slot, String)> {
    let mut jobs = Vec::new();
    for (item, listing) in items.iter().enumerate() {
        let groups = listing.photo_groups();
        let groups = match scope {
            GroupScope::First => &groups[..groups.len().min(1)],
            GroupScope::All => groups,
        };
        for (group, photos) in groups.iter().enumerate() {
            for (photo, p) in photos.iter().enumerate() {
                jobs.push((Slot { item, group, photo }, p.key.clone()));
            }
        }
    }
    jobs
}
