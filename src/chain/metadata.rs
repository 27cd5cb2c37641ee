use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use parking_lot::Mutex;
use thiserror::Error;

/// Balance sentinel stored when the provider lookup fails.
pub const UNRESOLVED_BALANCE: &str = "...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressMetadata {
    pub balance: String,
    pub is_contract: bool,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata provider request failed: {0}")]
    Provider(String),
    #[error("address {0} unknown to the metadata source")]
    Unknown(String),
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn balance_of(&self, address: &str) -> Result<String, MetadataError>;
    async fn is_contract(&self, address: &str) -> Result<bool, MetadataError>;
}

pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Memoizing per-address metadata cache. Entries are keyed by lowercase
/// address and never expire for the lifetime of the cache; lookup failures
/// degrade to sentinel values instead of propagating.
pub struct AddressMetadataCache {
    source: Arc<dyn MetadataSource>,
    entries: Mutex<HashMap<String, AddressMetadata>>,
}

impl AddressMetadataCache {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached(&self, address: &str) -> Option<AddressMetadata> {
        self.entries.lock().get(&address.to_ascii_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub async fn resolve(&self, address: &str) -> AddressMetadata {
        let key = address.to_ascii_lowercase();
        let hit = self.entries.lock().get(&key).cloned();
        match hit {
            Some(entry) => entry,
            None => self.fetch_and_store(key).await,
        }
    }

    /// Resolves every distinct input address, capping in-flight source
    /// lookups at `concurrency`. Each distinct input appears exactly once in
    /// the result. `progress` is called after each completion with
    /// `(done, total)`; cache hits count as immediately completed.
    pub async fn resolve_batch(
        &self,
        addresses: &[String],
        concurrency: usize,
        progress: Option<ProgressFn<'_>>,
    ) -> HashMap<String, AddressMetadata> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(addresses.len());
        for address in addresses {
            let key = address.to_ascii_lowercase();
            if seen.insert(key.clone()) {
                unique.push(key);
            }
        }

        let total = unique.len();
        let mut resolved = HashMap::with_capacity(total);
        let mut done = 0usize;

        let mut pending = Vec::new();
        for key in unique {
            if let Some(entry) = self.entries.lock().get(&key).cloned() {
                resolved.insert(key, entry);
                done += 1;
                if let Some(report) = progress {
                    report(done, total);
                }
            } else {
                pending.push(key);
            }
        }

        let lookups = stream::iter(pending.into_iter().map(|key| async move {
            let entry = self.fetch_and_store(key.clone()).await;
            (key, entry)
        }))
        .buffer_unordered(concurrency.max(1));
        futures::pin_mut!(lookups);

        while let Some((key, entry)) = lookups.next().await {
            resolved.insert(key, entry);
            done += 1;
            if let Some(report) = progress {
                report(done, total);
            }
        }

        resolved
    }

    async fn fetch_and_store(&self, key: String) -> AddressMetadata {
        let balance = match self.source.balance_of(&key).await {
            Ok(balance) => balance,
            Err(error) => {
                log::warn!("balance lookup failed for {key}: {error}");
                UNRESOLVED_BALANCE.to_string()
            }
        };

        let is_contract = match self.source.is_contract(&key).await {
            Ok(flag) => flag,
            Err(error) => {
                log::warn!("contract check failed for {key}: {error}");
                false
            }
        };

        let entry = AddressMetadata {
            balance,
            is_contract,
        };
        self.entries.lock().insert(key, entry.clone());
        entry
    }
}
