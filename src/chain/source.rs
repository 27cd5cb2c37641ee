use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::metadata::{MetadataError, MetadataSource};

#[derive(Clone, Debug, Deserialize)]
pub struct SnapshotEntry {
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default, rename = "isContract")]
    pub is_contract: bool,
}

/// File-backed metadata source: a JSON map from address to balance and
/// contract flag. Addresses absent from the snapshot resolve as errors and
/// flow through the cache's sentinel path.
pub struct SnapshotSource {
    entries: HashMap<String, SnapshotEntry>,
}

impl SnapshotSource {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read metadata snapshot {}", path.display()))?;
        let parsed: HashMap<String, SnapshotEntry> =
            serde_json::from_str(&raw).context("invalid metadata snapshot JSON")?;

        let entries = parsed
            .into_iter()
            .map(|(address, entry)| (address.to_ascii_lowercase(), entry))
            .collect();
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

#[async_trait]
impl MetadataSource for SnapshotSource {
    async fn balance_of(&self, address: &str) -> Result<String, MetadataError> {
        self.entries
            .get(address)
            .and_then(|entry| entry.balance.clone())
            .ok_or_else(|| MetadataError::Unknown(address.to_string()))
    }

    async fn is_contract(&self, address: &str) -> Result<bool, MetadataError> {
        self.entries
            .get(address)
            .map(|entry| entry.is_contract)
            .ok_or_else(|| MetadataError::Unknown(address.to_string()))
    }
}
