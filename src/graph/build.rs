use std::collections::{HashMap, HashSet};

use crate::chain::{AddressMetadataCache, ProgressFn, Transfer};
use crate::util::short_label;

use super::{GraphLink, GraphNode, LinkDirection, TransferGraph};

/// Sentinel link target for contract-creation transfers (no `to` address).
/// It never has a matching node; renderers special-case it.
pub const CONTRACT_CREATION: &str = "CONTRACT_CREATION";

pub struct BuildOptions<'a> {
    /// Address the graph is centered on; links touching it are tagged
    /// inbound/outbound.
    pub focus: Option<&'a str>,
    pub concurrency: usize,
    pub progress: Option<ProgressFn<'a>>,
}

impl Default for BuildOptions<'_> {
    fn default() -> Self {
        Self {
            focus: None,
            concurrency: 1,
            progress: None,
        }
    }
}

/// Builds the deduplicated node set and curvature-indexed link list for a
/// transfer batch. Addresses are normalized to lowercase before dedup, so
/// mixed-case spellings of one address share a node. Transfers missing a
/// `from` are skipped; a missing `to` becomes the contract-creation sentinel
/// target.
pub async fn build_transfer_graph(
    transfers: &[Transfer],
    cache: &AddressMetadataCache,
    options: &BuildOptions<'_>,
) -> TransferGraph {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for transfer in transfers {
        let Some(from) = transfer.from.as_deref() else {
            continue;
        };
        push_unique(&mut unique, &mut seen, from);
        if let Some(to) = transfer.to.as_deref() {
            push_unique(&mut unique, &mut seen, to);
        }
    }

    if unique.is_empty() {
        return TransferGraph::default();
    }

    let metadata = cache
        .resolve_batch(&unique, options.concurrency, options.progress)
        .await;

    let nodes = unique
        .iter()
        .map(|id| {
            let entry = metadata.get(id);
            GraphNode {
                id: id.clone(),
                label: short_label(id),
                balance: entry.map(|entry| entry.balance.clone()),
                is_contract: entry.is_some_and(|entry| entry.is_contract),
            }
        })
        .collect::<Vec<_>>();

    let focus = options.focus.map(str::to_ascii_lowercase);
    let mut parallel_counts: HashMap<(String, String), usize> = HashMap::new();
    let mut links = Vec::with_capacity(transfers.len());

    for transfer in transfers {
        let Some(from) = transfer.from.as_deref() else {
            continue;
        };
        let source = from.to_ascii_lowercase();
        let target = transfer
            .to
            .as_deref()
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| CONTRACT_CREATION.to_string());

        let count = parallel_counts
            .entry((source.clone(), target.clone()))
            .or_insert(0);
        let curvature_index = *count;
        *count += 1;

        let direction = focus.as_deref().and_then(|focus| {
            if source == focus {
                Some(LinkDirection::Outbound)
            } else if target == focus {
                Some(LinkDirection::Inbound)
            } else {
                None
            }
        });

        links.push(GraphLink {
            source,
            target,
            transaction_hash: transfer.hash.clone(),
            curvature_index,
            direction,
        });
    }

    TransferGraph { nodes, links }
}

fn push_unique(unique: &mut Vec<String>, seen: &mut HashSet<String>, address: &str) {
    let key = address.to_ascii_lowercase();
    if seen.insert(key.clone()) {
        unique.push(key);
    }
}
