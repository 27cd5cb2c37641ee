use std::cmp::Reverse;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One raw transfer record as returned by the indexing provider.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Transfer {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    pub hash: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, rename = "blockNum")]
    pub block_num: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    From,
    To,
    #[default]
    Both,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

#[derive(Clone, Debug, Default)]
pub struct TransferFilter {
    pub direction: Direction,
    pub address: Option<String>,
    pub order: SortOrder,
    pub max_count: Option<usize>,
}

/// Pure filter + stable sort over provider transfers. Records missing either
/// endpoint are dropped; ties on block number keep input order. A
/// directional filter only applies when `address` is set; without one it
/// keeps every record, same as `Direction::Both`.
pub fn filter_and_sort(transfers: &[Transfer], filter: &TransferFilter) -> Vec<Transfer> {
    let mut kept = transfers
        .iter()
        .filter(|transfer| transfer.from.is_some() && transfer.to.is_some())
        .filter(|transfer| matches_direction(transfer, filter))
        .cloned()
        .collect::<Vec<_>>();

    match filter.order {
        SortOrder::Newest => kept.sort_by_key(|transfer| Reverse(block_number(transfer))),
        SortOrder::Oldest => kept.sort_by_key(block_number),
    }

    if let Some(cap) = filter.max_count {
        kept.truncate(cap);
    }

    kept
}

pub(crate) fn block_number(transfer: &Transfer) -> u64 {
    let Some(raw) = transfer.block_num.as_deref() else {
        return 0;
    };

    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).unwrap_or(0)
    } else {
        raw.parse().unwrap_or(0)
    }
}

fn matches_direction(transfer: &Transfer, filter: &TransferFilter) -> bool {
    let Some(address) = filter.address.as_deref() else {
        return true;
    };

    match filter.direction {
        Direction::From => transfer
            .from
            .as_deref()
            .is_some_and(|from| from.eq_ignore_ascii_case(address)),
        Direction::To => transfer
            .to
            .as_deref()
            .is_some_and(|to| to.eq_ignore_ascii_case(address)),
        Direction::Both => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(from: &str, to: &str, hash: &str, block_num: Option<&str>) -> Transfer {
        Transfer {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            hash: hash.to_string(),
            value: None,
            block_num: block_num.map(str::to_string),
        }
    }

    #[test]
    fn direction_from_keeps_only_outgoing() {
        let transfers = vec![
            transfer("0xAA", "0xBB", "h1", None),
            transfer("0xBB", "0xaa", "h2", None),
            transfer("0xaa", "0xCC", "h3", None),
        ];
        let filter = TransferFilter {
            direction: Direction::From,
            address: Some("0xAa".to_string()),
            ..TransferFilter::default()
        };

        let kept = filter_and_sort(&transfers, &filter);
        assert_eq!(
            kept.iter().map(|t| t.hash.as_str()).collect::<Vec<_>>(),
            vec!["h1", "h3"]
        );
    }

    #[test]
    fn direction_to_keeps_only_incoming() {
        let transfers = vec![
            transfer("0xAA", "0xBB", "h1", None),
            transfer("0xBB", "0xaa", "h2", None),
        ];
        let filter = TransferFilter {
            direction: Direction::To,
            address: Some("0xAA".to_string()),
            ..TransferFilter::default()
        };

        let kept = filter_and_sort(&transfers, &filter);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].hash, "h2");
    }

    #[test]
    fn directional_filter_without_an_address_keeps_everything() {
        let transfers = vec![
            transfer("0xAA", "0xBB", "h1", None),
            transfer("0xBB", "0xCC", "h2", None),
        ];
        let filter = TransferFilter {
            direction: Direction::From,
            address: None,
            ..TransferFilter::default()
        };

        let kept = filter_and_sort(&transfers, &filter);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn records_missing_an_endpoint_are_dropped() {
        let transfers = vec![
            Transfer {
                from: None,
                to: Some("0xBB".to_string()),
                hash: "h1".to_string(),
                value: None,
                block_num: None,
            },
            Transfer {
                from: Some("0xAA".to_string()),
                to: None,
                hash: "h2".to_string(),
                value: None,
                block_num: None,
            },
            transfer("0xAA", "0xBB", "h3", None),
        ];

        let kept = filter_and_sort(&transfers, &TransferFilter::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].hash, "h3");
    }

    #[test]
    fn newest_sorts_descending_by_block() {
        let transfers = vec![
            transfer("0xAA", "0xBB", "h1", Some("0x1")),
            transfer("0xAA", "0xBB", "h3", Some("0x3")),
            transfer("0xAA", "0xBB", "h2", Some("0x2")),
        ];

        let kept = filter_and_sort(&transfers, &TransferFilter::default());
        assert_eq!(
            kept.iter()
                .map(|t| t.block_num.as_deref().unwrap())
                .collect::<Vec<_>>(),
            vec!["0x3", "0x2", "0x1"]
        );
    }

    #[test]
    fn oldest_with_cap_truncates_after_sorting() {
        let transfers = vec![
            transfer("0xAA", "0xBB", "h1", Some("0x1")),
            transfer("0xAA", "0xBB", "h3", Some("0x3")),
            transfer("0xAA", "0xBB", "h2", Some("0x2")),
        ];
        let filter = TransferFilter {
            order: SortOrder::Oldest,
            max_count: Some(2),
            ..TransferFilter::default()
        };

        let kept = filter_and_sort(&transfers, &filter);
        assert_eq!(
            kept.iter()
                .map(|t| t.block_num.as_deref().unwrap())
                .collect::<Vec<_>>(),
            vec!["0x1", "0x2"]
        );
    }

    #[test]
    fn block_ties_preserve_input_order() {
        let transfers = vec![
            transfer("0xAA", "0xBB", "h1", Some("5")),
            transfer("0xAA", "0xBB", "h2", Some("5")),
            transfer("0xAA", "0xBB", "h3", None),
        ];

        let kept = filter_and_sort(&transfers, &TransferFilter::default());
        assert_eq!(
            kept.iter().map(|t| t.hash.as_str()).collect::<Vec<_>>(),
            vec!["h1", "h2", "h3"]
        );
    }

    #[test]
    fn block_number_parses_hex_and_decimal() {
        assert_eq!(block_number(&transfer("a", "b", "h", Some("0x1f"))), 31);
        assert_eq!(block_number(&transfer("a", "b", "h", Some("42"))), 42);
        assert_eq!(block_number(&transfer("a", "b", "h", Some("bogus"))), 0);
        assert_eq!(block_number(&transfer("a", "b", "h", None)), 0);
    }
}
