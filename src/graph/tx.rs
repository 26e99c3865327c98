use super::entry::{Entry, Output, Spend, TxHeader};
use crate::error::{ValidationError, ValidationResult};
use crate::types::{AssetId, Hash};
use std::collections::HashMap;

/// A transaction as a graph of entries keyed by id
///
/// The header's id is the transaction id. `input_ids` lists the input-like
/// entries (issuance, spend, coinbase, claim, dpos) in input order.
///
/// Every key of `entries` must be the content id (`Entry::id`) of the entry
/// it maps to. `Tx::new` keeps this; code that edits `entries` directly must
/// keep it too. Validation memoizes by key, and an acyclic graph is only
/// guaranteed while keys are content hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub header: TxHeader,
    pub id: Hash,
    pub entries: HashMap<Hash, Entry>,
    pub input_ids: Vec<Hash>,
    pub spent_output_ids: Vec<Hash>,
}

impl Tx {
    /// Assemble a transaction from its header and the rest of its entries
    pub fn new(header: TxHeader, entries: impl IntoIterator<Item = Entry>) -> Self {
        let header_entry = Entry::TxHeader(header.clone());
        let id = header_entry.id();

        let mut map = HashMap::new();
        let mut inputs = Vec::new();
        let mut spent = Vec::new();
        for entry in entries {
            let entry_id = entry.id();
            let input = match &entry {
                Entry::Issuance(e) => Some((e.ordinal, None)),
                Entry::Spend(e) => Some((e.ordinal, e.spent_output_id)),
                Entry::Coinbase(_) => Some((0, None)),
                Entry::Claim(e) => Some((e.ordinal, e.spent_output_id)),
                Entry::Dpos(e) => Some((e.ordinal, e.spent_output_id)),
                _ => None,
            };
            if let Some((ordinal, spent_output_id)) = input {
                inputs.push((ordinal, entry_id));
                if let Some(spent_output_id) = spent_output_id {
                    spent.push((ordinal, spent_output_id));
                }
            }
            map.insert(entry_id, entry);
        }
        map.insert(id, header_entry);

        inputs.sort_by_key(|(ordinal, _)| *ordinal);
        spent.sort_by_key(|(ordinal, _)| *ordinal);

        Self {
            header,
            id,
            entries: map,
            input_ids: inputs.into_iter().map(|(_, id)| id).collect(),
            spent_output_ids: spent.into_iter().map(|(_, id)| id).collect(),
        }
    }

    pub fn entry(&self, id: &Hash) -> ValidationResult<&Entry> {
        self.entries.get(id).ok_or(ValidationError::MissingEntry(*id))
    }

    pub fn output(&self, id: &Hash) -> ValidationResult<&Output> {
        match self.entry(id)? {
            Entry::Output(output) => Ok(output),
            other => Err(ValidationError::UnexpectedEntryType {
                id: *id,
                found: other.type_name(),
                expected: "output",
            }),
        }
    }

    pub fn spend(&self, id: &Hash) -> ValidationResult<&Spend> {
        match self.entry(id)? {
            Entry::Spend(spend) => Ok(spend),
            other => Err(ValidationError::UnexpectedEntryType {
                id: *id,
                found: other.type_name(),
                expected: "spend",
            }),
        }
    }

    /// Spends of the native asset, in input order. These pay for gas.
    pub fn gas_input_ids(&self, native_asset: &AssetId) -> Vec<Hash> {
        self.input_ids
            .iter()
            .filter(|id| match self.entries.get(id) {
                Some(Entry::Spend(spend)) => spend
                    .witness_destination
                    .as_ref()
                    .and_then(|dest| dest.value)
                    .is_some_and(|value| value.asset_id == *native_asset),
                _ => false,
            })
            .copied()
            .collect()
    }

    pub fn serialized_size(&self) -> u64 {
        self.header.serialized_size
    }
}
