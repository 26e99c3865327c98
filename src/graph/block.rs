use super::map::TxData;
use super::tx::Tx;
use crate::types::Hash;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u64,
    pub height: u64,
    pub previous_block_hash: Hash,
    pub timestamp: u64,
}

/// A block whose transactions have been mapped into entry graphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Tx>,
}

impl Block {
    pub fn new(header: BlockHeader, transactions: Vec<Tx>) -> Self {
        Self {
            header,
            transactions,
        }
    }

    /// Whether `tx` is the block's first transaction itself, not merely a
    /// transaction with the same id
    pub fn is_first_transaction(&self, tx: &Tx) -> bool {
        self.transactions
            .first()
            .is_some_and(|first| std::ptr::eq(first, tx))
    }
}

/// Serialized form of a block, as read from disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockData {
    pub header: BlockHeader,
    pub transactions: Vec<TxData>,
}

impl BlockData {
    pub fn into_block(self) -> Block {
        let transactions = self.transactions.iter().map(TxData::map_tx).collect();
        Block::new(self.header, transactions)
    }
}
