//! Parent-chain objects carried inside a peg-in witness

use crate::error::PeginError;
use crate::graph::encoding::{WriteForHash, encode};
use crate::types::{AssetId, Hash, hash_bytes};
use ethers::types::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentOutput {
    pub asset_id: AssetId,
    pub amount: u64,
    pub control_program: Bytes,
}

/// A parent-chain transaction, as much of it as a claim needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentTransaction {
    pub version: u64,
    /// Ids of the parent outputs this transaction spends
    pub inputs: Vec<Hash>,
    pub outputs: Vec<ParentOutput>,
}

impl ParentTransaction {
    pub fn id(&self) -> Hash {
        hash_bytes(&encode(self))
    }

    pub fn decode(raw: &[u8]) -> Result<Self, PeginError> {
        serde_json::from_slice(raw).map_err(|e| PeginError::ParentTransaction(e.to_string()))
    }
}

impl WriteForHash for ParentTransaction {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        self.version.write_for_hash(w);
        self.inputs.write_for_hash(w);
        (self.outputs.len() as u64).write_for_hash(w);
        for out in &self.outputs {
            out.asset_id.write_for_hash(w);
            out.amount.write_for_hash(w);
            out.control_program.write_for_hash(w);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParentBlockHeader {
    pub version: u64,
    pub height: u64,
    pub previous_block_hash: Hash,
    pub timestamp: u64,
    pub transactions_merkle_root: Hash,
}

/// A parent block header together with a partial merkle tree proving that
/// `matched_tx_ids` are committed to by its transaction root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleBlock {
    pub block_header: ParentBlockHeader,
    pub tx_hashes: Vec<Hash>,
    pub flags: Vec<u8>,
    pub matched_tx_ids: Vec<Hash>,
}

impl MerkleBlock {
    pub fn decode(raw: &[u8]) -> Result<Self, PeginError> {
        serde_json::from_slice(raw).map_err(|e| PeginError::MerkleBlock(e.to_string()))
    }
}
