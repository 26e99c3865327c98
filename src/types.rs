use ethers::types::{Bytes, H256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-derived 32-byte identifier (entry ids, asset ids, merkle nodes)
pub type Hash = H256;

/// Assets are identified by the hash of their issuance definition
pub type AssetId = H256;

/// Hash arbitrary bytes into a `Hash`
pub fn hash_bytes(data: &[u8]) -> Hash {
    H256::from(keccak256(data))
}

/// An amount of a single asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAmount {
    pub asset_id: AssetId,
    pub amount: u64,
}

impl AssetAmount {
    pub fn new(asset_id: AssetId, amount: u64) -> Self {
        Self { asset_id, amount }
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unit(s) of {:?}", self.amount, self.asset_id)
    }
}

/// A verification program together with the VM version it targets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    pub vm_version: u64,
    pub code: Bytes,
}

impl Program {
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        Self {
            vm_version: 1,
            code: Bytes::from(code.into()),
        }
    }
}

/// A claim that entry `source_ref`, at destination slot `position`, produces
/// `value` for the entry holding this source.
///
/// Fields are optional because a decoded transaction may omit them; the
/// validator reports absence as `MissingField`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSource {
    pub source_ref: Option<Hash>,
    pub value: Option<AssetAmount>,
    pub position: u64,
}

impl ValueSource {
    pub fn new(source_ref: Hash, value: AssetAmount, position: u64) -> Self {
        Self {
            source_ref: Some(source_ref),
            value: Some(value),
            position,
        }
    }
}

/// The mirror of `ValueSource`: value flowing from the holder into entry
/// `dest_ref` at source slot `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDestination {
    pub dest_ref: Option<Hash>,
    pub value: Option<AssetAmount>,
    pub position: u64,
}

impl ValueDestination {
    pub fn new(dest_ref: Hash, value: AssetAmount, position: u64) -> Self {
        Self {
            dest_ref: Some(dest_ref),
            value: Some(value),
            position,
        }
    }
}
