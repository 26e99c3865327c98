use crate::types::{AssetId, Hash};
use ethers::types::H256;

/// Id of the native settlement asset that pays for gas
pub fn native_asset_id() -> AssetId {
    H256::repeat_byte(0xff)
}

/// Chain parameters consulted during validation
///
/// # Fields
/// - `native_asset_id`: the asset whose net mux balance buys gas
/// - `vm_gas_rate`: native units per unit of gas
/// - `storage_gas_rate`: gas charged per serialized byte
/// - `max_gas_amount`: ceiling on the gas a transaction can buy
/// - `default_gas_credit`: gas a transaction may burn before it has paid
/// - `max_block_gas`: total gas all transactions of a block may use
/// - `coinbase_arbitrary_size_limit`: byte limit on coinbase payloads
/// - `max_money`: upper bound of a valid peg-in amount
/// - `parent_genesis_hash`: genesis block of the linked parent chain
/// - `pegin_min_depth`: confirmations a peg-in deposit needs
/// - `validate_pegin`: consult the confirmation oracle for peg-ins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusParams {
    pub native_asset_id: AssetId,
    pub vm_gas_rate: i64,
    pub storage_gas_rate: i64,
    pub max_gas_amount: i64,
    pub default_gas_credit: i64,
    pub max_block_gas: u64,
    pub coinbase_arbitrary_size_limit: usize,
    pub max_money: u64,
    pub parent_genesis_hash: Hash,
    pub pegin_min_depth: u64,
    pub validate_pegin: bool,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            native_asset_id: native_asset_id(),
            vm_gas_rate: 200,
            storage_gas_rate: 1,
            max_gas_amount: 200_000,
            default_gas_credit: 30_000,
            max_block_gas: 10_000_000,
            coinbase_arbitrary_size_limit: 128,
            max_money: 21_000_000_000_000_000,
            parent_genesis_hash: Hash::zero(),
            pegin_min_depth: 6,
            validate_pegin: false,
        }
    }
}
