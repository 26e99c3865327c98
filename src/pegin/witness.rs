use super::parent::{MerkleBlock, ParentTransaction};
use crate::error::PeginError;
use crate::types::Hash;
use ethers::types::Bytes;

pub const PEGIN_WITNESS_LEN: usize = 5;

/// Decoded peg-in witness stack
///
/// ```text
/// [0] claimed amount, ascii decimal
/// [1] parent genesis block hash, hex text
/// [2] claim script
/// [3] parent transaction, JSON
/// [4] merkle block, JSON
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeginWitness {
    pub amount: u64,
    pub parent_genesis_hash: Bytes,
    pub claim_script: Bytes,
    pub parent_tx: ParentTransaction,
    pub merkle_block: MerkleBlock,
}

impl PeginWitness {
    /// Decode a stack of exactly five elements. The genesis hash is kept raw
    /// and checked once the proof itself has been verified.
    pub fn parse(stack: &[Bytes], max_money: u64) -> Result<Self, PeginError> {
        if stack.len() != PEGIN_WITNESS_LEN {
            return Err(PeginError::WitnessLength(stack.len()));
        }

        let amount = parse_amount(&stack[0])?;
        if amount > max_money {
            return Err(PeginError::AmountOutOfRange(amount));
        }

        Ok(Self {
            amount,
            parent_genesis_hash: stack[1].clone(),
            claim_script: stack[2].clone(),
            parent_tx: ParentTransaction::decode(&stack[3])?,
            merkle_block: MerkleBlock::decode(&stack[4])?,
        })
    }

    pub fn parent_genesis_hash(&self) -> Result<Hash, PeginError> {
        let text = std::str::from_utf8(&self.parent_genesis_hash)
            .map_err(|_| PeginError::GenesisHash(format!("{:?}", self.parent_genesis_hash)))?;
        text.strip_prefix("0x")
            .unwrap_or(text)
            .parse::<Hash>()
            .map_err(|_| PeginError::GenesisHash(text.to_string()))
    }
}

/// Unsigned decimal digits only: no sign, no whitespace
fn parse_amount(raw: &[u8]) -> Result<u64, PeginError> {
    let invalid = || PeginError::InvalidAmount(String::from_utf8_lossy(raw).into_owned());
    if raw.is_empty() || !raw.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(invalid)
}
