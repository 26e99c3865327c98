//! Block-level validation
//!
//! A block is walked transaction by transaction. A transaction that fails
//! after paying for its gas stays in the block with a failed status (its
//! fee is still collected); one that fails before paying invalidates the
//! whole block.

use super::validator::Validator;
use crate::error::{ValidationError, ValidationResult};
use crate::gas::GasState;
use crate::graph::Block;
use crate::types::Hash;
use std::collections::HashSet;
use tracing::{info, warn};

/// Outcome of one transaction inside an accepted block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_id: Hash,
    pub gas: GasState,
    /// Set when the transaction failed after its gas was paid
    pub error: Option<ValidationError>,
}

impl TxOutcome {
    pub fn status_fail(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of an accepted block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockOutcome {
    pub transactions: Vec<TxOutcome>,
    pub gas_used: u64,
    /// Native-asset units paid for gas across the block
    pub fees: u64,
}

impl BlockOutcome {
    pub fn failed_transactions(&self) -> impl Iterator<Item = &TxOutcome> {
        self.transactions.iter().filter(|outcome| outcome.status_fail())
    }
}

impl Validator {
    /// Validate every transaction of `block` in order.
    ///
    /// A block that repeats a transaction id is rejected before any
    /// transaction is validated.
    ///
    /// # Returns
    /// The per-transaction outcomes, or the error that invalidates the block
    pub fn validate_block(&self, block: &Block) -> ValidationResult<BlockOutcome> {
        let mut outcome = BlockOutcome::default();
        let count = block.transactions.len();

        let mut seen = HashSet::with_capacity(count);
        for (i, tx) in block.transactions.iter().enumerate() {
            if !seen.insert(tx.id) {
                return Err(ValidationError::DuplicateTransaction(tx.id)
                    .context(format!("validate of transaction {i} of {count}")));
            }
        }

        for (i, tx) in block.transactions.iter().enumerate() {
            let (gas, result) = self.validate_transaction(tx, block);

            if !gas.gas_valid {
                let err = result.err().unwrap_or(ValidationError::GasNotPaid(tx.id));
                return Err(err.context(format!("validate of transaction {i} of {count}")));
            }

            let used = u64::try_from(gas.gas_used)
                .map_err(|_| ValidationError::GasCalculation("negative gas used"))?;
            outcome.gas_used = outcome
                .gas_used
                .checked_add(used)
                .ok_or_else(|| ValidationError::Overflow("block gas used".to_string()))?;
            if outcome.gas_used > self.params().max_block_gas {
                return Err(ValidationError::BlockGasLimit {
                    used: outcome.gas_used,
                    limit: self.params().max_block_gas,
                });
            }

            outcome.fees = outcome
                .fees
                .checked_add(gas.btm_value)
                .ok_or_else(|| ValidationError::Overflow("block fees".to_string()))?;

            if let Err(e) = &result {
                warn!("Transaction {} of block {} failed after paying gas: {}", i, block.header.height, e);
            }
            outcome.transactions.push(TxOutcome {
                tx_id: tx.id,
                gas,
                error: result.err(),
            });
        }

        info!(
            "Block {} valid: {} transaction(s), gas used {}, fees {}",
            block.header.height, count, outcome.gas_used, outcome.fees
        );
        Ok(outcome)
    }
}
