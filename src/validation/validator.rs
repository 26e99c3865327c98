use super::context::{EntryCache, ValidationContext};
use super::entry::check_valid;
use super::standard::{check_standard_tx, check_time_range};
use crate::consensus::ConsensusParams;
use crate::error::{ValidationError, ValidationResult};
use crate::gas::GasState;
use crate::graph::{Block, Tx};
use crate::pegin::ConfirmationOracle;
use crate::vm::ProgramExecutor;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, warn};

/// Validates transactions against the rules of a chain.
///
/// A `Validator` holds no per-transaction state and can be shared between
/// threads; every call builds its own gas state and memo cache.
#[derive(Clone)]
pub struct Validator {
    params: Arc<ConsensusParams>,
    executor: Arc<dyn ProgramExecutor>,
    oracle: Option<Arc<dyn ConfirmationOracle>>,
}

impl Validator {
    /// Create a validator
    ///
    /// # Arguments
    /// * `params` - Consensus parameters
    /// * `executor` - Runs control and issuance programs
    pub fn new(params: Arc<ConsensusParams>, executor: Arc<dyn ProgramExecutor>) -> Self {
        Self {
            params,
            executor,
            oracle: None,
        }
    }

    /// Attach the parent-chain oracle used when peg-in enforcement is on
    pub fn with_oracle(mut self, oracle: Arc<dyn ConfirmationOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    pub(crate) fn executor(&self) -> &dyn ProgramExecutor {
        self.executor.as_ref()
    }

    pub(crate) fn oracle(&self) -> Option<&dyn ConfirmationOracle> {
        self.oracle.as_deref()
    }

    /// Validate a transaction in the context of the block that carries it.
    ///
    /// The gas state is returned even when validation fails: block
    /// validation needs to know whether the transaction paid for its gas
    /// before the failure.
    ///
    /// `tx` should be borrowed from `block.transactions`: a coinbase is only
    /// accepted when it is the block's first transaction by position.
    pub fn validate_transaction(&self, tx: &Tx, block: &Block) -> (GasState, ValidationResult<()>) {
        debug!("Validating transaction {:?}", tx.id);

        let gas = RefCell::new(GasState::new());
        let result = self.check_transaction(tx, block, &gas);
        let gas = gas.into_inner();

        match &result {
            Ok(()) => debug!(
                "Transaction {:?} valid, gas used {}, gas left {}",
                tx.id, gas.gas_used, gas.gas_left
            ),
            Err(e) => warn!("Transaction {:?} rejected: {}", tx.id, e),
        }
        (gas, result)
    }

    fn check_transaction(
        &self,
        tx: &Tx,
        block: &Block,
        gas: &RefCell<GasState>,
    ) -> ValidationResult<()> {
        // 1. Version
        if block.header.version == 1 && tx.header.version != 1 {
            return Err(ValidationError::TxVersion {
                block_version: block.header.version,
                tx_version: tx.header.version,
            });
        }

        // 2. Size
        if tx.serialized_size() == 0 {
            return Err(ValidationError::WrongTransactionSize);
        }

        // 3. Time range and standardness
        check_time_range(tx, block)?;
        check_standard_tx(tx, &self.params)?;

        // 4. The entry graph, from the header down
        let cache = EntryCache::default();
        let ctx = ValidationContext {
            validator: self,
            block,
            tx,
            gas,
            cache: &cache,
            entry_id: tx.id,
            source_pos: 0,
            dest_pos: 0,
        };
        let header = tx.entry(&tx.id)?;
        check_valid(&ctx, header)
    }
}
