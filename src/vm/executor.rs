use crate::error::ExecutionError;
use crate::types::{Hash, Program};
use ethers::types::Bytes;

use super::script::is_unspendable;

/// What a verification program may inspect about its surroundings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramContext {
    pub tx_id: Hash,
    pub tx_version: u64,
    /// The entry whose program is running
    pub entry_id: Hash,
    pub block_height: u64,
}

/// Runs a verification program against its witness arguments.
///
/// Implementations must be deterministic and must not touch ledger state.
/// On success they return the gas left out of `gas_limit`.
pub trait ProgramExecutor: Send + Sync {
    fn execute(
        &self,
        ctx: &ProgramContext,
        program: &Program,
        args: &[Bytes],
        gas_limit: i64,
    ) -> Result<i64, ExecutionError>;
}

/// Charges a fixed cost per program and accepts anything that is not
/// provably unspendable. Used for offline dry runs where signatures are not
/// available.
#[derive(Debug, Clone, Copy)]
pub struct FlatCostExecutor {
    pub cost: i64,
}

impl ProgramExecutor for FlatCostExecutor {
    fn execute(
        &self,
        _ctx: &ProgramContext,
        program: &Program,
        _args: &[Bytes],
        gas_limit: i64,
    ) -> Result<i64, ExecutionError> {
        if is_unspendable(&program.code) {
            return Err(ExecutionError::Failed("program is unspendable".to_string()));
        }
        if gas_limit < self.cost {
            return Err(ExecutionError::OutOfGas { limit: gas_limit });
        }
        Ok(gas_limit - self.cost)
    }
}
