use crate::consensus::ConsensusParams;
use crate::error::{ValidationError, ValidationResult};
use serde::Serialize;

/// Gas accounting of one transaction
///
/// Created with `gas_valid = false`, funded when the mux is validated,
/// drawn down by every program execution and finally marked valid once the
/// gas-paying inputs have been checked (or unconditionally for coinbase and
/// peg-in claims).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GasState {
    /// Native-asset amount committed to gas
    pub btm_value: u64,
    pub gas_left: i64,
    pub gas_used: i64,
    pub gas_valid: bool,
    pub storage_gas: i64,
}

impl GasState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fund the budget from `btm_value` native units and price the
    /// transaction's storage.
    pub fn set_gas(
        &mut self,
        btm_value: i64,
        tx_size: i64,
        params: &ConsensusParams,
    ) -> ValidationResult<()> {
        if btm_value < 0 {
            return Err(ValidationError::GasCalculation("input native value is negative"));
        }
        self.btm_value = btm_value as u64;

        self.gas_left = btm_value
            .checked_div(params.vm_gas_rate)
            .ok_or(ValidationError::GasCalculation("setGas calc gas amount"))?;
        if self.gas_left > params.max_gas_amount {
            self.gas_left = params.max_gas_amount;
        }

        self.storage_gas = tx_size
            .checked_mul(params.storage_gas_rate)
            .ok_or(ValidationError::GasCalculation("setGas calc tx storage gas"))?;
        Ok(())
    }

    /// Charge storage gas and mark the transaction as having paid.
    pub fn set_gas_valid(&mut self) -> ValidationResult<()> {
        self.gas_left = self
            .gas_left
            .checked_sub(self.storage_gas)
            .filter(|left| *left >= 0)
            .ok_or(ValidationError::GasCalculation("setGasValid calc gasLeft"))?;

        self.gas_used = self
            .gas_used
            .checked_add(self.storage_gas)
            .ok_or(ValidationError::GasCalculation("setGasValid calc gasUsed"))?;

        self.gas_valid = true;
        Ok(())
    }

    /// Record that a program execution left `gas_left` gas.
    ///
    /// Until gas is valid a transaction runs on credit: it may burn at most
    /// `default_gas_credit`, and never so much that storage can no longer be
    /// paid for.
    pub fn update_usage(&mut self, gas_left: i64, params: &ConsensusParams) -> ValidationResult<()> {
        if gas_left < 0 {
            return Err(ValidationError::GasCalculation("updateUsage input negative gas"));
        }

        let consumed = self
            .gas_left
            .checked_sub(gas_left)
            .ok_or(ValidationError::GasCalculation("updateUsage calc gas diff"))?;
        self.gas_used = self
            .gas_used
            .checked_add(consumed)
            .ok_or(ValidationError::GasCalculation("updateUsage calc gas used"))?;
        self.gas_left = gas_left;

        if !self.gas_valid
            && (self.gas_used > params.default_gas_credit || self.storage_gas > self.gas_left)
        {
            return Err(ValidationError::OverGasCredit);
        }
        Ok(())
    }
}
