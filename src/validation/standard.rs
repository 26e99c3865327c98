//! Policy checks run before the entry graph is walked

use crate::consensus::ConsensusParams;
use crate::error::{ValidationError, ValidationResult};
use crate::graph::{Block, Entry, Tx};
use crate::vm::is_p2w_script;

/// Reject transactions whose native-asset programs are not witness scripts.
///
/// Both the outputs consumed by gas-paying spends and every native-asset
/// output the transaction creates must be P2WPKH or P2WSH.
pub fn check_standard_tx(tx: &Tx, params: &ConsensusParams) -> ValidationResult<()> {
    for id in tx.gas_input_ids(&params.native_asset_id) {
        let spend = tx.spend(&id)?;
        let spent_output_id = spend
            .spent_output_id
            .ok_or(ValidationError::MissingField("spend without spent output ID"))?;
        let spent_output = tx.output(&spent_output_id)?;
        if !is_p2w_script(&spent_output.control_program.code) {
            return Err(ValidationError::NotStandard);
        }
    }

    for id in &tx.header.result_ids {
        let Entry::Output(output) = tx.entry(id)? else {
            continue;
        };
        let native = output
            .source
            .as_ref()
            .and_then(|src| src.value)
            .is_some_and(|value| value.asset_id == params.native_asset_id);
        if native && !is_p2w_script(&output.control_program.code) {
            return Err(ValidationError::NotStandard);
        }
    }
    Ok(())
}

/// A non-zero time range is the last height at which the transaction may
/// still be included.
pub(crate) fn check_time_range(tx: &Tx, block: &Block) -> ValidationResult<()> {
    let time_range = tx.header.time_range;
    if time_range != 0 && time_range < block.header.height {
        return Err(ValidationError::BadTimeRange {
            time_range,
            height: block.header.height,
        });
    }
    Ok(())
}
