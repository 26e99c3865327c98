use super::merkle::validate_tx_merkle_proof;
use super::oracle::ConfirmationOracle;
use super::parent::ParentTransaction;
use super::witness::PeginWitness;
use crate::consensus::ConsensusParams;
use crate::error::PeginError;
use crate::graph::Output;
use crate::vm::pegin_contract_program;
use ethers::types::Bytes;
use tracing::debug;

/// Verify that `stack` proves a genuine parent-chain deposit backing
/// `prevout`, the output a claim redeems.
///
/// # Steps
/// 1. Decode the five-element stack and range check the claimed amount
/// 2. Rebuild the parent block's transaction root from the partial merkle tree
/// 3. Check the parent transaction is one of the proven transactions
/// 4. Check the parent output pays the claimed amount to the peg contract
///    instantiated with the claim script
/// 5. Check the parent genesis hash is the one this chain is linked to
/// 6. If enforcement is on, ask the oracle whether the block is buried deep
///    enough
///
/// Every failure is final.
pub fn verify_pegin_witness(
    stack: &[Bytes],
    prevout: &Output,
    params: &ConsensusParams,
    oracle: Option<&dyn ConfirmationOracle>,
) -> Result<(), PeginError> {
    let witness = PeginWitness::parse(stack, params.max_money)?;
    let merkle_block = &witness.merkle_block;
    let header = &merkle_block.block_header;

    if !validate_tx_merkle_proof(
        &merkle_block.tx_hashes,
        &merkle_block.flags,
        &merkle_block.matched_tx_ids,
        &header.transactions_merkle_root,
    ) {
        return Err(PeginError::ProofValidation);
    }

    let parent_tx_id = witness.parent_tx.id();
    if !merkle_block.matched_tx_ids.contains(&parent_tx_id) {
        return Err(PeginError::TransactionNotProven(parent_tx_id));
    }

    check_pegin_tx(&witness.parent_tx, prevout, witness.amount, &witness.claim_script)?;

    let genesis = witness.parent_genesis_hash()?;
    if genesis != params.parent_genesis_hash {
        return Err(PeginError::GenesisMismatch {
            expected: params.parent_genesis_hash,
            found: genesis,
        });
    }

    if params.validate_pegin {
        let oracle = oracle.ok_or(PeginError::OracleUnavailable)?;
        if !oracle.is_confirmed(header.height, params.pegin_min_depth)? {
            return Err(PeginError::NotConfirmed {
                height: header.height,
                min_depth: params.pegin_min_depth,
            });
        }
    }

    debug!(
        "Peg-in of {} proven by parent tx {:?} at height {}",
        witness.amount, parent_tx_id, header.height
    );
    Ok(())
}

/// The parent output named by the prevout's source position must carry the
/// claimed amount under the derived peg contract program.
fn check_pegin_tx(
    parent_tx: &ParentTransaction,
    prevout: &Output,
    claimed: u64,
    claim_script: &[u8],
) -> Result<(), PeginError> {
    let source = prevout.source.as_ref().ok_or(PeginError::NoWitness)?;
    let value = source.value.ok_or(PeginError::NoWitness)?;

    let parent_output = usize::try_from(source.position)
        .ok()
        .and_then(|i| parent_tx.outputs.get(i))
        .ok_or(PeginError::OutputIndex {
            position: source.position,
            outputs: parent_tx.outputs.len(),
        })?;

    if parent_output.amount != claimed {
        return Err(PeginError::AmountMismatch {
            claimed,
            found: parent_output.amount,
        });
    }
    if value.amount != claimed {
        return Err(PeginError::AmountMismatch {
            claimed,
            found: value.amount,
        });
    }

    let expected = pegin_contract_program(claim_script).map_err(PeginError::ClaimScript)?;
    if parent_output.control_program.as_ref() != expected.as_slice() {
        return Err(PeginError::ControlProgramMismatch);
    }
    Ok(())
}
