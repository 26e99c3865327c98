//! Tests for transaction and block validation

use super::*;
use crate::consensus::native_asset_id;
use crate::error::{ExecutionError, PeginError, ValidationError};
use crate::fixtures::{PeginFixture, pegin_params};
use crate::graph::{
    AssetDefinition, Block, BlockHeader, DposAction, Entry, Output, Retirement, SpendCommitment,
    Tx, TxData, TxInput, TxOutput,
};
use crate::types::{AssetAmount, AssetId, Hash, Program, ValueSource};
use crate::vm::{
    FlatCostExecutor, OP_FAIL, OP_TRUE, ProgramContext, ProgramExecutor, p2wpkh_program,
    p2wsh_program,
};
use ethers::types::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const FEE: u64 = 10_000_000;
const PROGRAM_COST: i64 = 100;
const HEIGHT: u64 = 10;

struct CountingExecutor {
    calls: AtomicUsize,
    inner: FlatCostExecutor,
}

impl ProgramExecutor for CountingExecutor {
    fn execute(
        &self,
        ctx: &ProgramContext,
        program: &Program,
        args: &[Bytes],
        gas_limit: i64,
    ) -> Result<i64, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(ctx, program, args, gas_limit)
    }
}

fn validator() -> Validator {
    validator_with(FlatCostExecutor { cost: PROGRAM_COST })
}

fn validator_with(executor: impl ProgramExecutor + 'static) -> Validator {
    Validator::new(Arc::new(pegin_params()), Arc::new(executor))
}

fn native(amount: u64) -> AssetAmount {
    AssetAmount::new(native_asset_id(), amount)
}

fn other_asset() -> AssetId {
    Hash::repeat_byte(0x0a)
}

fn commitment(value: AssetAmount, tag: u8) -> SpendCommitment {
    SpendCommitment {
        source_id: Hash::repeat_byte(tag),
        source_position: 0,
        asset_amount: value,
        control_program: Program::new(p2wpkh_program(&[tag; 20])),
    }
}

fn spend(value: AssetAmount, tag: u8) -> TxInput {
    TxInput::Spend {
        commitment: commitment(value, tag),
        arguments: vec![Bytes::from(vec![tag])],
    }
}

/// Spend `amount + FEE` native units and pay `amount` to one output
fn transfer(amount: u64) -> TxData {
    TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(native(amount + FEE), 1)],
        outputs: vec![TxOutput::new(native(amount), p2wpkh_program(&[2; 20]))],
    }
}

fn coinbase(arbitrary: Vec<u8>, reward: AssetAmount) -> TxData {
    TxData {
        version: 1,
        time_range: 0,
        inputs: vec![TxInput::Coinbase {
            arbitrary: Bytes::from(arbitrary),
        }],
        outputs: vec![TxOutput::new(reward, p2wpkh_program(&[3; 20]))],
    }
}

fn block_of(transactions: Vec<Tx>) -> Block {
    Block::new(
        BlockHeader {
            version: 1,
            height: HEIGHT,
            ..BlockHeader::default()
        },
        transactions,
    )
}

/// Validate `tx` as the only transaction of a block
fn validate(validator: &Validator, tx: &Tx) -> Result<(), ValidationError> {
    let block = block_of(vec![tx.clone()]);
    validator.validate_transaction(&block.transactions[0], &block).1
}

fn root_of(result: Result<(), ValidationError>) -> ValidationError {
    result.expect_err("transaction should be rejected").root().clone()
}

fn mutate(tx: &mut Tx, id: Hash, f: impl FnOnce(&mut Entry)) {
    f(tx.entries.get_mut(&id).expect("entry present"));
}

/// Append `entry` as an extra result of `tx`, keyed by its content id
fn add_result(tx: &mut Tx, entry: Entry) -> Hash {
    let id = entry.id();
    tx.entries.insert(id, entry);
    tx.header.result_ids.push(id);
    let header_id = tx.id;
    mutate(tx, header_id, |entry| {
        if let Entry::TxHeader(header) = entry {
            header.result_ids.push(id);
        }
    });
    id
}

fn mux_id(tx: &Tx) -> Hash {
    tx.output(&tx.header.result_ids[0])
        .unwrap()
        .source
        .as_ref()
        .and_then(|src| src.source_ref)
        .unwrap()
}

#[test]
fn test_accepts_balanced_transfer() {
    let tx = transfer(60_000_000).map_tx();
    let block = block_of(vec![tx.clone()]);

    let (gas, result) = validator().validate_transaction(&tx, &block);

    assert_eq!(result, Ok(()));
    let storage = tx.serialized_size() as i64;
    assert!(gas.gas_valid);
    assert_eq!(gas.btm_value, FEE);
    assert_eq!(gas.storage_gas, storage);
    assert_eq!(gas.gas_used, PROGRAM_COST + storage);
    assert_eq!(gas.gas_left, (FEE / 200) as i64 - PROGRAM_COST - storage);
}

#[test]
fn test_accepts_issuance_alongside_fee_payment() {
    let definition = AssetDefinition {
        data: Hash::repeat_byte(0x42),
        issuance_program: Program::new(vec![OP_TRUE]),
    };
    let issued = AssetAmount::new(definition.compute_asset_id(), 500);
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![
            TxInput::Issuance {
                nonce: Bytes::from(vec![1, 2, 3]),
                asset_amount: issued,
                asset_definition: definition,
                arguments: vec![],
            },
            spend(native(FEE), 1),
        ],
        outputs: vec![TxOutput::new(issued, vec![OP_TRUE])],
    }
    .map_tx();

    assert_eq!(validate(&validator(), &tx), Ok(()));
}

#[test]
fn test_rejects_issuance_of_undeclared_asset() {
    let definition = AssetDefinition {
        data: Hash::repeat_byte(0x42),
        issuance_program: Program::new(vec![OP_TRUE]),
    };
    let forged = AssetAmount::new(other_asset(), 500);
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![
            TxInput::Issuance {
                nonce: Bytes::from(vec![1]),
                asset_amount: forged,
                asset_definition: definition,
                arguments: vec![],
            },
            spend(native(FEE), 1),
        ],
        outputs: vec![TxOutput::new(forged, vec![OP_TRUE])],
    }
    .map_tx();

    assert!(matches!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MismatchedAssetId { .. }
    ));
}

#[test]
fn test_rejects_unbalanced_non_native_asset() {
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(native(FEE), 1), spend(AssetAmount::new(other_asset(), 50), 2)],
        outputs: vec![TxOutput::new(AssetAmount::new(other_asset(), 60), vec![OP_TRUE])],
    }
    .map_tx();

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Unbalanced {
            asset_id: other_asset(),
            net: -10
        }
    );
}

#[test]
fn test_rejects_destination_without_source() {
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(native(FEE), 1)],
        outputs: vec![TxOutput::new(AssetAmount::new(other_asset(), 1), vec![OP_TRUE])],
    }
    .map_tx();

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::NoSource {
            asset_id: other_asset(),
            position: 0
        }
    );
}

#[test]
fn test_largest_signed_amount_is_accepted() {
    let max = AssetAmount::new(other_asset(), i64::MAX as u64);
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(native(FEE), 1), spend(max, 2)],
        outputs: vec![TxOutput::new(max, vec![OP_TRUE])],
    }
    .map_tx();

    assert_eq!(validate(&validator(), &tx), Ok(()));
}

#[test]
fn test_amount_beyond_signed_range_overflows() {
    let too_big = AssetAmount::new(other_asset(), 1u64 << 63);
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(native(FEE), 1), spend(too_big, 2)],
        outputs: vec![TxOutput::new(too_big, vec![OP_TRUE])],
    }
    .map_tx();

    assert!(matches!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Overflow(_)
    ));
}

#[test]
fn test_summed_sources_overflow() {
    let half = AssetAmount::new(other_asset(), (i64::MAX as u64) / 2 + 1);
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(native(FEE), 1), spend(half, 2), spend(half, 3)],
        outputs: vec![TxOutput::new(half, vec![OP_TRUE])],
    }
    .map_tx();

    assert!(matches!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Overflow(_)
    ));
}

#[test]
fn test_mutating_output_source_value_is_detected() {
    let mut tx = transfer(1_000).map_tx();
    let output_id = tx.header.result_ids[0];
    mutate(&mut tx, output_id, |entry| {
        if let Entry::Output(output) = entry {
            if let Some(value) = output.source.as_mut().and_then(|src| src.value.as_mut()) {
                value.amount += 1;
            }
        }
    });

    assert!(matches!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MismatchedValue { .. }
    ));
}

#[test]
fn test_mutating_output_source_position_is_detected() {
    let mut data = transfer(1_000);
    data.outputs
        .push(TxOutput::new(native(5), p2wsh_program(&[4; 32])));
    data.inputs = vec![spend(native(1_005 + FEE), 1)];
    let mut tx = data.map_tx();
    let output_id = tx.header.result_ids[0];
    mutate(&mut tx, output_id, |entry| {
        if let Entry::Output(output) = entry {
            if let Some(src) = output.source.as_mut() {
                src.position = 1;
            }
        }
    });

    // the mux sees its destination 0 answered from slot 1
    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MismatchedPosition {
            expected: 0,
            found: 1
        }
    );
}

#[test]
fn test_mutating_mux_destination_ref_is_detected() {
    let mut tx = transfer(1_000).map_tx();
    let mux = mux_id(&tx);
    let dangling = Hash::repeat_byte(0xee);
    mutate(&mut tx, mux, |entry| {
        if let Entry::Mux(mux) = entry {
            mux.witness_destinations[0].dest_ref = Some(dangling);
        }
    });

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MissingEntry(dangling)
    );
}

#[test]
fn test_mutating_spend_destination_value_is_detected() {
    let mut tx = transfer(1_000).map_tx();
    let spend_id = tx.input_ids[0];
    mutate(&mut tx, spend_id, |entry| {
        if let Entry::Spend(spend) = entry {
            if let Some(value) = spend.witness_destination.as_mut().and_then(|d| d.value.as_mut()) {
                value.amount -= 1;
            }
        }
    });

    assert!(matches!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MismatchedValue { .. }
    ));
}

#[test]
fn test_mutating_mux_source_position_is_detected() {
    let mut tx = transfer(1_000).map_tx();
    let mux = mux_id(&tx);
    mutate(&mut tx, mux, |entry| {
        if let Entry::Mux(mux) = entry {
            mux.sources[0].position = 1;
        }
    });

    // the spend checks its destination first and finds slot 1 answering
    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MismatchedPosition {
            expected: 0,
            found: 1
        }
    );
}

#[test]
fn test_spend_destination_ref_to_foreign_entry() {
    let mut tx = transfer(1_000).map_tx();
    let spend_id = tx.input_ids[0];
    let output_id = tx.header.result_ids[0];
    let mux = mux_id(&tx);
    mutate(&mut tx, spend_id, |entry| {
        if let Entry::Spend(spend) = entry {
            if let Some(dest) = spend.witness_destination.as_mut() {
                dest.dest_ref = Some(output_id);
            }
        }
    });

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MismatchedReference {
            expected: spend_id,
            found: Some(mux)
        }
    );
}

#[test]
fn test_mux_destination_ref_to_itself() {
    let mut tx = transfer(1_000).map_tx();
    let spend_id = tx.input_ids[0];
    let mux = mux_id(&tx);
    mutate(&mut tx, mux, |entry| {
        if let Entry::Mux(mux_entry) = entry {
            mux_entry.witness_destinations[0].dest_ref = Some(mux);
        }
    });

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MismatchedReference {
            expected: mux,
            found: Some(spend_id)
        }
    );
}

#[test]
fn test_output_source_ref_to_unclaimed_mux_slot() {
    let mut tx = transfer(1_000).map_tx();
    let paid_output = tx.header.result_ids[0];
    let mux = mux_id(&tx);
    let stray = add_result(
        &mut tx,
        Entry::Output(Output {
            source: Some(ValueSource::new(mux, native(1_000), 0)),
            control_program: Program::new(p2wpkh_program(&[9; 20])),
            ordinal: 1,
        }),
    );

    // mux slot 0 already pays the first output
    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MismatchedReference {
            expected: stray,
            found: Some(paid_output)
        }
    );
}

#[test]
fn test_spend_destination_position_beyond_mux_sources() {
    let mut tx = transfer(1_000).map_tx();
    let spend_id = tx.input_ids[0];
    mutate(&mut tx, spend_id, |entry| {
        if let Entry::Spend(spend) = entry {
            if let Some(dest) = spend.witness_destination.as_mut() {
                dest.position = 3;
            }
        }
    });

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Position {
            entry_type: "mux",
            position: 3,
            slots: 1
        }
    );
}

#[test]
fn test_mux_destination_position_on_single_slot_output() {
    let mut tx = transfer(1_000).map_tx();
    let mux = mux_id(&tx);
    mutate(&mut tx, mux, |entry| {
        if let Entry::Mux(mux_entry) = entry {
            mux_entry.witness_destinations[0].position = 2;
        }
    });

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Position {
            entry_type: "output1",
            position: 2,
            slots: 1
        }
    );
}

#[test]
fn test_output_source_position_beyond_mux_destinations() {
    let mut tx = transfer(1_000).map_tx();
    let mux = mux_id(&tx);
    add_result(
        &mut tx,
        Entry::Output(Output {
            source: Some(ValueSource::new(mux, native(1_000), 7)),
            control_program: Program::new(p2wpkh_program(&[9; 20])),
            ordinal: 1,
        }),
    );

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Position {
            entry_type: "mux",
            position: 7,
            slots: 1
        }
    );
}

#[test]
fn test_retirement_source_position_on_single_slot_spend() {
    let mut tx = transfer(1_000).map_tx();
    let spend_id = tx.input_ids[0];
    add_result(
        &mut tx,
        Entry::Retirement(Retirement {
            source: Some(ValueSource::new(spend_id, native(1_000 + FEE), 1)),
            ordinal: 1,
        }),
    );

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Position {
            entry_type: "spend1",
            position: 1,
            slots: 1
        }
    );
}

#[test]
fn test_missing_mux_is_detected() {
    let mut tx = transfer(1_000).map_tx();
    let mux = mux_id(&tx);
    tx.entries.remove(&mux);

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::MissingEntry(mux)
    );
}

#[test]
fn test_each_program_runs_once() {
    let executor = Arc::new(CountingExecutor {
        calls: AtomicUsize::new(0),
        inner: FlatCostExecutor { cost: PROGRAM_COST },
    });
    let validator = Validator::new(Arc::new(pegin_params()), executor.clone());
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(native(FEE), 1), spend(native(2_000), 2)],
        outputs: vec![
            TxOutput::new(native(1_000), p2wpkh_program(&[5; 20])),
            TxOutput::new(native(1_000), p2wpkh_program(&[6; 20])),
        ],
    }
    .map_tx();

    assert_eq!(validate(&validator, &tx), Ok(()));
    // each spend is reached as a gas input and as a mux source
    assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failing_program_is_reported_with_its_entry() {
    let mut data = transfer(1_000);
    data.inputs = vec![TxInput::Spend {
        commitment: SpendCommitment {
            control_program: Program::new(p2wsh_program(&[8; 32])),
            ..commitment(native(1_000 + FEE), 1)
        },
        arguments: vec![],
    }];
    let tx = data.map_tx();
    let validator = validator_with(FlatCostExecutor { cost: 10_000_000 });

    match root_of(validate(&validator, &tx)) {
        ValidationError::Program { entry, source } => {
            assert_eq!(entry, tx.input_ids[0]);
            assert!(matches!(source, ExecutionError::OutOfGas { .. }));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_rejects_spending_beyond_gas_credit() {
    let tx = transfer(1_000).map_tx();
    let validator = validator_with(FlatCostExecutor { cost: 40_000 });
    let block = block_of(vec![tx.clone()]);

    let (gas, result) = validator.validate_transaction(&tx, &block);

    assert_eq!(result.unwrap_err().root(), &ValidationError::OverGasCredit);
    assert!(!gas.gas_valid);
}

#[test]
fn test_rejects_transaction_without_results() {
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(native(FEE), 1)],
        outputs: vec![],
    }
    .map_tx();

    assert_eq!(root_of(validate(&validator(), &tx)), ValidationError::EmptyResults);
}

#[test]
fn test_retirement_is_a_valid_result() {
    let mut data = transfer(1_000);
    data.outputs.push(TxOutput::new(native(500), vec![OP_FAIL]));
    data.inputs = vec![spend(native(1_500 + FEE), 1)];
    let tx = data.map_tx();

    assert!(matches!(
        tx.entry(&tx.header.result_ids[1]),
        Ok(Entry::Retirement(_))
    ));
    assert_eq!(validate(&validator(), &tx), Ok(()));
}

#[test]
fn test_dpos_stake_stays_out_of_the_balance() {
    let mut data = transfer(1_000);
    data.inputs.push(TxInput::Dpos {
        commitment: commitment(native(777), 9),
        action: DposAction::Vote,
        from: "voter".to_string(),
        to: "delegate".to_string(),
        stake: 777,
        data: Bytes::default(),
        arguments: vec![],
    });
    let tx = data.map_tx();

    assert_eq!(validate(&validator(), &tx), Ok(()));
}

#[test]
fn test_coinbase_must_lead_the_block() {
    let reward = coinbase(b"height 10".to_vec(), native(5_000)).map_tx();
    let payment = transfer(1_000).map_tx();
    let validator = validator();

    let block = block_of(vec![reward.clone(), payment.clone()]);
    let (gas, result) = validator.validate_transaction(&block.transactions[0], &block);
    assert_eq!(result, Ok(()));
    assert!(gas.gas_valid);

    let block = block_of(vec![payment, reward.clone()]);
    let (_, result) = validator.validate_transaction(&block.transactions[1], &block);
    assert_eq!(result.unwrap_err().root(), &ValidationError::WrongCoinbaseTransaction);

    // a copy of the leading coinbase is still out of place
    let block = block_of(vec![reward.clone(), reward]);
    let (_, result) = validator.validate_transaction(&block.transactions[1], &block);
    assert_eq!(result.unwrap_err().root(), &ValidationError::WrongCoinbaseTransaction);
}

#[test]
fn test_block_rejects_repeated_coinbase() {
    let reward = coinbase(b"height 10".to_vec(), native(5_000)).map_tx();
    let block = block_of(vec![reward.clone(), reward.clone()]);

    assert_eq!(
        validator().validate_block(&block).unwrap_err().root(),
        &ValidationError::DuplicateTransaction(reward.id)
    );
}

#[test]
fn test_block_rejects_repeated_transaction() {
    let payment = transfer(1_000).map_tx();
    let block = block_of(vec![
        coinbase(vec![], native(5_000)).map_tx(),
        payment.clone(),
        payment.clone(),
    ]);

    assert_eq!(
        validator().validate_block(&block).unwrap_err().root(),
        &ValidationError::DuplicateTransaction(payment.id)
    );
}

#[test]
fn test_coinbase_arbitrary_size_limit() {
    let limit = pegin_params().coinbase_arbitrary_size_limit;

    let at_limit = coinbase(vec![7; limit], native(5_000)).map_tx();
    assert_eq!(validate(&validator(), &at_limit), Ok(()));

    let over = coinbase(vec![7; limit + 1], native(5_000)).map_tx();
    assert_eq!(
        root_of(validate(&validator(), &over)),
        ValidationError::CoinbaseArbitraryOversize {
            size: limit + 1,
            limit
        }
    );
}

#[test]
fn test_coinbase_must_pay_native_asset() {
    let tx = coinbase(vec![], AssetAmount::new(other_asset(), 5_000)).map_tx();
    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::WrongCoinbaseAsset(other_asset())
    );
}

fn claim_tx(fixture: &PeginFixture, pegin_witness: Vec<Bytes>) -> Tx {
    let amount = fixture.commitment.asset_amount;
    TxData {
        version: 1,
        time_range: 0,
        inputs: vec![TxInput::Claim {
            commitment: fixture.commitment.clone(),
            pegin_witness,
            arguments: vec![],
        }],
        outputs: vec![TxOutput::new(amount, p2wpkh_program(&[6; 20]))],
    }
    .map_tx()
}

#[test]
fn test_accepts_proven_claim() {
    let fixture = PeginFixture::new(100_000_000);
    let tx = claim_tx(&fixture, fixture.stack());
    let block = block_of(vec![tx.clone()]);

    let (gas, result) = validator().validate_transaction(&tx, &block);

    assert_eq!(result, Ok(()));
    assert!(gas.gas_valid);
}

#[test]
fn test_rejects_claim_with_short_witness() {
    let fixture = PeginFixture::new(100_000_000);
    let mut stack = fixture.stack();
    stack.truncate(4);
    let tx = claim_tx(&fixture, stack);

    assert_eq!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Pegin(PeginError::NoWitness)
    );
}

#[test]
fn test_rejects_claim_with_wrong_amount() {
    let mut fixture = PeginFixture::new(100_000_000);
    fixture.amount = b"99999999".to_vec();
    let tx = claim_tx(&fixture, fixture.stack());

    assert!(matches!(
        root_of(validate(&validator(), &tx)),
        ValidationError::Pegin(PeginError::AmountMismatch { .. })
    ));
}

#[test]
fn test_rejects_non_witness_gas_input() {
    let mut data = transfer(1_000);
    data.inputs = vec![TxInput::Spend {
        commitment: SpendCommitment {
            control_program: Program::new(vec![OP_TRUE]),
            ..commitment(native(1_000 + FEE), 1)
        },
        arguments: vec![],
    }];
    let tx = data.map_tx();

    assert_eq!(root_of(validate(&validator(), &tx)), ValidationError::NotStandard);
}

#[test]
fn test_rejects_native_output_to_non_witness_program() {
    let mut data = transfer(1_000);
    data.outputs = vec![TxOutput::new(native(1_000), vec![OP_TRUE])];
    let tx = data.map_tx();

    assert_eq!(check_standard_tx(&tx, &pegin_params()), Err(ValidationError::NotStandard));
}

#[test]
fn test_time_range_bounds_inclusion_height() {
    let validator = validator();

    let mut data = transfer(1_000);
    data.time_range = HEIGHT;
    assert_eq!(validate(&validator, &data.map_tx()), Ok(()));

    data.time_range = HEIGHT - 1;
    assert_eq!(
        root_of(validate(&validator, &data.map_tx())),
        ValidationError::BadTimeRange {
            time_range: HEIGHT - 1,
            height: HEIGHT
        }
    );
}

#[test]
fn test_rejects_unknown_version_in_version_one_block() {
    let mut data = transfer(1_000);
    data.version = 2;

    assert_eq!(
        root_of(validate(&validator(), &data.map_tx())),
        ValidationError::TxVersion {
            block_version: 1,
            tx_version: 2
        }
    );
}

#[test]
fn test_rejects_zero_size() {
    let mut tx = transfer(1_000).map_tx();
    tx.header.serialized_size = 0;

    assert_eq!(root_of(validate(&validator(), &tx)), ValidationError::WrongTransactionSize);
}

#[test]
fn test_block_keeps_transactions_that_failed_after_paying() {
    let definition = AssetDefinition {
        data: Hash::repeat_byte(0x42),
        issuance_program: Program::new(vec![OP_TRUE]),
    };
    let forged = AssetAmount::new(other_asset(), 10);
    let failing = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![
            spend(native(FEE), 4),
            TxInput::Issuance {
                nonce: Bytes::from(vec![9]),
                asset_amount: forged,
                asset_definition: definition,
                arguments: vec![],
            },
        ],
        outputs: vec![TxOutput::new(forged, vec![OP_TRUE])],
    }
    .map_tx();
    let block = block_of(vec![
        coinbase(vec![], native(5_000)).map_tx(),
        transfer(1_000).map_tx(),
        failing,
    ]);

    let outcome = validator().validate_block(&block).unwrap();

    assert_eq!(outcome.transactions.len(), 3);
    let failed: Vec<_> = outcome.failed_transactions().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].tx_id, block.transactions[2].id);
    assert_eq!(outcome.fees, 2 * FEE);
    let used: i64 = outcome.transactions.iter().map(|t| t.gas.gas_used).sum();
    assert_eq!(outcome.gas_used, used as u64);
}

#[test]
fn test_block_rejects_transaction_that_never_paid() {
    // only a non-native asset moves, so nothing buys gas
    let tx = TxData {
        version: 1,
        time_range: 0,
        inputs: vec![spend(AssetAmount::new(other_asset(), 50), 2)],
        outputs: vec![TxOutput::new(AssetAmount::new(other_asset(), 50), vec![OP_TRUE])],
    }
    .map_tx();
    let validator = validator_with(FlatCostExecutor { cost: 0 });
    let block = block_of(vec![tx.clone()]);

    assert_eq!(validator.validate_transaction(&tx, &block).1, Ok(()));
    assert_eq!(
        validator.validate_block(&block).unwrap_err().root(),
        &ValidationError::GasNotPaid(tx.id)
    );
}

#[test]
fn test_block_rejects_transaction_failing_before_payment() {
    let tx = transfer(1_000).map_tx();
    let validator = validator_with(FlatCostExecutor { cost: 40_000 });
    let block = block_of(vec![tx]);

    assert_eq!(
        validator.validate_block(&block).unwrap_err().root(),
        &ValidationError::OverGasCredit
    );
}

#[test]
fn test_block_gas_limit() {
    let params = crate::consensus::ConsensusParams {
        max_block_gas: 150,
        ..pegin_params()
    };
    let validator = Validator::new(Arc::new(params), Arc::new(FlatCostExecutor { cost: PROGRAM_COST }));
    let block = block_of(vec![transfer(1_000).map_tx()]);

    assert!(matches!(
        validator.validate_block(&block),
        Err(ValidationError::BlockGasLimit { limit: 150, .. })
    ));
}
