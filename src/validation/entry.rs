//! Per-entry validation rules
//!
//! `check_valid` is the single entry point: it dispatches on the entry type,
//! descends into whatever the entry depends on and memoizes the outcome so
//! that an entry reachable along several paths is only evaluated once.

use super::context::ValidationContext;
use super::reference::{check_destination, check_source};
use crate::error::{PeginError, ResultExt, ValidationError, ValidationResult};
use crate::graph::{Claim, Coinbase, Entry, Issuance, Mux, Output, Spend, TxHeader};
use crate::pegin::{PEGIN_WITNESS_LEN, verify_pegin_witness};
use crate::types::{AssetAmount, AssetId, Program, ValueDestination};
use ethers::types::Bytes;
use std::collections::BTreeMap;
use tracing::debug;

/// Validate `entry`, which must be the entry stored under `ctx.entry_id`.
///
/// The first result computed for an id, success or failure, is returned to
/// every later caller within the same run.
pub(crate) fn check_valid(ctx: &ValidationContext<'_>, entry: &Entry) -> ValidationResult<()> {
    if let Some(cached) = ctx.cache.borrow().get(&ctx.entry_id) {
        return cached.clone();
    }

    debug!("Checking {} entry {:?}", entry.type_name(), ctx.entry_id);
    let result = check_entry(ctx, entry);
    ctx.cache.borrow_mut().insert(ctx.entry_id, result.clone());
    result
}

fn check_entry(ctx: &ValidationContext<'_>, entry: &Entry) -> ValidationResult<()> {
    match entry {
        Entry::TxHeader(header) => check_tx_header(ctx, header),
        Entry::Mux(mux) => check_mux(ctx, mux),
        Entry::Output(output) => check_source(&ctx.with_source_pos(0), output.source.as_ref())
            .context("checking output source"),
        Entry::Retirement(retirement) => {
            check_source(&ctx.with_source_pos(0), retirement.source.as_ref())
                .context("checking retirement source")
        }
        Entry::Issuance(issuance) => check_issuance(ctx, issuance),
        Entry::Spend(spend) => check_spend(ctx, spend),
        Entry::Coinbase(coinbase) => check_coinbase(ctx, coinbase),
        Entry::Claim(claim) => check_claim(ctx, claim),
        // stake bookkeeping is settled outside the value graph
        Entry::Dpos(_) => Ok(()),
    }
}

fn check_tx_header(ctx: &ValidationContext<'_>, header: &TxHeader) -> ValidationResult<()> {
    for (i, result_id) in header.result_ids.iter().enumerate() {
        let result = ctx
            .tx
            .entry(result_id)
            .with_context(|| format!("checking result {i}"))?;
        check_valid(&ctx.with_entry(*result_id), result)
            .with_context(|| format!("checking result {i}"))?;
    }

    if header.version == 1 && header.result_ids.is_empty() {
        return Err(ValidationError::EmptyResults);
    }
    Ok(())
}

fn check_mux(ctx: &ValidationContext<'_>, mux: &Mux) -> ValidationResult<()> {
    let params = ctx.params();
    let mut parity: BTreeMap<AssetId, i64> = BTreeMap::new();

    for (i, src) in mux.sources.iter().enumerate() {
        let source_ref = src
            .source_ref
            .ok_or(ValidationError::MissingField("missing ref on mux source"))?;
        let source_entry = ctx
            .tx
            .entry(&source_ref)
            .with_context(|| format!("checking mux source {i}"))?;
        if matches!(source_entry, Entry::Dpos(_)) {
            continue;
        }

        let value = src
            .value
            .ok_or(ValidationError::MissingField("missing value on mux source"))?;
        let amount = signed_amount(&value)?;
        let sum = parity.entry(value.asset_id).or_insert(0);
        *sum = sum.checked_add(amount).ok_or_else(|| {
            ValidationError::Overflow(format!(
                "adding {} units of asset {:?} from mux source {i}",
                value.amount, value.asset_id
            ))
        })?;
    }

    for (i, dest) in mux.witness_destinations.iter().enumerate() {
        let value = dest
            .value
            .ok_or(ValidationError::MissingField("missing value on mux destination"))?;
        let sum = parity
            .get_mut(&value.asset_id)
            .ok_or(ValidationError::NoSource {
                asset_id: value.asset_id,
                position: i,
            })?;
        let amount = signed_amount(&value)?;
        *sum = sum.checked_sub(amount).ok_or_else(|| {
            ValidationError::Overflow(format!(
                "subtracting {} units of asset {:?} for mux destination {i}",
                value.amount, value.asset_id
            ))
        })?;
    }

    for (asset_id, net) in &parity {
        if *asset_id == params.native_asset_id {
            let tx_size = i64::try_from(ctx.tx.serialized_size())
                .map_err(|_| ValidationError::GasCalculation("transaction size"))?;
            ctx.gas.borrow_mut().set_gas(*net, tx_size, params)?;
        } else if *net != 0 {
            return Err(ValidationError::Unbalanced {
                asset_id: *asset_id,
                net: *net,
            });
        }
    }

    let gas_inputs = ctx.tx.gas_input_ids(&params.native_asset_id);
    for id in &gas_inputs {
        let input = ctx.tx.entry(id).context("checking gas input")?;
        check_valid(&ctx.with_entry(*id), input).context("checking gas input")?;
    }

    for (i, dest) in mux.witness_destinations.iter().enumerate() {
        check_destination(&ctx.with_dest_pos(i as u64), Some(dest))
            .with_context(|| format!("checking mux destination {i}"))?;
    }

    if !gas_inputs.is_empty() {
        ctx.gas.borrow_mut().set_gas_valid()?;
    }

    for (i, src) in mux.sources.iter().enumerate() {
        check_source(&ctx.with_source_pos(i as u64), Some(src))
            .with_context(|| format!("checking mux source {i}"))?;
    }
    Ok(())
}

fn check_issuance(ctx: &ValidationContext<'_>, issuance: &Issuance) -> ValidationResult<()> {
    let computed = issuance.witness_asset_definition.compute_asset_id();
    if computed != issuance.value.asset_id {
        return Err(ValidationError::MismatchedAssetId {
            computed,
            declared: issuance.value.asset_id,
        });
    }

    run_program(
        ctx,
        &issuance.witness_asset_definition.issuance_program,
        &issuance.witness_arguments,
    )
    .context("checking issuance program")?;

    check_destination(&ctx.with_dest_pos(0), issuance.witness_destination.as_ref())
        .context("checking issuance destination")
}

fn check_spend(ctx: &ValidationContext<'_>, spend: &Spend) -> ValidationResult<()> {
    let spent_output_id = spend
        .spent_output_id
        .ok_or(ValidationError::MissingField("spend without spent output ID"))?;
    let spent_output = ctx
        .tx
        .output(&spent_output_id)
        .context("getting spend prevout")?;

    run_program(ctx, &spent_output.control_program, &spend.witness_arguments)
        .context("checking control program")?;

    check_value_preserved(spent_output, spend.witness_destination.as_ref())
        .context("checking spent source value")?;
    check_destination(&ctx.with_dest_pos(0), spend.witness_destination.as_ref())
        .context("checking spend destination")
}

fn check_coinbase(ctx: &ValidationContext<'_>, coinbase: &Coinbase) -> ValidationResult<()> {
    if !ctx.block.is_first_transaction(ctx.tx) {
        return Err(ValidationError::WrongCoinbaseTransaction);
    }

    let value = coinbase
        .witness_destination
        .as_ref()
        .and_then(|dest| dest.value)
        .ok_or(ValidationError::MissingField("missing value on coinbase destination"))?;
    if value.asset_id != ctx.params().native_asset_id {
        return Err(ValidationError::WrongCoinbaseAsset(value.asset_id));
    }

    let limit = ctx.params().coinbase_arbitrary_size_limit;
    if coinbase.arbitrary.len() > limit {
        return Err(ValidationError::CoinbaseArbitraryOversize {
            size: coinbase.arbitrary.len(),
            limit,
        });
    }

    check_destination(&ctx.with_dest_pos(0), coinbase.witness_destination.as_ref())
        .context("checking coinbase destination")?;
    ctx.gas.borrow_mut().gas_valid = true;
    Ok(())
}

fn check_claim(ctx: &ValidationContext<'_>, claim: &Claim) -> ValidationResult<()> {
    let spent_output_id = claim
        .spent_output_id
        .ok_or(ValidationError::MissingField("claim without spent output ID"))?;
    let spent_output = ctx
        .tx
        .output(&spent_output_id)
        .context("getting claim prevout")?;

    let stack = &claim.pegin_witness;
    if stack.len() < PEGIN_WITNESS_LEN || stack[1].is_empty() || spent_output.source.is_none() {
        return Err(PeginError::NoWitness.into());
    }

    let oracle = ctx.validator.oracle();
    verify_pegin_witness(stack, spent_output, ctx.params(), oracle)
        .map_err(ValidationError::from)
        .context("checking peg-in witness")?;

    check_value_preserved(spent_output, claim.witness_destination.as_ref())
        .context("checking claim source value")?;
    check_destination(&ctx.with_dest_pos(0), claim.witness_destination.as_ref())
        .context("checking claim destination")?;
    ctx.gas.borrow_mut().gas_valid = true;
    Ok(())
}

/// Run `program` against the current gas budget and record what it burned.
fn run_program(ctx: &ValidationContext<'_>, program: &Program, args: &[Bytes]) -> ValidationResult<()> {
    let gas_limit = ctx.gas.borrow().gas_left;
    let gas_left = ctx
        .validator
        .executor()
        .execute(&ctx.program_context(), program, args, gas_limit)
        .map_err(|source| ValidationError::Program {
            entry: ctx.entry_id,
            source,
        })?;
    ctx.gas.borrow_mut().update_usage(gas_left, ctx.params())
}

/// The value an input forwards must be exactly the value of the output it
/// consumes.
fn check_value_preserved(
    prevout: &Output,
    dest: Option<&ValueDestination>,
) -> ValidationResult<()> {
    let spent = prevout
        .source
        .as_ref()
        .and_then(|src| src.value)
        .ok_or(ValidationError::MissingField("missing value on spent output"))?;
    let forwarded = dest
        .and_then(|dest| dest.value)
        .ok_or(ValidationError::MissingField("missing value on input destination"))?;
    if spent != forwarded {
        return Err(ValidationError::MismatchedValue {
            expected: spent,
            found: forwarded,
        });
    }
    Ok(())
}

/// Amounts enter the signed balance arithmetic only when they fit in an i64.
fn signed_amount(value: &AssetAmount) -> ValidationResult<i64> {
    i64::try_from(value.amount).map_err(|_| {
        ValidationError::Overflow(format!(
            "amount {} of asset {:?} exceeds the signed range",
            value.amount, value.asset_id
        ))
    })
}
