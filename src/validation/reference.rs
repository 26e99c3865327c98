//! Reference Integrity
//!
//! Every value link is recorded on both ends: the consumer holds a
//! `ValueSource` naming the producer, and the producer holds a
//! `ValueDestination` naming the consumer. A link is only sound when both ends
//! agree on the entry, the slot and the exact asset amount.

use super::context::ValidationContext;
use super::entry::check_valid;
use crate::error::{ResultExt, ValidationError, ValidationResult};
use crate::graph::Entry;
use crate::types::{ValueDestination, ValueSource};

/// Check a value source of the current entry (at `ctx.source_pos`) against
/// the destination its producer declares. The producer is validated first.
pub(crate) fn check_source(
    ctx: &ValidationContext<'_>,
    src: Option<&ValueSource>,
) -> ValidationResult<()> {
    let src = src.ok_or(ValidationError::MissingField("empty value source"))?;
    let source_ref = src
        .source_ref
        .ok_or(ValidationError::MissingField("missing ref on value source"))?;
    let value = src
        .value
        .ok_or(ValidationError::MissingField("missing value on value source"))?;

    let entry = ctx.tx.entry(&source_ref)?;
    check_valid(&ctx.with_entry(source_ref), entry).context("checking value source")?;

    let dest = match entry {
        Entry::Mux(mux) => usize::try_from(src.position)
            .ok()
            .and_then(|p| mux.witness_destinations.get(p))
            .ok_or(ValidationError::Position {
                entry_type: "mux",
                position: src.position,
                slots: mux.witness_destinations.len(),
            })?,
        Entry::Coinbase(_)
        | Entry::Issuance(_)
        | Entry::Spend(_)
        | Entry::Claim(_)
        | Entry::Dpos(_) => {
            if src.position != 0 {
                return Err(ValidationError::Position {
                    entry_type: entry.type_name(),
                    position: src.position,
                    slots: 1,
                });
            }
            entry
                .witness_destination()
                .ok_or(ValidationError::MissingField("missing destination on value source"))?
        }
        other => {
            return Err(ValidationError::UnexpectedEntryType {
                id: source_ref,
                found: other.type_name(),
                expected: "coinbase, issuance, spend, claim, dpos or mux",
            });
        }
    };

    if dest.dest_ref != Some(ctx.entry_id) {
        return Err(ValidationError::MismatchedReference {
            expected: ctx.entry_id,
            found: dest.dest_ref,
        });
    }
    if dest.position != ctx.source_pos {
        return Err(ValidationError::MismatchedPosition {
            expected: ctx.source_pos,
            found: dest.position,
        });
    }
    let dest_value = dest
        .value
        .ok_or(ValidationError::MissingField("missing value on value destination"))?;
    if dest_value != value {
        return Err(ValidationError::MismatchedValue {
            expected: value,
            found: dest_value,
        });
    }
    Ok(())
}

/// Check a value destination of the current entry (at `ctx.dest_pos`)
/// against the source its consumer declares.
pub(crate) fn check_destination(
    ctx: &ValidationContext<'_>,
    dest: Option<&ValueDestination>,
) -> ValidationResult<()> {
    let dest = dest.ok_or(ValidationError::MissingField("empty value destination"))?;
    let dest_ref = dest
        .dest_ref
        .ok_or(ValidationError::MissingField("missing ref on value destination"))?;
    let value = dest
        .value
        .ok_or(ValidationError::MissingField("missing value on value destination"))?;

    let entry = ctx.tx.entry(&dest_ref)?;
    let src = match entry {
        Entry::Output(output) => single_source(entry, dest.position, output.source.as_ref())?,
        Entry::Retirement(retirement) => {
            single_source(entry, dest.position, retirement.source.as_ref())?
        }
        Entry::Mux(mux) => usize::try_from(dest.position)
            .ok()
            .and_then(|p| mux.sources.get(p))
            .ok_or(ValidationError::Position {
                entry_type: "mux",
                position: dest.position,
                slots: mux.sources.len(),
            })?,
        other => {
            return Err(ValidationError::UnexpectedEntryType {
                id: dest_ref,
                found: other.type_name(),
                expected: "output, retirement or mux",
            });
        }
    };

    if src.source_ref != Some(ctx.entry_id) {
        return Err(ValidationError::MismatchedReference {
            expected: ctx.entry_id,
            found: src.source_ref,
        });
    }
    if src.position != ctx.dest_pos {
        return Err(ValidationError::MismatchedPosition {
            expected: ctx.dest_pos,
            found: src.position,
        });
    }
    let src_value = src
        .value
        .ok_or(ValidationError::MissingField("missing value on value source"))?;
    if src_value != value {
        return Err(ValidationError::MismatchedValue {
            expected: value,
            found: src_value,
        });
    }
    Ok(())
}

fn single_source<'e>(
    entry: &Entry,
    position: u64,
    source: Option<&'e ValueSource>,
) -> ValidationResult<&'e ValueSource> {
    if position != 0 {
        return Err(ValidationError::Position {
            entry_type: entry.type_name(),
            position,
            slots: 1,
        });
    }
    source.ok_or(ValidationError::MissingField("missing source on value destination"))
}
