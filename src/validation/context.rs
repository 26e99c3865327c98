use super::validator::Validator;
use crate::consensus::ConsensusParams;
use crate::error::ValidationResult;
use crate::gas::GasState;
use crate::graph::{Block, Tx};
use crate::types::Hash;
use crate::vm::ProgramContext;
use std::cell::RefCell;
use std::collections::HashMap;

/// Memoized per-entry results of one validation run
pub(crate) type EntryCache = RefCell<HashMap<Hash, ValidationResult<()>>>;

/// State that propagates through the graph while one transaction is
/// validated.
///
/// Shared pieces (gas, cache) are borrowed handles; the entry id and slot
/// positions are plain values, so descending into a child copies the context
/// with the fields that change and leaves the caller's copy untouched.
#[derive(Clone, Copy)]
pub(crate) struct ValidationContext<'a> {
    pub validator: &'a Validator,
    pub block: &'a Block,
    pub tx: &'a Tx,
    pub gas: &'a RefCell<GasState>,
    pub cache: &'a EntryCache,
    /// The nearest enclosing entry
    pub entry_id: Hash,
    /// Slot being checked when validating a value source
    pub source_pos: u64,
    /// Slot being checked when validating a value destination
    pub dest_pos: u64,
}

impl<'a> ValidationContext<'a> {
    pub fn with_entry(&self, entry_id: Hash) -> Self {
        Self { entry_id, ..*self }
    }

    pub fn with_source_pos(&self, source_pos: u64) -> Self {
        Self { source_pos, ..*self }
    }

    pub fn with_dest_pos(&self, dest_pos: u64) -> Self {
        Self { dest_pos, ..*self }
    }

    pub fn params(&self) -> &'a ConsensusParams {
        self.validator.params()
    }

    pub fn program_context(&self) -> ProgramContext {
        ProgramContext {
            tx_id: self.tx.id,
            tx_version: self.tx.header.version,
            entry_id: self.entry_id,
            block_height: self.block.header.height,
        }
    }
}
