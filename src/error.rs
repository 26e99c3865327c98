//! Error types for transaction validation
//!
//! Every rejection is final for the transaction under evaluation. Errors are
//! `Clone` because the per-run memo cache replays a failed entry's result to
//! every later visitor.

use crate::types::{AssetAmount, AssetId, Hash};
use thiserror::Error;

/// Why a transaction (or the block holding it) was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("entry {0:?} not found")]
    MissingEntry(Hash),

    #[error("entry {id:?} is {found}, should be {expected}")]
    UnexpectedEntryType {
        id: Hash,
        found: &'static str,
        expected: &'static str,
    },

    #[error("invalid position {position} for {entry_type} with {slots} slot(s)")]
    Position {
        entry_type: &'static str,
        position: u64,
        slots: usize,
    },

    #[error("mismatched reference: expected {expected:?}, found {found:?}")]
    MismatchedReference { expected: Hash, found: Option<Hash> },

    #[error("mismatched value source/dest position: expected {expected}, found {found}")]
    MismatchedPosition { expected: u64, found: u64 },

    #[error("mismatched value: expected {expected}, found {found}")]
    MismatchedValue {
        expected: AssetAmount,
        found: AssetAmount,
    },

    #[error("mismatched asset id: computed {computed:?}, declared {declared:?}")]
    MismatchedAssetId { computed: AssetId, declared: AssetId },

    #[error("unbalanced asset {asset_id:?}: sources - destinations = {net} (should be 0)")]
    Unbalanced { asset_id: AssetId, net: i64 },

    #[error("mux destination {position} of asset {asset_id:?} has no corresponding source")]
    NoSource { asset_id: AssetId, position: usize },

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("gas usage calculation failed: {0}")]
    GasCalculation(&'static str),

    #[error("all gas credit has been spent")]
    OverGasCredit,

    #[error("transaction {0:?} never paid for its gas")]
    GasNotPaid(Hash),

    #[error("not standard transaction")]
    NotStandard,

    #[error("invalid transaction time range {time_range} at block height {height}")]
    BadTimeRange { time_range: u64, height: u64 },

    #[error("invalid transaction version {tx_version} for block version {block_version}")]
    TxVersion { block_version: u64, tx_version: u64 },

    #[error("invalid transaction size")]
    WrongTransactionSize,

    #[error("transaction has no results")]
    EmptyResults,

    #[error("wrong coinbase transaction")]
    WrongCoinbaseTransaction,

    #[error("wrong coinbase asset id {0:?}")]
    WrongCoinbaseAsset(AssetId),

    #[error("coinbase arbitrary size {size} is larger than limit {limit}")]
    CoinbaseArbitraryOversize { size: usize, limit: usize },

    #[error("program of entry {entry:?} failed: {source}")]
    Program {
        entry: Hash,
        #[source]
        source: ExecutionError,
    },

    #[error("peg-in witness rejected: {0}")]
    Pegin(#[from] PeginError),

    #[error("transaction {0:?} appears more than once in the block")]
    DuplicateTransaction(Hash),

    #[error("block gas used {used} exceeds limit {limit}")]
    BlockGasLimit { used: u64, limit: u64 },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Wrap this error with the path that reached it
    pub fn context(self, context: impl Into<String>) -> Self {
        ValidationError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every `Context` layer peeled off
    pub fn root(&self) -> &ValidationError {
        let mut err = self;
        while let ValidationError::Context { source, .. } = err {
            err = source;
        }
        err
    }
}

/// Attach context to the error of a `Result`
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T, ValidationError>;

    fn with_context<F, S>(self, f: F) -> Result<T, ValidationError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T, ValidationError> {
    fn context(self, context: impl Into<String>) -> Result<T, ValidationError> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F, S>(self, f: F) -> Result<T, ValidationError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

/// Failures of the peg-in claim verifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeginError {
    #[error("claim carries no usable peg-in witness")]
    NoWitness,

    #[error("peg-in witness has {0} elements, want 5")]
    WitnessLength(usize),

    #[error("invalid claimed amount {0:?}")]
    InvalidAmount(String),

    #[error("claimed amount {0} out of money range")]
    AmountOutOfRange(u64),

    #[error("malformed parent transaction: {0}")]
    ParentTransaction(String),

    #[error("malformed merkle block: {0}")]
    MerkleBlock(String),

    #[error("merkle block validation failed")]
    ProofValidation,

    #[error("parent transaction {0:?} is not among the proven transactions")]
    TransactionNotProven(Hash),

    #[error("parent output {position} out of range for {outputs} output(s)")]
    OutputIndex { position: u64, outputs: usize },

    #[error("claimed amount {claimed} does not match {found}")]
    AmountMismatch { claimed: u64, found: u64 },

    #[error("invalid claim script: {0}")]
    ClaimScript(String),

    #[error("parent output control program does not match the peg contract")]
    ControlProgramMismatch,

    #[error("malformed parent genesis hash {0:?}")]
    GenesisHash(String),

    #[error("parent genesis block hash {found:?} does not match {expected:?}")]
    GenesisMismatch { expected: Hash, found: Hash },

    #[error("parent block {height} is not confirmed {min_depth} deep")]
    NotConfirmed { height: u64, min_depth: u64 },

    #[error("confirmation oracle unavailable")]
    OracleUnavailable,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Failures reported by a `ProgramExecutor`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("out of gas (limit {limit})")]
    OutOfGas { limit: i64 },

    #[error("verification failed: {0}")]
    Failed(String),
}

/// Failures reported by a `ConfirmationOracle`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("parent chain query failed: {0}")]
    Query(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
