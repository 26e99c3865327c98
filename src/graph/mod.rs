//! Entry Graph Module
//!
//! The data model the validator walks: typed entries, the transaction that
//! owns them, the block that orders transactions, and the mapping from the
//! serialized input/output form into the graph.

mod block;
pub mod encoding;
mod entry;
mod map;
mod tx;

pub use block::{Block, BlockData, BlockHeader};
pub use entry::{
    AssetDefinition, Claim, Coinbase, Dpos, DposAction, Entry, Issuance, Mux, Output, Retirement,
    Spend, TxHeader,
};
pub use map::{SpendCommitment, TxData, TxInput, TxOutput};
pub use tx::Tx;
