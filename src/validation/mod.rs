//! Transaction Validation Module
//!
//! This module decides whether a transaction, expressed as an entry graph,
//! is valid within its enclosing block. It walks the graph from the header,
//! checks that value is conserved at the mux, that every value link agrees
//! on both ends, that programs run within the gas budget and that peg-in
//! claims are backed by a proof from the parent chain.

mod block;
mod context;
mod entry;
mod reference;
mod standard;
mod validator;

#[cfg(test)]
mod tests;

pub use block::{BlockOutcome, TxOutcome};
pub use standard::check_standard_tx;
pub use validator::Validator;
