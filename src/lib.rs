//! This crate validates transactions of a UTXO-style side chain before they are
//! accepted into a block. A transaction is mapped into a graph of entries and
//! the graph is checked for value conservation, reference integrity, gas
//! payment and, for peg-in claims, a proof of deposit on the parent chain.

pub mod types; // Hashes, asset amounts, programs and value references.
pub mod error; // Error kinds of every validation layer.
pub mod graph; // Entries, transactions, blocks and their serialized forms.
pub mod gas; // Per-transaction gas accounting.
pub mod vm; // Program execution interface and standard script shapes.
pub mod consensus; // Chain parameters consulted during validation.
pub mod pegin; // Peg-in claim verification against the parent chain.
pub mod validation; // Transaction and block validation.
pub mod config; // Defines and loads validator configuration.

#[cfg(test)]
mod fixtures;

// Re-export commonly used types and configurations for easier access.
pub use config::Config;
pub use consensus::ConsensusParams;
pub use error::{ValidationError, ValidationResult};
pub use validation::Validator;
