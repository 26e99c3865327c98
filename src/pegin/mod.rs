//! Peg-in Claim Module
//!
//! Verifies that a claim redeems value genuinely locked on the parent chain.
//! The claim's witness carries the parent transaction and a partial merkle
//! tree proving it was included in a parent block; the parent output must
//! pay the claimed amount to the peg contract derived from the claim script.

pub mod merkle;
mod oracle;
mod parent;
mod verify;
mod witness;


pub use oracle::{ConfirmationOracle, TipHeightOracle};
pub use parent::{MerkleBlock, ParentBlockHeader, ParentOutput, ParentTransaction};
pub use verify::verify_pegin_witness;
pub use witness::{PEGIN_WITNESS_LEN, PeginWitness};
