//! Gas Metering Module
//!
//! Tracks the per-transaction gas budget. Gas is bought by the net amount of
//! the native asset a transaction leaves in its mux, so fee payment rides on
//! the same value-conservation graph as every other asset.

mod state;

pub use state::GasState;
