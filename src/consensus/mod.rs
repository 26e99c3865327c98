//! Consensus Parameters Module
//!
//! Read-only chain parameters shared by every validation run. They are built
//! once at start-up (usually from `Config`) and handed to the `Validator`
//! behind an `Arc`; nothing mutates them afterwards.

mod params;

pub use params::{ConsensusParams, native_asset_id};
