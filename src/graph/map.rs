//! Transaction Mapping
//!
//! Turns the input/output form of a transaction into its entry graph:
//!
//! ```text
//!  input 0 ──┐               ┌── output 0
//!  input 1 ──┼──▶  mux  ──▶──┼── output 1
//!  input n ──┘               └── retirement (OP_FAIL program)
//! ```
//!
//! Mux source `i` is input `i` and mux destination `j` is result `j`. Spends,
//! claims and dpos inputs also get an `Output` entry describing the prior
//! output they consume.

use super::encoding::{WriteForHash, encode};
use super::entry::{
    AssetDefinition, Claim, Coinbase, Dpos, DposAction, Entry, Issuance, Mux, Output, Retirement,
    Spend, TxHeader,
};
use super::tx::Tx;
use crate::types::{AssetAmount, Hash, Program, ValueDestination, ValueSource, hash_bytes};
use crate::vm::{OP_TRUE, is_unspendable};
use ethers::types::Bytes;
use serde::{Deserialize, Serialize};

/// The prior output an input consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendCommitment {
    /// Entry that produced the prior output
    pub source_id: Hash,
    pub source_position: u64,
    pub asset_amount: AssetAmount,
    pub control_program: Program,
}

impl SpendCommitment {
    fn prevout(&self) -> Output {
        let source = ValueSource::new(self.source_id, self.asset_amount, self.source_position);
        // ordinal is irrelevant for prior outputs
        Output::new(source, self.control_program.clone(), 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TxInput {
    Spend {
        commitment: SpendCommitment,
        #[serde(default)]
        arguments: Vec<Bytes>,
    },
    Issuance {
        nonce: Bytes,
        asset_amount: AssetAmount,
        asset_definition: AssetDefinition,
        #[serde(default)]
        arguments: Vec<Bytes>,
    },
    Coinbase {
        #[serde(default)]
        arbitrary: Bytes,
    },
    Claim {
        commitment: SpendCommitment,
        pegin_witness: Vec<Bytes>,
        #[serde(default)]
        arguments: Vec<Bytes>,
    },
    Dpos {
        commitment: SpendCommitment,
        action: DposAction,
        from: String,
        to: String,
        stake: u64,
        #[serde(default)]
        data: Bytes,
        #[serde(default)]
        arguments: Vec<Bytes>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub asset_amount: AssetAmount,
    pub control_program: Program,
}

impl TxOutput {
    pub fn new(asset_amount: AssetAmount, control_program: impl Into<Vec<u8>>) -> Self {
        Self {
            asset_amount,
            control_program: Program::new(control_program),
        }
    }
}

/// Serialized form of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxData {
    pub version: u64,
    #[serde(default)]
    pub time_range: u64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

impl TxData {
    /// Length of the canonical encoding
    pub fn serialized_size(&self) -> u64 {
        encode(self).len() as u64
    }

    /// Build the entry graph of this transaction
    pub fn map_tx(&self) -> Tx {
        let mut entries = Vec::new();
        let mut inputs = Vec::with_capacity(self.inputs.len());
        let mut mux_sources = Vec::with_capacity(self.inputs.len());

        for (i, input) in self.inputs.iter().enumerate() {
            let ordinal = i as u64;
            let (entry, value) = match input {
                TxInput::Spend {
                    commitment,
                    arguments,
                } => {
                    let prevout = Entry::Output(commitment.prevout());
                    let spend = Spend {
                        spent_output_id: Some(prevout.id()),
                        ordinal,
                        witness_destination: None,
                        witness_arguments: arguments.clone(),
                    };
                    entries.push(prevout);
                    (Entry::Spend(spend), commitment.asset_amount)
                }
                TxInput::Issuance {
                    nonce,
                    asset_amount,
                    asset_definition,
                    arguments,
                } => {
                    let issuance = Issuance {
                        nonce_hash: hash_bytes(nonce),
                        value: *asset_amount,
                        ordinal,
                        witness_destination: None,
                        witness_asset_definition: asset_definition.clone(),
                        witness_arguments: arguments.clone(),
                    };
                    (Entry::Issuance(issuance), *asset_amount)
                }
                TxInput::Coinbase { arbitrary } => {
                    let coinbase = Coinbase {
                        arbitrary: arbitrary.clone(),
                        witness_destination: None,
                    };
                    // the reward is whatever the first output pays out
                    let value = self
                        .outputs
                        .first()
                        .map(|out| out.asset_amount)
                        .unwrap_or(AssetAmount::new(Hash::zero(), 0));
                    (Entry::Coinbase(coinbase), value)
                }
                TxInput::Claim {
                    commitment,
                    pegin_witness,
                    arguments,
                } => {
                    let prevout = Entry::Output(commitment.prevout());
                    let claim = Claim {
                        spent_output_id: Some(prevout.id()),
                        ordinal,
                        pegin_witness: pegin_witness.clone(),
                        witness_destination: None,
                        witness_arguments: arguments.clone(),
                    };
                    entries.push(prevout);
                    (Entry::Claim(claim), commitment.asset_amount)
                }
                TxInput::Dpos {
                    commitment,
                    action,
                    from,
                    to,
                    stake,
                    data,
                    arguments,
                } => {
                    let prevout = Entry::Output(commitment.prevout());
                    let dpos = Dpos {
                        spent_output_id: Some(prevout.id()),
                        ordinal,
                        action: *action,
                        from: from.clone(),
                        to: to.clone(),
                        stake: *stake,
                        data: data.clone(),
                        witness_destination: None,
                        witness_arguments: arguments.clone(),
                    };
                    entries.push(prevout);
                    (Entry::Dpos(dpos), commitment.asset_amount)
                }
            };
            mux_sources.push(ValueSource::new(entry.id(), value, 0));
            inputs.push((entry, value));
        }

        let mut mux = Mux {
            sources: mux_sources,
            program: Program::new(vec![OP_TRUE]),
            witness_destinations: Vec::with_capacity(self.outputs.len()),
            witness_arguments: Vec::new(),
        };
        let mux_id = Entry::Mux(mux.clone()).id();

        for (i, (mut entry, value)) in inputs.into_iter().enumerate() {
            set_witness_destination(&mut entry, ValueDestination::new(mux_id, value, i as u64));
            entries.push(entry);
        }

        let mut result_ids = Vec::with_capacity(self.outputs.len());
        for (j, out) in self.outputs.iter().enumerate() {
            let source = ValueSource::new(mux_id, out.asset_amount, j as u64);
            let result = if is_unspendable(&out.control_program.code) {
                Entry::Retirement(Retirement {
                    source: Some(source),
                    ordinal: j as u64,
                })
            } else {
                Entry::Output(Output::new(source, out.control_program.clone(), j as u64))
            };
            let result_id = result.id();
            mux.witness_destinations
                .push(ValueDestination::new(result_id, out.asset_amount, 0));
            result_ids.push(result_id);
            entries.push(result);
        }
        entries.push(Entry::Mux(mux));

        let header = TxHeader {
            version: self.version,
            serialized_size: self.serialized_size(),
            time_range: self.time_range,
            result_ids,
        };
        Tx::new(header, entries)
    }
}

fn set_witness_destination(entry: &mut Entry, dest: ValueDestination) {
    let slot = match entry {
        Entry::Issuance(e) => &mut e.witness_destination,
        Entry::Spend(e) => &mut e.witness_destination,
        Entry::Coinbase(e) => &mut e.witness_destination,
        Entry::Claim(e) => &mut e.witness_destination,
        Entry::Dpos(e) => &mut e.witness_destination,
        _ => return,
    };
    *slot = Some(dest);
}

impl WriteForHash for SpendCommitment {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        self.source_id.write_for_hash(w);
        self.source_position.write_for_hash(w);
        self.asset_amount.write_for_hash(w);
        self.control_program.write_for_hash(w);
    }
}

impl WriteForHash for TxInput {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        match self {
            TxInput::Issuance {
                nonce,
                asset_amount,
                asset_definition,
                arguments,
            } => {
                0u64.write_for_hash(w);
                nonce.write_for_hash(w);
                asset_amount.write_for_hash(w);
                asset_definition.data.write_for_hash(w);
                asset_definition.issuance_program.write_for_hash(w);
                arguments.write_for_hash(w);
            }
            TxInput::Spend {
                commitment,
                arguments,
            } => {
                1u64.write_for_hash(w);
                commitment.write_for_hash(w);
                arguments.write_for_hash(w);
            }
            TxInput::Coinbase { arbitrary } => {
                2u64.write_for_hash(w);
                arbitrary.write_for_hash(w);
            }
            TxInput::Claim {
                commitment,
                pegin_witness,
                arguments,
            } => {
                3u64.write_for_hash(w);
                commitment.write_for_hash(w);
                pegin_witness.write_for_hash(w);
                arguments.write_for_hash(w);
            }
            TxInput::Dpos {
                commitment,
                action,
                from,
                to,
                stake,
                data,
                arguments,
            } => {
                4u64.write_for_hash(w);
                commitment.write_for_hash(w);
                Bytes::from(format!("{action:?}:{from}:{to}").into_bytes()).write_for_hash(w);
                stake.write_for_hash(w);
                data.write_for_hash(w);
                arguments.write_for_hash(w);
            }
        }
    }
}

impl WriteForHash for TxOutput {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        self.asset_amount.write_for_hash(w);
        self.control_program.write_for_hash(w);
    }
}

impl WriteForHash for TxData {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        self.version.write_for_hash(w);
        self.time_range.write_for_hash(w);
        self.inputs.write_for_hash(w);
        self.outputs.write_for_hash(w);
    }
}
