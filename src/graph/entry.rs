//! Transaction Entries
//!
//! A transaction is a DAG of typed entries linked by value sources and value
//! destinations. Each entry's id is the hash of its canonical body. Witness
//! fields (destinations, arguments, peg-in witness, asset definition) are left
//! out of the body, which is what lets an entry point back at an entry whose id
//! already depends on it.

use super::encoding::{WriteForHash, entry_id};
use crate::types::{AssetAmount, AssetId, Hash, Program, ValueDestination, ValueSource, hash_bytes};
use ethers::types::Bytes;
use serde::{Deserialize, Serialize};

/// Root of the graph. Its id is the transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHeader {
    pub version: u64,
    pub serialized_size: u64,
    pub time_range: u64,
    pub result_ids: Vec<Hash>,
}

/// Aggregates every input and splits the total across every result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mux {
    pub sources: Vec<ValueSource>,
    pub program: Program,
    pub witness_destinations: Vec<ValueDestination>,
    pub witness_arguments: Vec<Bytes>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub source: Option<ValueSource>,
    pub control_program: Program,
    pub ordinal: u64,
}

/// Provable burn: an output nobody can spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retirement {
    pub source: Option<ValueSource>,
    pub ordinal: u64,
}

/// The data an asset id commits to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub data: Hash,
    pub issuance_program: Program,
}

impl AssetDefinition {
    pub fn compute_asset_id(&self) -> AssetId {
        let mut buf = b"assetid:".to_vec();
        self.data.write_for_hash(&mut buf);
        self.issuance_program.write_for_hash(&mut buf);
        hash_bytes(&buf)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuance {
    pub nonce_hash: Hash,
    pub value: AssetAmount,
    pub ordinal: u64,
    pub witness_destination: Option<ValueDestination>,
    pub witness_asset_definition: AssetDefinition,
    pub witness_arguments: Vec<Bytes>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spend {
    pub spent_output_id: Option<Hash>,
    pub ordinal: u64,
    pub witness_destination: Option<ValueDestination>,
    pub witness_arguments: Vec<Bytes>,
}

/// Block reward issuance; only valid as the first transaction of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coinbase {
    pub arbitrary: Bytes,
    pub witness_destination: Option<ValueDestination>,
}

/// Redeems value locked on the parent chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub spent_output_id: Option<Hash>,
    pub ordinal: u64,
    pub pegin_witness: Vec<Bytes>,
    pub witness_destination: Option<ValueDestination>,
    pub witness_arguments: Vec<Bytes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DposAction {
    RegisterDelegate,
    Vote,
    CancelVote,
}

impl DposAction {
    fn code(self) -> u64 {
        match self {
            DposAction::RegisterDelegate => 0,
            DposAction::Vote => 1,
            DposAction::CancelVote => 2,
        }
    }
}

/// Delegate and vote bookkeeping. Carries no transferable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dpos {
    pub spent_output_id: Option<Hash>,
    pub ordinal: u64,
    pub action: DposAction,
    pub from: String,
    pub to: String,
    pub stake: u64,
    pub data: Bytes,
    pub witness_destination: Option<ValueDestination>,
    pub witness_arguments: Vec<Bytes>,
}

/// One node of the transaction graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    TxHeader(TxHeader),
    Mux(Mux),
    Output(Output),
    Retirement(Retirement),
    Issuance(Issuance),
    Spend(Spend),
    Coinbase(Coinbase),
    Claim(Claim),
    Dpos(Dpos),
}

impl Entry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Entry::TxHeader(_) => "txheader",
            Entry::Mux(_) => "mux1",
            Entry::Output(_) => "output1",
            Entry::Retirement(_) => "retirement1",
            Entry::Issuance(_) => "issuance1",
            Entry::Spend(_) => "spend1",
            Entry::Coinbase(_) => "coinbase1",
            Entry::Claim(_) => "claim1",
            Entry::Dpos(_) => "dpos1",
        }
    }

    pub fn id(&self) -> Hash {
        let mut body = Vec::new();
        self.write_body(&mut body);
        entry_id(self.type_name(), &body)
    }

    /// Canonical body, excluding witness fields
    fn write_body(&self, w: &mut Vec<u8>) {
        match self {
            Entry::TxHeader(h) => {
                h.version.write_for_hash(w);
                h.time_range.write_for_hash(w);
                h.result_ids.write_for_hash(w);
            }
            Entry::Mux(m) => {
                m.sources.write_for_hash(w);
                m.program.write_for_hash(w);
            }
            Entry::Output(o) => {
                o.source.write_for_hash(w);
                o.control_program.write_for_hash(w);
                o.ordinal.write_for_hash(w);
            }
            Entry::Retirement(r) => {
                r.source.write_for_hash(w);
                r.ordinal.write_for_hash(w);
            }
            Entry::Issuance(i) => {
                i.nonce_hash.write_for_hash(w);
                i.value.write_for_hash(w);
                i.ordinal.write_for_hash(w);
            }
            Entry::Spend(s) => {
                s.spent_output_id.write_for_hash(w);
                s.ordinal.write_for_hash(w);
            }
            Entry::Coinbase(c) => {
                c.arbitrary.write_for_hash(w);
            }
            Entry::Claim(c) => {
                c.spent_output_id.write_for_hash(w);
                c.ordinal.write_for_hash(w);
            }
            Entry::Dpos(d) => {
                d.spent_output_id.write_for_hash(w);
                d.ordinal.write_for_hash(w);
                d.action.code().write_for_hash(w);
                Bytes::from(d.from.as_bytes().to_vec()).write_for_hash(w);
                Bytes::from(d.to.as_bytes().to_vec()).write_for_hash(w);
                d.stake.write_for_hash(w);
                d.data.write_for_hash(w);
            }
        }
    }

    /// The single outgoing destination of an input-like entry
    pub fn witness_destination(&self) -> Option<&ValueDestination> {
        match self {
            Entry::Issuance(e) => e.witness_destination.as_ref(),
            Entry::Spend(e) => e.witness_destination.as_ref(),
            Entry::Coinbase(e) => e.witness_destination.as_ref(),
            Entry::Claim(e) => e.witness_destination.as_ref(),
            Entry::Dpos(e) => e.witness_destination.as_ref(),
            _ => None,
        }
    }
}

impl Output {
    pub fn new(source: ValueSource, control_program: Program, ordinal: u64) -> Self {
        Self {
            source: Some(source),
            control_program,
            ordinal,
        }
    }

    pub fn id(&self) -> Hash {
        Entry::Output(self.clone()).id()
    }
}
