//! Builders shared by the test modules

use crate::consensus::{ConsensusParams, native_asset_id};
use crate::graph::{Output, SpendCommitment};
use crate::pegin::merkle::{build_proof, tx_merkle_root};
use crate::pegin::{MerkleBlock, ParentBlockHeader, ParentOutput, ParentTransaction};
use crate::types::{AssetAmount, Hash, Program, ValueSource};
use crate::vm::{p2wpkh_program, pegin_contract_program};
use ethers::types::Bytes;

pub const CLAIM_SCRIPT: &[u8] = b"claimant pubkey hash";
pub const PARENT_HEIGHT: u64 = 10;
/// Index of the deposit among the parent transaction's outputs
pub const DEPOSIT_POSITION: u64 = 1;

pub fn parent_genesis() -> Hash {
    Hash::repeat_byte(0xab)
}

pub fn pegin_params() -> ConsensusParams {
    ConsensusParams {
        parent_genesis_hash: parent_genesis(),
        ..ConsensusParams::default()
    }
}

/// The pieces of a well-formed peg-in claim, kept separate so tests can
/// corrupt one of them and re-encode the stack.
#[derive(Debug, Clone)]
pub struct PeginFixture {
    pub amount: Vec<u8>,
    pub genesis: Vec<u8>,
    pub claim_script: Vec<u8>,
    pub parent_tx: ParentTransaction,
    pub merkle_block: MerkleBlock,
    pub commitment: SpendCommitment,
}

impl PeginFixture {
    pub fn new(amount: u64) -> Self {
        let deposit_program = pegin_contract_program(CLAIM_SCRIPT).unwrap();
        let parent_tx = ParentTransaction {
            version: 1,
            inputs: vec![Hash::repeat_byte(7)],
            outputs: vec![
                ParentOutput {
                    asset_id: native_asset_id(),
                    amount: 5,
                    control_program: Bytes::from(p2wpkh_program(&[4; 20])),
                },
                ParentOutput {
                    asset_id: native_asset_id(),
                    amount,
                    control_program: Bytes::from(deposit_program),
                },
            ],
        };
        let parent_id = parent_tx.id();
        let block_txs = vec![
            Hash::repeat_byte(0x11),
            Hash::repeat_byte(0x12),
            parent_id,
            Hash::repeat_byte(0x13),
            Hash::repeat_byte(0x14),
        ];

        Self {
            amount: amount.to_string().into_bytes(),
            genesis: format!("{:?}", parent_genesis()).into_bytes(),
            claim_script: CLAIM_SCRIPT.to_vec(),
            merkle_block: merkle_block_for(&block_txs, &[parent_id]),
            commitment: SpendCommitment {
                source_id: parent_id,
                source_position: DEPOSIT_POSITION,
                asset_amount: AssetAmount::new(native_asset_id(), amount),
                control_program: Program::new(p2wpkh_program(&[9; 20])),
            },
            parent_tx,
        }
    }

    pub fn stack(&self) -> Vec<Bytes> {
        vec![
            Bytes::from(self.amount.clone()),
            Bytes::from(self.genesis.clone()),
            Bytes::from(self.claim_script.clone()),
            Bytes::from(serde_json::to_vec(&self.parent_tx).unwrap()),
            Bytes::from(serde_json::to_vec(&self.merkle_block).unwrap()),
        ]
    }

    /// The output entry a claim built from this fixture redeems
    pub fn prevout(&self) -> Output {
        let source = ValueSource::new(
            self.commitment.source_id,
            self.commitment.asset_amount,
            self.commitment.source_position,
        );
        Output::new(source, self.commitment.control_program.clone(), 0)
    }
}

pub fn merkle_block_for(block_txs: &[Hash], matched: &[Hash]) -> MerkleBlock {
    let (tx_hashes, flags) = build_proof(block_txs, matched);
    MerkleBlock {
        block_header: ParentBlockHeader {
            version: 1,
            height: PARENT_HEIGHT,
            previous_block_hash: Hash::repeat_byte(0x22),
            timestamp: 1_528_945_000,
            transactions_merkle_root: tx_merkle_root(block_txs),
        },
        tx_hashes,
        flags,
        matched_tx_ids: matched.to_vec(),
    }
}
