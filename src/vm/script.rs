//! Control program forms
//!
//! Segregated-witness programs are a version byte followed by a single push:
//! `OP_0 OP_DATA_20 <pubkey hash>` (P2WPKH) or `OP_0 OP_DATA_32 <script hash>`
//! (P2WSH). Programs starting with `OP_FAIL` can never be satisfied and mark
//! retirements.

use sha2::{Digest, Sha256};

pub const OP_0: u8 = 0x00;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_32: u8 = 0x20;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_TRUE: u8 = 0x51;
pub const OP_FAIL: u8 = 0x6a;

const OP_DATA_75: u8 = 0x4b;

/// Peg contract body appended to the claimant's script: the federation
/// releases the deposit only to a transaction signed for the pushed claim
/// script (`OP_TXSIGHASH OP_SWAP OP_CHECKPREDICATE OP_VERIFY OP_TRUE`).
const PEGIN_CONTRACT_BODY: [u8; 5] = [0xae, 0x7c, 0xc0, 0x69, OP_TRUE];

pub fn is_p2wpkh_script(prog: &[u8]) -> bool {
    prog.len() == 22 && prog[0] == OP_0 && prog[1] == OP_DATA_20
}

pub fn is_p2wsh_script(prog: &[u8]) -> bool {
    prog.len() == 34 && prog[0] == OP_0 && prog[1] == OP_DATA_32
}

/// Whether `prog` is one of the recognised segregated-witness forms
pub fn is_p2w_script(prog: &[u8]) -> bool {
    is_p2wpkh_script(prog) || is_p2wsh_script(prog)
}

pub fn is_unspendable(prog: &[u8]) -> bool {
    prog.first() == Some(&OP_FAIL)
}

pub fn p2wpkh_program(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut prog = Vec::with_capacity(22);
    prog.push(OP_0);
    prog.push(OP_DATA_20);
    prog.extend_from_slice(pubkey_hash);
    prog
}

pub fn p2wsh_program(script_hash: &[u8; 32]) -> Vec<u8> {
    let mut prog = Vec::with_capacity(34);
    prog.push(OP_0);
    prog.push(OP_DATA_32);
    prog.extend_from_slice(script_hash);
    prog
}

/// Minimal push of `data`, or `None` when it is too long for `OP_PUSHDATA2`
pub fn push_data(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() + 3);
    match data.len() {
        n if n <= OP_DATA_75 as usize => out.push(n as u8),
        n if n <= u8::MAX as usize => {
            out.push(OP_PUSHDATA1);
            out.push(n as u8);
        }
        n if n <= u16::MAX as usize => {
            out.push(OP_PUSHDATA2);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        _ => return None,
    }
    out.extend_from_slice(data);
    Some(out)
}

/// The program a genuine peg-in deposit for `claim_script` locks value with:
/// the peg contract instantiated with the claim script, wrapped as P2WSH.
pub fn pegin_contract_program(claim_script: &[u8]) -> Result<Vec<u8>, String> {
    if claim_script.is_empty() {
        return Err("empty claim script".to_string());
    }
    let mut contract =
        push_data(claim_script).ok_or_else(|| format!("claim script of {} bytes", claim_script.len()))?;
    contract.extend_from_slice(&PEGIN_CONTRACT_BODY);

    let script_hash: [u8; 32] = Sha256::digest(&contract).into();
    Ok(p2wsh_program(&script_hash))
}
