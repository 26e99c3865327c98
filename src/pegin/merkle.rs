//! Transaction Merkle Proofs
//!
//! Transaction roots use the RFC 6962 tree shape: a list of `n > 1` ids is
//! split at the largest power of two below `n`. Leaves and interior nodes are
//! domain separated (`0x00 || id`, `0x01 || left || right`).
//!
//! A proof is a pre-order walk of the pruned tree. Each node contributes one
//! flag and, for leaves and pruned subtrees, one hash:
//!
//! | flag | node | hash consumed |
//! |------|------|---------------|
//! | 0 | pruned subtree | its root |
//! | 1 | interior node | none, both children follow |
//! | 2 | matched transaction | the transaction id |

use crate::types::{Hash, hash_bytes};
use std::collections::HashSet;

pub const FLAG_ASSIST: u8 = 0;
pub const FLAG_TX_PARENT: u8 = 1;
pub const FLAG_TX_LEAF: u8 = 2;

// deep enough for any tree of u64-indexed leaves
const MAX_DEPTH: usize = 64;

pub fn leaf_hash(tx_id: &Hash) -> Hash {
    let mut buf = Vec::with_capacity(33);
    buf.push(0x00);
    buf.extend_from_slice(tx_id.as_bytes());
    hash_bytes(&buf)
}

pub fn interior_hash(left: &Hash, right: &Hash) -> Hash {
    let mut buf = Vec::with_capacity(65);
    buf.push(0x01);
    buf.extend_from_slice(left.as_bytes());
    buf.extend_from_slice(right.as_bytes());
    hash_bytes(&buf)
}

fn split_point(n: usize) -> usize {
    1 << (usize::BITS - (n - 1).leading_zeros() - 1)
}

/// Root committing to `tx_ids` in order
pub fn tx_merkle_root(tx_ids: &[Hash]) -> Hash {
    match tx_ids.len() {
        0 => hash_bytes(&[]),
        1 => leaf_hash(&tx_ids[0]),
        n => {
            let k = split_point(n);
            interior_hash(&tx_merkle_root(&tx_ids[..k]), &tx_merkle_root(&tx_ids[k..]))
        }
    }
}

/// Proof hashes and flags that `matched` (a subset of `tx_ids`) is
/// committed to by `tx_merkle_root(tx_ids)`.
pub fn build_proof(tx_ids: &[Hash], matched: &[Hash]) -> (Vec<Hash>, Vec<u8>) {
    let matched: HashSet<Hash> = matched.iter().copied().collect();
    let mut hashes = Vec::new();
    let mut flags = Vec::new();
    if !tx_ids.is_empty() {
        build_node(tx_ids, &matched, &mut hashes, &mut flags);
    }
    (hashes, flags)
}

fn build_node(ids: &[Hash], matched: &HashSet<Hash>, hashes: &mut Vec<Hash>, flags: &mut Vec<u8>) {
    if ids.len() == 1 {
        if matched.contains(&ids[0]) {
            flags.push(FLAG_TX_LEAF);
            hashes.push(ids[0]);
        } else {
            flags.push(FLAG_ASSIST);
            hashes.push(leaf_hash(&ids[0]));
        }
        return;
    }
    if !ids.iter().any(|id| matched.contains(id)) {
        flags.push(FLAG_ASSIST);
        hashes.push(tx_merkle_root(ids));
        return;
    }
    flags.push(FLAG_TX_PARENT);
    let k = split_point(ids.len());
    build_node(&ids[..k], matched, hashes, flags);
    build_node(&ids[k..], matched, hashes, flags);
}

/// Check that `hashes`/`flags` rebuild `merkle_root` and that the matched
/// leaves are exactly `matched_tx_ids`, in order. Every hash and flag must be
/// consumed.
pub fn validate_tx_merkle_proof(
    hashes: &[Hash],
    flags: &[u8],
    matched_tx_ids: &[Hash],
    merkle_root: &Hash,
) -> bool {
    if matched_tx_ids.is_empty() {
        return false;
    }

    let mut hash_iter = hashes.iter();
    let mut flag_iter = flags.iter();
    let mut leaves = Vec::new();
    let Some(root) = rebuild(&mut hash_iter, &mut flag_iter, &mut leaves, 0) else {
        return false;
    };

    hash_iter.next().is_none()
        && flag_iter.next().is_none()
        && root == *merkle_root
        && leaves == matched_tx_ids
}

fn rebuild<'a>(
    hashes: &mut impl Iterator<Item = &'a Hash>,
    flags: &mut impl Iterator<Item = &'a u8>,
    leaves: &mut Vec<Hash>,
    depth: usize,
) -> Option<Hash> {
    match *flags.next()? {
        FLAG_ASSIST => hashes.next().copied(),
        FLAG_TX_PARENT => {
            if depth >= MAX_DEPTH {
                return None;
            }
            let left = rebuild(hashes, flags, leaves, depth + 1)?;
            let right = rebuild(hashes, flags, leaves, depth + 1)?;
            Some(interior_hash(&left, &right))
        }
        FLAG_TX_LEAF => {
            let tx_id = *hashes.next()?;
            leaves.push(tx_id);
            Some(leaf_hash(&tx_id))
        }
        _ => None,
    }
}
