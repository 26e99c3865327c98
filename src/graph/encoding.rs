//! Canonical Encoding
//!
//! Deterministic byte encoding of entry bodies. Entry ids and asset ids are
//! hashes of this encoding, and a transaction's serialized size is the length
//! of its encoding, so every node must produce exactly the same bytes.
//!
//! Integers are 8-byte little endian, byte strings and lists carry an 8-byte
//! length prefix, optional values carry a one-byte presence tag.

use crate::types::{AssetAmount, Hash, Program, ValueDestination, ValueSource, hash_bytes};
use ethers::types::Bytes;

pub trait WriteForHash {
    fn write_for_hash(&self, w: &mut Vec<u8>);
}

impl WriteForHash for u64 {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        w.extend_from_slice(&self.to_le_bytes());
    }
}

impl WriteForHash for bool {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        w.push(u8::from(*self));
    }
}

impl WriteForHash for Hash {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        w.extend_from_slice(self.as_bytes());
    }
}

impl WriteForHash for Bytes {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        write_bytes(w, self);
    }
}

impl WriteForHash for AssetAmount {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        self.asset_id.write_for_hash(w);
        self.amount.write_for_hash(w);
    }
}

impl WriteForHash for Program {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        self.vm_version.write_for_hash(w);
        self.code.write_for_hash(w);
    }
}

impl WriteForHash for ValueSource {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        self.source_ref.write_for_hash(w);
        self.value.write_for_hash(w);
        self.position.write_for_hash(w);
    }
}

impl WriteForHash for ValueDestination {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        self.dest_ref.write_for_hash(w);
        self.value.write_for_hash(w);
        self.position.write_for_hash(w);
    }
}

impl<T: WriteForHash> WriteForHash for Option<T> {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        match self {
            Some(v) => {
                w.push(1);
                v.write_for_hash(w);
            }
            None => w.push(0),
        }
    }
}

impl<T: WriteForHash> WriteForHash for Vec<T> {
    fn write_for_hash(&self, w: &mut Vec<u8>) {
        (self.len() as u64).write_for_hash(w);
        for item in self {
            item.write_for_hash(w);
        }
    }
}

pub fn write_bytes(w: &mut Vec<u8>, data: &[u8]) {
    (data.len() as u64).write_for_hash(w);
    w.extend_from_slice(data);
}

/// Encode a value into a fresh buffer
pub fn encode<T: WriteForHash + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.write_for_hash(&mut buf);
    buf
}

/// `hash("entryid:" || type || ":" || hash(body))`
pub fn entry_id(type_name: &str, body: &[u8]) -> Hash {
    let inner = hash_bytes(body);
    let mut buf = Vec::with_capacity(8 + type_name.len() + 1 + 32);
    buf.extend_from_slice(b"entryid:");
    buf.extend_from_slice(type_name.as_bytes());
    buf.push(b':');
    buf.extend_from_slice(inner.as_bytes());
    hash_bytes(&buf)
}
