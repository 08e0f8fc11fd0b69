// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Merkle inclusion-proof verification.
//!
//! The server batches concurrent requests into a Merkle tree of nonces and
//! signs only the root. Each response carries the client's leaf index and the
//! sibling hashes from leaf to root; recomputing the root from the request
//! nonce proves the nonce was covered by the signature.
//!
//! Hashing is SHA-512 truncated to 32 bytes, domain-separated so a leaf can
//! never be confused with an interior node:
//!
//! - leaf: `SHA-512(0x00 || nonce)[..32]`
//! - node: `SHA-512(0x01 || left || right)[..32]`

use ring::digest;

use crate::error::ProtocolError;
use crate::types::{HASH_LENGTH, NONCE_LENGTH};

const LEAF_PREFIX: [u8; 1] = [0x00];
const NODE_PREFIX: [u8; 1] = [0x01];

fn truncated_sha512(parts: &[&[u8]]) -> [u8; HASH_LENGTH] {
    let mut ctx = digest::Context::new(&digest::SHA512);
    for part in parts {
        ctx.update(part);
    }
    let full = ctx.finish();
    let mut out = [0u8; HASH_LENGTH];
    out.copy_from_slice(&full.as_ref()[..HASH_LENGTH]);
    out
}

/// Hash a request nonce into its Merkle leaf.
pub fn hash_leaf(nonce: &[u8; NONCE_LENGTH]) -> [u8; HASH_LENGTH] {
    truncated_sha512(&[&LEAF_PREFIX, nonce])
}

/// Hash two child hashes into their parent node.
pub fn hash_node(left: &[u8; HASH_LENGTH], right: &[u8; HASH_LENGTH]) -> [u8; HASH_LENGTH] {
    truncated_sha512(&[&NODE_PREFIX, left, right])
}

/// Verify that `nonce` is included in the tree with the given root.
///
/// `path` holds the sibling hashes from leaf level upward; bit `i` of
/// `index` selects which side the running hash takes at level `i` (0 = left).
/// An empty path is a single-leaf tree, in which case the root must equal the
/// leaf hash itself.
///
/// The final comparison need not be constant-time: the root is itself
/// authenticated by the response signature.
pub fn verify(
    nonce: &[u8; NONCE_LENGTH],
    claimed_root: &[u8; HASH_LENGTH],
    path: &[u8],
    index: u32,
) -> Result<(), ProtocolError> {
    if path.len() % HASH_LENGTH != 0 {
        return Err(ProtocolError::MerkleMismatch);
    }

    let mut current = hash_leaf(nonce);
    let mut index = index;

    for sibling in path.chunks_exact(HASH_LENGTH) {
        let mut sib = [0u8; HASH_LENGTH];
        sib.copy_from_slice(sibling);
        current = if index & 1 == 0 {
            hash_node(&current, &sib)
        } else {
            hash_node(&sib, &current)
        };
        index >>= 1;
    }

    if current != *claimed_root {
        return Err(ProtocolError::MerkleMismatch);
    }
    Ok(())
}
