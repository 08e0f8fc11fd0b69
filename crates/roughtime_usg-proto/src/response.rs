// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The response validation pipeline.
//!
//! Verification runs as a fixed sequence, terminal on the first failure:
//!
//! 1. Decode the outer message.
//! 2. Extract every required field (SIG, INDX, PATH, SREP→{ROOT, MIDP,
//!    RADI}, CERT→{SIG, DELE→{PUBK, MINT, MAXT}}).
//! 3. Recompute the Merkle root from the request nonce and check inclusion.
//! 4. Verify the delegation signature under the root key, then the response
//!    signature under the delegated key, then the delegation window
//!    MINT ≤ MIDP ≤ MAXT.
//! 5. Decode the midpoint and reject implausible dates.
//!
//! There is no partial credit: a response that fails any step yields no
//! trustworthy fields at all.

use crate::crypto;
use crate::error::ProtocolError;
use crate::merkle;
use crate::timestamp::MjdTimestamp;
use crate::types::{
    HASH_LENGTH, NONCE_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, Tag, VerifiedTime, read_array,
    read_u32, read_u64, tags,
};
use crate::wire::Message;

/// Every field a response must carry, borrowed from the raw buffer.
struct ResponseFields<'a> {
    response_sig: &'a [u8; SIGNATURE_LENGTH],
    index: u32,
    path: &'a [u8],
    srep_bytes: &'a [u8],
    root: &'a [u8; HASH_LENGTH],
    midpoint: u64,
    radius: u32,
    dele_bytes: &'a [u8],
    cert_sig: &'a [u8; SIGNATURE_LENGTH],
    delegated_key: &'a [u8; PUBLIC_KEY_LENGTH],
    min_time: u64,
    max_time: u64,
}

fn extract_fields<'a>(outer: &Message<'a>) -> Result<ResponseFields<'a>, ProtocolError> {
    let response_sig = fixed::<SIGNATURE_LENGTH>(outer, tags::SIG)?;
    let index = read_u32(outer.require(tags::INDX)?, tags::INDX)?;
    let path = outer.require(tags::PATH)?;

    let srep_bytes = outer.require(tags::SREP)?;
    let srep = outer.nested(tags::SREP)?;
    let root = fixed::<HASH_LENGTH>(&srep, tags::ROOT)?;
    let midpoint = read_u64(srep.require(tags::MIDP)?, tags::MIDP)?;
    let radius = read_u32(srep.require(tags::RADI)?, tags::RADI)?;

    let cert = outer.nested(tags::CERT)?;
    let dele_bytes = cert.require(tags::DELE)?;
    let cert_sig = fixed::<SIGNATURE_LENGTH>(&cert, tags::SIG)?;
    let dele = cert.nested(tags::DELE)?;
    let delegated_key = fixed::<PUBLIC_KEY_LENGTH>(&dele, tags::PUBK)?;
    let min_time = read_u64(dele.require(tags::MINT)?, tags::MINT)?;
    let max_time = read_u64(dele.require(tags::MAXT)?, tags::MAXT)?;

    Ok(ResponseFields {
        response_sig,
        index,
        path,
        srep_bytes,
        root,
        midpoint,
        radius,
        dele_bytes,
        cert_sig,
        delegated_key,
        min_time,
        max_time,
    })
}

fn fixed<'a, const N: usize>(msg: &Message<'a>, tag: Tag) -> Result<&'a [u8; N], ProtocolError> {
    read_array(msg.require(tag)?, tag)
}

/// Verify a raw response against the request nonce and the server's
/// long-term root public key.
///
/// The root key only ever certifies delegations; the response itself is
/// signed by the delegated key carried (and certified) inside CERT.
pub fn verify_response(
    response: &[u8],
    nonce: &[u8; NONCE_LENGTH],
    root_public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> Result<VerifiedTime, ProtocolError> {
    let outer = Message::decode(response)?;
    let fields = extract_fields(&outer)?;

    merkle::verify(nonce, fields.root, fields.path, fields.index)?;

    crypto::verify_delegation(root_public_key, fields.dele_bytes, fields.cert_sig)?;
    crypto::verify_signed_response(fields.delegated_key, fields.srep_bytes, fields.response_sig)?;
    if fields.midpoint < fields.min_time || fields.midpoint > fields.max_time {
        return Err(ProtocolError::DelegationWindowExceeded);
    }

    let midpoint = MjdTimestamp::from_packed(fields.midpoint);
    if !midpoint.is_plausible() {
        return Err(ProtocolError::ImplausibleTimestamp {
            mjd: midpoint.mjd(),
        });
    }

    Ok(VerifiedTime {
        midpoint_micros: midpoint.epoch_micros() as u64,
        radius_micros: fields.radius,
    })
}
