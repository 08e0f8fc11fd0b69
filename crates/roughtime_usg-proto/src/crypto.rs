// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Ed25519 signature verification with the protocol's context strings.
//!
//! Thin wrappers over `ring`'s Ed25519: validity is strictly boolean and
//! there is no custom signature arithmetic here. Every signed blob is
//! prefixed with a NUL-terminated context string so a delegation can never
//! be replayed as a response or vice versa.

use alloc::vec::Vec;

use ring::signature;

use crate::error::ProtocolError;
use crate::types::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Context prefix for signatures over the DELE message, made by the
/// long-term root key.
pub const DELEGATION_CONTEXT: &[u8] = b"RoughTime v1 delegation signature--\0";

/// Context prefix for signatures over the SREP message, made by the
/// delegated key.
pub const RESPONSE_CONTEXT: &[u8] = b"RoughTime v1 response signature\0";

/// Verify `signature` over `context || message` under `public_key`.
fn verify_with_context(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    context: &'static [u8],
    message: &[u8],
    sig: &[u8; SIGNATURE_LENGTH],
) -> Result<(), ProtocolError> {
    let key = signature::UnparsedPublicKey::new(&signature::ED25519, public_key);

    let mut signed = Vec::with_capacity(context.len() + message.len());
    signed.extend_from_slice(context);
    signed.extend_from_slice(message);

    key.verify(&signed, sig)
        .map_err(|_| ProtocolError::SignatureInvalid)
}

/// Verify the delegation signature: the root key over
/// [`DELEGATION_CONTEXT`]` || dele_bytes`.
pub fn verify_delegation(
    root_public_key: &[u8; PUBLIC_KEY_LENGTH],
    dele_bytes: &[u8],
    sig: &[u8; SIGNATURE_LENGTH],
) -> Result<(), ProtocolError> {
    verify_with_context(root_public_key, DELEGATION_CONTEXT, dele_bytes, sig)
}

/// Verify the response signature: the delegated key over
/// [`RESPONSE_CONTEXT`]` || srep_bytes`.
pub fn verify_signed_response(
    delegated_public_key: &[u8; PUBLIC_KEY_LENGTH],
    srep_bytes: &[u8],
    sig: &[u8; SIGNATURE_LENGTH],
) -> Result<(), ProtocolError> {
    verify_with_context(delegated_public_key, RESPONSE_CONTEXT, srep_bytes, sig)
}
