// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request construction: nonce generation and `PAD`-padded encoding.
//!
//! A request carries exactly three tags (`PAD`, `VER`, `NONC`) and is
//! padded with zero bytes in the `PAD` value so the encoding lands exactly on
//! [`MIN_REQUEST_SIZE`]. The padding makes requests at least as large as
//! responses, which keeps the protocol useless as a UDP amplifier.

use alloc::vec;
use alloc::vec::Vec;

use crate::types::{MIN_REQUEST_SIZE, NONCE_LENGTH, VERSION, tags};
use crate::wire::{MessageBuilder, header_len};

/// Zero padding needed so PAD + VER + NONC encode to [`MIN_REQUEST_SIZE`].
const PAD_LENGTH: usize =
    MIN_REQUEST_SIZE - header_len(3) - core::mem::size_of::<u32>() - NONCE_LENGTH;

/// Build a request with a freshly generated random nonce.
///
/// Returns the encoded request and the nonce, which the caller must keep to
/// verify the response. Each exchange needs its own nonce; retries are new
/// exchanges starting from here.
#[cfg(feature = "std")]
pub fn build_request() -> (Vec<u8>, [u8; NONCE_LENGTH]) {
    let mut nonce = [0u8; NONCE_LENGTH];
    rand::fill(&mut nonce);
    (build_request_with_nonce(&nonce), nonce)
}

/// Build a request around a caller-supplied nonce.
pub fn build_request_with_nonce(nonce: &[u8; NONCE_LENGTH]) -> Vec<u8> {
    // Sorted by LE tag value: PAD (0x00444150) < VER (0x00524556)
    // < NONC (0x434e4f4e).
    let padding = vec![0u8; PAD_LENGTH];
    let mut builder = MessageBuilder::new();
    builder
        .add(tags::PAD, &padding)
        .add(tags::VER, &VERSION.to_le_bytes())
        .add(tags::NONC, nonce);
    let request = builder.finish();
    debug_assert_eq!(request.len(), MIN_REQUEST_SIZE);
    request
}
