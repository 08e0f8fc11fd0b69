// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Base64 decoding for operator-supplied keys and nonces.
//!
//! Roughtime root keys are conventionally distributed base64-encoded. The
//! inputs here are a single 32-byte value each, so a minimal local decoder is
//! used rather than pulling in a base64 dependency.

use std::io;

use roughtime_proto::types::{NONCE_LENGTH, PUBLIC_KEY_LENGTH};

/// Decode a base64-encoded Ed25519 root public key (32 bytes).
///
/// Wrong-length input is a caller error and maps to
/// [`io::ErrorKind::InvalidInput`].
///
/// # Examples
///
/// ```
/// let pk = roughtime_client::decode_public_key(
///     "AW5uAoTSTDfG5NfY1bTh08GUnOqlRb+HVhbJ3ODJvsE="
/// ).unwrap();
/// assert_eq!(pk.len(), 32);
/// ```
pub fn decode_public_key(base64_key: &str) -> io::Result<[u8; PUBLIC_KEY_LENGTH]> {
    decode_exact(base64_key, "public key")
}

/// Decode a base64-encoded 32-byte nonce override.
pub fn decode_nonce(base64_nonce: &str) -> io::Result<[u8; NONCE_LENGTH]> {
    decode_exact(base64_nonce, "nonce")
}

fn decode_exact<const N: usize>(input: &str, what: &str) -> io::Result<[u8; N]> {
    let bytes = base64_decode(input).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid base64 {what}: {e}"),
        )
    })?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{what} must be {N} bytes, got {len} after base64 decoding"),
        )
    })
}

// ── Minimal base64 decoder ──────────────────────────────────────────

fn base64_decode(input: &str) -> Result<Vec<u8>, &'static str> {
    let input = input.trim_end_matches('=');
    let mut out = Vec::with_capacity(input.len() * 3 / 4);
    let mut buf = 0u32;
    let mut bits = 0u32;

    for ch in input.bytes() {
        let val = match ch {
            b'A'..=b'Z' => ch - b'A',
            b'a'..=b'z' => ch - b'a' + 26,
            b'0'..=b'9' => ch - b'0' + 52,
            b'+' => 62,
            b'/' => 63,
            b'\n' | b'\r' | b' ' => continue,
            _ => return Err("invalid base64 character"),
        };
        buf = (buf << 6) | val as u32;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((buf >> bits) as u8);
            buf &= (1 << bits) - 1;
        }
    }

    Ok(out)
}
