// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Tag constants, wire-size constants, and typed results.

use core::fmt;

use crate::error::ProtocolError;

/// Protocol version sent in the request `VER` tag.
pub const VERSION: u32 = 1;

/// Minimum encoded request size in bytes; requests are padded up to this with
/// the `PAD` tag. Servers drop smaller requests to prevent amplification.
pub const MIN_REQUEST_SIZE: usize = 1024;

/// Nonce length in bytes.
pub const NONCE_LENGTH: usize = 32;

/// Length of a Merkle tree hash (SHA-512 truncated) in bytes.
pub const HASH_LENGTH: usize = 32;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// A wire tag: four ASCII bytes compared as a little-endian `u32`.
///
/// Messages sort tags by this numeric value, which is why `PAD\0`
/// (0x00444150) precedes every four-letter uppercase tag on the wire.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u32);

impl Tag {
    /// Construct a tag from its four wire bytes.
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Tag(u32::from_le_bytes(*bytes))
    }

    /// The tag's four wire bytes.
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// The tag's numeric (little-endian) wire value.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_le_bytes();
        let len = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        match core::str::from_utf8(&bytes[..len]) {
            Ok(s) if s.bytes().all(|b| b.is_ascii_graphic()) => write!(f, "{}", s),
            _ => write!(f, "0x{:08x}", self.0),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}

/// Well-known classic Roughtime tags.
pub mod tags {
    use super::Tag;

    /// Zero-filled padding used to reach [`super::MIN_REQUEST_SIZE`].
    pub const PAD: Tag = Tag::new(b"PAD\0");
    /// Protocol version (u32 LE).
    pub const VER: Tag = Tag::new(b"VER\0");
    /// Ed25519 signature (64 bytes).
    pub const SIG: Tag = Tag::new(b"SIG\0");
    /// Client nonce (32 bytes).
    pub const NONC: Tag = Tag::new(b"NONC");
    /// Delegation certificate: nested message with SIG and DELE.
    pub const CERT: Tag = Tag::new(b"CERT");
    /// Delegation: nested message with PUBK, MINT, MAXT.
    pub const DELE: Tag = Tag::new(b"DELE");
    /// Index of the client's leaf in the Merkle tree (u32 LE).
    pub const INDX: Tag = Tag::new(b"INDX");
    /// End of the delegated key's validity window (packed MJD timestamp).
    pub const MAXT: Tag = Tag::new(b"MAXT");
    /// Midpoint timestamp (packed MJD, u64 LE).
    pub const MIDP: Tag = Tag::new(b"MIDP");
    /// Start of the delegated key's validity window (packed MJD timestamp).
    pub const MINT: Tag = Tag::new(b"MINT");
    /// Merkle inclusion path (sequence of 32-byte hashes, leaf upward).
    pub const PATH: Tag = Tag::new(b"PATH");
    /// Delegated Ed25519 public key (32 bytes).
    pub const PUBK: Tag = Tag::new(b"PUBK");
    /// Uncertainty radius in microseconds (u32 LE).
    pub const RADI: Tag = Tag::new(b"RADI");
    /// Merkle tree root (32 bytes).
    pub const ROOT: Tag = Tag::new(b"ROOT");
    /// Signed response: nested message with ROOT, MIDP, RADI.
    pub const SREP: Tag = Tag::new(b"SREP");
}

/// The outcome of a fully verified response.
///
/// The midpoint carries no round-trip compensation; see the client crate's
/// estimator for latency-adjusted time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VerifiedTime {
    /// Midpoint in microseconds since the Unix epoch.
    pub midpoint_micros: u64,
    /// Server-declared uncertainty radius in microseconds.
    pub radius_micros: u32,
}

impl VerifiedTime {
    /// Midpoint as whole seconds since the Unix epoch (truncated).
    pub fn midpoint_seconds(&self) -> u64 {
        self.midpoint_micros / 1_000_000
    }

    /// Radius as whole seconds (rounded up).
    pub fn radius_seconds(&self) -> u32 {
        self.radius_micros.div_ceil(1_000_000)
    }
}

/// Read a `u32` LE from a tag's value, enforcing the 4-byte length.
pub(crate) fn read_u32(data: &[u8], tag: Tag) -> Result<u32, ProtocolError> {
    let bytes: &[u8; 4] = data
        .try_into()
        .map_err(|_| ProtocolError::TagLengthMismatch {
            tag,
            expected: 4,
            actual: data.len(),
        })?;
    Ok(u32::from_le_bytes(*bytes))
}

/// Read a `u64` LE from a tag's value, enforcing the 8-byte length.
pub(crate) fn read_u64(data: &[u8], tag: Tag) -> Result<u64, ProtocolError> {
    let bytes: &[u8; 8] = data
        .try_into()
        .map_err(|_| ProtocolError::TagLengthMismatch {
            tag,
            expected: 8,
            actual: data.len(),
        })?;
    Ok(u64::from_le_bytes(*bytes))
}

/// Borrow a tag's value as a fixed-length array, enforcing the length.
pub(crate) fn read_array<const N: usize>(data: &[u8], tag: Tag) -> Result<&[u8; N], ProtocolError> {
    data.try_into().map_err(|_| ProtocolError::TagLengthMismatch {
        tag,
        expected: N,
        actual: data.len(),
    })
}
