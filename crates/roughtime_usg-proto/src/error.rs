// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for Roughtime message parsing and response verification.
//!
//! [`ProtocolError`] is `no_std`-compatible via `core::fmt::Display`, with
//! [`std::error::Error`] and `From<ProtocolError> for std::io::Error` behind
//! the `std` feature.
//!
//! Validation is terminal on first failure: the pipeline in
//! [`crate::response`] never continues past an error, and no field from a
//! failed response may be trusted.

use core::fmt;

use crate::types::Tag;

/// Errors that can occur while parsing a Roughtime message or verifying a
/// response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProtocolError {
    /// The buffer is shorter than the declared or minimum message size.
    MessageTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// Tags in a message are not strictly ascending.
    TagsOutOfOrder,
    /// A value offset is non-monotonic or points beyond the value region.
    OffsetOutOfBounds,
    /// A required tag is missing from the message.
    MissingTag {
        /// The tag that was expected.
        tag: Tag,
    },
    /// A tag's value has an unexpected length.
    TagLengthMismatch {
        /// The tag whose value was the wrong size.
        tag: Tag,
        /// The expected length in bytes.
        expected: usize,
        /// The actual length in bytes.
        actual: usize,
    },
    /// A nested message (CERT, DELE, SREP) failed to parse.
    ///
    /// Distinguishes a malformed inner message from a malformed outer one.
    BadNestedMessage {
        /// The tag whose value should have been a valid message.
        tag: Tag,
    },
    /// Ed25519 signature verification failed.
    SignatureInvalid,
    /// The recomputed Merkle root does not match the signed root, or the
    /// inclusion path is malformed.
    MerkleMismatch,
    /// The midpoint lies outside the delegated key's validity window
    /// (MINT..=MAXT).
    DelegationWindowExceeded,
    /// The midpoint decodes to a date implausibly far from the present.
    ImplausibleTimestamp {
        /// The Modified Julian Day that was rejected.
        mjd: u64,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MessageTooShort { needed, available } => {
                write!(
                    f,
                    "message too short: needed {} bytes, got {}",
                    needed, available
                )
            }
            ProtocolError::TagsOutOfOrder => write!(f, "tags not in strictly ascending order"),
            ProtocolError::OffsetOutOfBounds => write!(f, "value offset out of bounds"),
            ProtocolError::MissingTag { tag } => {
                write!(f, "missing required tag: {}", tag)
            }
            ProtocolError::TagLengthMismatch {
                tag,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "tag {} has invalid length: expected {}, got {}",
                    tag, expected, actual
                )
            }
            ProtocolError::BadNestedMessage { tag } => {
                write!(f, "malformed nested message in {}", tag)
            }
            ProtocolError::SignatureInvalid => {
                write!(f, "Ed25519 signature verification failed")
            }
            ProtocolError::MerkleMismatch => {
                write!(f, "Merkle inclusion proof verification failed")
            }
            ProtocolError::DelegationWindowExceeded => {
                write!(f, "midpoint outside delegated key validity window")
            }
            ProtocolError::ImplausibleTimestamp { mjd } => {
                write!(f, "implausible timestamp: Modified Julian Day {}", mjd)
            }
        }
    }
}

#[cfg(feature = "std")]
impl From<ProtocolError> for std::io::Error {
    fn from(err: ProtocolError) -> std::io::Error {
        let kind = match &err {
            ProtocolError::MessageTooShort { .. } => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}
