// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Classic Roughtime protocol: wire format, Merkle proofs, and response
//! verification.
//!
//! Roughtime is an authenticated coarse time protocol. A client sends a
//! nonce-bearing UDP request and receives a response whose timestamp is bound
//! to that nonce by a SHA-512 Merkle tree and an Ed25519 signature chain
//! (long-term root key → short-lived delegated key → signed response).
//!
//! This crate implements the classic (Google-variant) wire dialect: tag-value
//! messages with no outer envelope, `PAD`-tag padding to a 1024-byte minimum
//! request, and 64-bit Modified-Julian-Date packed timestamps.
//!
//! The crate performs no I/O. Transports live in `roughtime_client`.
//!
//! # Usage
//!
//! ```no_run
//! use roughtime_proto::{build_request, verify_response};
//!
//! // Build a request (generates a random 32-byte nonce).
//! let (request_bytes, nonce) = build_request();
//!
//! // Send `request_bytes` via UDP to a Roughtime server, receive `response_bytes`.
//! # let response_bytes = vec![];
//! # let root_public_key = [0u8; 32];
//!
//! // Verify and extract the time.
//! let time = verify_response(&response_bytes, &nonce, &root_public_key).unwrap();
//! println!("Time: {} seconds since epoch (±{}s)",
//!     time.midpoint_seconds(), time.radius_seconds());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Ed25519 signature verification with the protocol's context strings.
pub mod crypto;

/// Error types for message parsing and response verification.
pub mod error;

/// Merkle inclusion-proof verification (SHA-512 truncated to 32 bytes).
pub mod merkle;

/// Request construction: nonce generation and `PAD`-padded encoding.
pub mod request;

/// The response validation pipeline.
pub mod response;

/// Modified-Julian-Date packed timestamp arithmetic.
pub mod timestamp;

/// Tag constants, wire-size constants, and typed results.
pub mod types;

/// Tag-value message codec (zero-copy decode, builder-based encode).
pub mod wire;

pub use error::ProtocolError;
#[cfg(feature = "std")]
pub use request::build_request;
pub use request::build_request_with_nonce;
pub use response::verify_response;
pub use types::{Tag, VerifiedTime, tags};
pub use wire::{Message, MessageBuilder};
