// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Roughtime client: UDP transport, response verification, and clock offset
estimation.

Each call performs one complete exchange: build a nonce-bearing request, send
it, wait (bounded) for the response, verify the Ed25519 signature chain and
Merkle inclusion proof via [`roughtime_proto`], and fold the measured round
trip into a latency-compensated time estimate. Exchanges share no state;
retries are independent exchanges with fresh nonces.

# Example

```no_run
use std::time::Duration;

fn main() -> std::io::Result<()> {
    let pk = roughtime_client::decode_public_key("AW5uAoTSTDfG5NfY1bTh08GUnOqlRb+HVhbJ3ODJvsE=")?;
    let est = roughtime_client::request_with_timeout(
        "roughtime.int08h.com:2002",
        &pk,
        Duration::from_secs(5),
    )?;
    println!(
        "epoch time {} µs ±{} µs, local clock off by {} µs",
        est.midpoint_micros, est.radius_micros, est.local_offset_micros
    );
    Ok(())
}
```

# Feature Flags

| Feature | Default | Description |
|---------|---------|-------------|
| `tokio` | no | Async client functions using the tokio runtime. |
*/

#![warn(missing_docs)]

// Re-export the protocol crate so callers need only one dependency.
pub use roughtime_proto as proto;

/// Round-trip-compensated time estimation and local clock offset.
pub mod estimate;

/// Base64 decoding for operator-supplied keys and nonces.
pub mod key;

/// Async Roughtime client functions using the tokio runtime.
#[cfg(feature = "tokio")]
pub mod async_client;

// Blocking UDP exchange.
mod client;

pub use client::{RoughtimeEstimate, request, request_with_nonce, request_with_timeout};
pub use estimate::TimeEstimate;
pub use key::{decode_nonce, decode_public_key};
