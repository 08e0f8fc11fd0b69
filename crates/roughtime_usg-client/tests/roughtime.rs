// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Integration tests against a live classic-dialect Roughtime server.
//!
//! These query `roughtime.int08h.com` and verify real responses. Set
//! `SKIP_NETWORK_TESTS=1` to skip them in offline environments; network
//! unreachability also skips rather than fails.

use std::time::Duration;

fn skip_network() -> bool {
    std::env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// int08h (roughenough) long-term public key.
fn int08h_pk() -> [u8; 32] {
    roughtime_client::decode_public_key("AW5uAoTSTDfG5NfY1bTh08GUnOqlRb+HVhbJ3ODJvsE=").unwrap()
}

fn is_network_skip_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::TimedOut
            | std::io::ErrorKind::WouldBlock
            | std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::AddrNotAvailable
    ) || e.raw_os_error() == Some(101) // ENETUNREACH
      || e.raw_os_error() == Some(113) // EHOSTUNREACH
      || e.to_string().contains("failed to lookup address")
}

#[test]
fn test_roughtime_sync_int08h() {
    if skip_network() {
        eprintln!("skipping: SKIP_NETWORK_TESTS is set");
        return;
    }

    match roughtime_client::request_with_timeout(
        "roughtime.int08h.com:2002",
        &int08h_pk(),
        Duration::from_secs(10),
    ) {
        Ok(est) => {
            // A real response must land after 2024 and before the
            // plausibility ceiling.
            assert!(
                est.midpoint_seconds() > 1_700_000_000,
                "midpoint too old: {}",
                est.midpoint_seconds()
            );
            assert!(
                est.radius_seconds() < 60,
                "radius too large: {}s",
                est.radius_seconds()
            );
            // A sane host clock is within a day of the estimate.
            assert!(
                est.local_offset_micros.abs() < 86_400_000_000,
                "offset suspiciously large: {} µs",
                est.local_offset_micros
            );
        }
        Err(e) if is_network_skip_error(&e) => {
            eprintln!("skipping: Roughtime server unreachable ({e})");
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[cfg(feature = "tokio")]
#[tokio::test]
async fn test_roughtime_async_int08h() {
    if skip_network() {
        eprintln!("skipping: SKIP_NETWORK_TESTS is set");
        return;
    }

    match roughtime_client::async_client::request_with_timeout(
        "roughtime.int08h.com:2002",
        &int08h_pk(),
        Duration::from_secs(10),
    )
    .await
    {
        Ok(est) => {
            assert!(
                est.midpoint_seconds() > 1_700_000_000,
                "midpoint too old: {}",
                est.midpoint_seconds()
            );
            assert!(
                est.radius_seconds() < 60,
                "radius too large: {}s",
                est.radius_seconds()
            );
        }
        Err(e) if is_network_skip_error(&e) => {
            eprintln!("skipping: Roughtime server unreachable ({e})");
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
}
