// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Async Roughtime client functions using the tokio runtime.
//!
//! Mirrors the blocking API: one call is one complete exchange with a fresh
//! nonce, and the timeout bounds the whole exchange.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! let pk = roughtime_client::decode_public_key(
//!     "AW5uAoTSTDfG5NfY1bTh08GUnOqlRb+HVhbJ3ODJvsE=",
//! )?;
//! let est = roughtime_client::async_client::request("roughtime.int08h.com:2002", &pk).await?;
//! println!("epoch time {} µs ±{} µs", est.midpoint_micros, est.radius_micros);
//! # Ok(())
//! # }
//! ```

use log::debug;

use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant, SystemTime};

use roughtime_proto::types::PUBLIC_KEY_LENGTH;
use roughtime_proto::{build_request, verify_response};

use crate::client::{RoughtimeEstimate, bind_addr_for, finish_estimate};

/// Default timeout for Roughtime requests (5 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const RECV_BUF_SIZE: usize = 4096;

/// Send an async Roughtime request with a 5 second timeout.
pub async fn request<A: tokio::net::ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> io::Result<RoughtimeEstimate> {
    request_with_timeout(addr, public_key, DEFAULT_TIMEOUT).await
}

/// Send an async Roughtime request with a configurable timeout.
///
/// The timeout covers the whole exchange; on expiry the pending receive is
/// dropped and [`io::ErrorKind::TimedOut`] is returned. Nothing of the
/// abandoned exchange survives; a retry is a new exchange with a new nonce.
pub async fn request_with_timeout<A: tokio::net::ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    timeout: Duration,
) -> io::Result<RoughtimeEstimate> {
    tokio::time::timeout(timeout, request_inner(addr, public_key))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "Roughtime request timed out"))?
}

async fn request_inner<A: tokio::net::ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> io::Result<RoughtimeEstimate> {
    let resolved_addrs: Vec<SocketAddr> = tokio::net::lookup_host(addr).await?.collect();
    let target_addr = *resolved_addrs.first().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "address resolved to no socket addresses",
        )
    })?;

    let (request_bytes, nonce) = build_request();

    let sock = tokio::net::UdpSocket::bind(bind_addr_for(&target_addr)).await?;

    let sent_mono = Instant::now();
    let sz = sock.send_to(&request_bytes, target_addr).await?;
    debug!("roughtime: sent {} bytes to {:?}", sz, target_addr);

    let mut recv_buf = [0u8; RECV_BUF_SIZE];
    let (recv_len, src_addr) = sock.recv_from(&mut recv_buf).await?;
    let recv_mono = Instant::now();
    let recv_real = SystemTime::now();
    debug!("roughtime: recv {} bytes from {:?}", recv_len, src_addr);

    if !resolved_addrs.iter().any(|a| a.ip() == src_addr.ip()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "response from unexpected source address",
        ));
    }

    let verified = verify_response(&recv_buf[..recv_len], &nonce, public_key)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    finish_estimate(sent_mono, recv_mono, recv_real, verified)
}
