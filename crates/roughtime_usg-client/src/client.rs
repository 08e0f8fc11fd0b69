// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Blocking UDP exchange: request, bounded wait, verification, estimation.
//!
//! The socket work lives here so `roughtime_proto` stays pure. A transport
//! failure (timeout, unreachable network) keeps its native
//! [`io::ErrorKind`]; verification failures arrive as
//! [`io::ErrorKind::InvalidData`] wrapping the typed
//! [`roughtime_proto::ProtocolError`].

use log::debug;

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use roughtime_proto::types::{NONCE_LENGTH, PUBLIC_KEY_LENGTH};
use roughtime_proto::{build_request, build_request_with_nonce, verify_response};

use crate::estimate::{TimeEstimate, estimate};

/// Default timeout for Roughtime requests (5 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Response buffer size. Responses exceed the 1024-byte request only when
/// the server batches heavily; 4 KiB leaves ample headroom.
const RECV_BUF_SIZE: usize = 4096;

/// The outcome of one verified exchange.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RoughtimeEstimate {
    /// Latency-compensated time at the receive instant, in microseconds
    /// since the Unix epoch.
    pub midpoint_micros: u64,
    /// Server-declared uncertainty radius in microseconds.
    pub radius_micros: u32,
    /// Local realtime clock error in microseconds: positive means the local
    /// clock is behind.
    pub local_offset_micros: i64,
    /// Measured round trip in microseconds.
    pub round_trip_micros: u64,
}

impl RoughtimeEstimate {
    /// Midpoint as whole seconds since the Unix epoch (truncated).
    pub fn midpoint_seconds(&self) -> u64 {
        self.midpoint_micros / 1_000_000
    }

    /// Radius as whole seconds (rounded up).
    pub fn radius_seconds(&self) -> u32 {
        self.radius_micros.div_ceil(1_000_000)
    }
}

/// Select the appropriate bind address based on the target address family.
///
/// Returns `0.0.0.0:0` for IPv4 targets and `[::]:0` for IPv6 targets.
pub(crate) fn bind_addr_for(target: &SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
    }
}

/// Send a blocking Roughtime request with a 5 second timeout.
///
/// # Arguments
///
/// * `addr` - Server address (e.g., `"roughtime.int08h.com:2002"`)
/// * `public_key` - The server's long-term Ed25519 root public key
pub fn request<A: ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> io::Result<RoughtimeEstimate> {
    request_with_timeout(addr, public_key, DEFAULT_TIMEOUT)
}

/// Send a blocking Roughtime request with a configurable timeout.
///
/// Generates a fresh random nonce for the exchange.
pub fn request_with_timeout<A: ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    timeout: Duration,
) -> io::Result<RoughtimeEstimate> {
    let (request_bytes, nonce) = build_request();
    exchange(addr, public_key, &request_bytes, &nonce, timeout)
}

/// Send a blocking Roughtime request with a caller-supplied nonce.
///
/// Intended for auditing and testing; normal polling should let
/// [`request_with_timeout`] generate a fresh nonce per exchange.
pub fn request_with_nonce<A: ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    nonce: &[u8; NONCE_LENGTH],
    timeout: Duration,
) -> io::Result<RoughtimeEstimate> {
    let request_bytes = build_request_with_nonce(nonce);
    exchange(addr, public_key, &request_bytes, nonce, timeout)
}

fn exchange<A: ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    request_bytes: &[u8],
    nonce: &[u8; NONCE_LENGTH],
    timeout: Duration,
) -> io::Result<RoughtimeEstimate> {
    // Resolve eagerly so the response source can be checked.
    let resolved_addrs: Vec<SocketAddr> = addr.to_socket_addrs()?.collect();
    let target_addr = *resolved_addrs.first().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "address resolved to no socket addresses",
        )
    })?;

    let sock = UdpSocket::bind(bind_addr_for(&target_addr))?;
    sock.set_read_timeout(Some(timeout))?;
    sock.set_write_timeout(Some(timeout))?;

    let sent_mono = Instant::now();
    let sz = sock.send_to(request_bytes, target_addr)?;
    debug!("roughtime: sent {} bytes to {:?}", sz, target_addr);

    let mut recv_buf = [0u8; RECV_BUF_SIZE];
    let (recv_len, src_addr) = sock.recv_from(&mut recv_buf)?;
    let recv_mono = Instant::now();
    let recv_real = SystemTime::now();
    debug!("roughtime: recv {} bytes from {:?}", recv_len, src_addr);

    // Only the IP needs to match; some servers reply from a different port.
    if !resolved_addrs.iter().any(|a| a.ip() == src_addr.ip()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "response from unexpected source address",
        ));
    }

    let verified = verify_response(&recv_buf[..recv_len], nonce, public_key)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    finish_estimate(sent_mono, recv_mono, recv_real, verified)
}

/// Fold the verified result and the captured clock readings into an
/// estimate. Shared with the async client.
pub(crate) fn finish_estimate(
    sent_mono: Instant,
    recv_mono: Instant,
    recv_real: SystemTime,
    verified: roughtime_proto::VerifiedTime,
) -> io::Result<RoughtimeEstimate> {
    let round_trip_micros = recv_mono.duration_since(sent_mono).as_micros() as u64;
    let realtime_micros = recv_real
        .duration_since(UNIX_EPOCH)
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "system clock is set before the Unix epoch",
            )
        })?
        .as_micros() as u64;

    // Monotonic readings share an arbitrary origin; the send instant serves
    // as zero.
    let TimeEstimate {
        midpoint_micros,
        radius_micros,
        local_offset_micros,
    } = estimate(
        0,
        round_trip_micros,
        realtime_micros,
        verified.midpoint_micros,
        verified.radius_micros,
    );

    Ok(RoughtimeEstimate {
        midpoint_micros,
        radius_micros,
        local_offset_micros,
        round_trip_micros,
    })
}
