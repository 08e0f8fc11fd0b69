// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Round-trip-compensated time estimation and local clock offset.
//!
//! The server's midpoint describes some moment between our send and receive.
//! Assuming a symmetric network path (an assumption, not a measured fact),
//! the midpoint is best mapped onto the receive instant by adding half the
//! measured round trip. Comparing that adjusted time with the local realtime
//! clock at the receive instant yields the local offset.

/// A latency-compensated time estimate derived from one verified exchange.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeEstimate {
    /// Estimated current time at the receive instant, in microseconds since
    /// the Unix epoch.
    pub midpoint_micros: u64,
    /// Server-declared uncertainty radius in microseconds.
    pub radius_micros: u32,
    /// Local realtime clock error in microseconds: positive means the local
    /// clock is behind the server's estimate.
    pub local_offset_micros: i64,
}

/// Combine a verified server timestamp with local clock readings.
///
/// `request_sent_monotonic_micros` and `response_received_monotonic_micros`
/// are readings of the same monotonic clock (any origin); the difference is
/// the round trip. `response_received_realtime_micros` is the local realtime
/// clock at the receive instant, as microseconds since the Unix epoch.
///
/// Acceptance policy (for example rejecting synchronization when the offset
/// exceeds some bound) belongs to the caller, not here.
pub fn estimate(
    request_sent_monotonic_micros: u64,
    response_received_monotonic_micros: u64,
    response_received_realtime_micros: u64,
    server_midpoint_micros: u64,
    radius_micros: u32,
) -> TimeEstimate {
    let round_trip =
        response_received_monotonic_micros.saturating_sub(request_sent_monotonic_micros);
    let midpoint_micros = server_midpoint_micros + round_trip / 2;
    let local_offset_micros = midpoint_micros as i64 - response_received_realtime_micros as i64;
    TimeEstimate {
        midpoint_micros,
        radius_micros,
        local_offset_micros,
    }
}
