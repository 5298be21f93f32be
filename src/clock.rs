//! Clock synchronisation against the coordinator.
//!
//! Each participant estimates once how far its clock is from the
//! coordinator's, assuming the request and the reply took equally long. The
//! estimate only drives the countdown shown to players; the coordinator's own
//! clock decides when a turn actually expires.

use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TransportError;
use crate::service::SessionService;

/// Milliseconds since the Unix epoch on this machine.
#[must_use]
pub fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

/// The coordinator's authoritative clock.
///
/// Reads as wall-clock milliseconds, but advances with the Tokio clock from
/// the moment it was created, so it stays monotonic and follows paused time
/// in tests.
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorClock {
    origin_ms: u64,
    origin: tokio::time::Instant,
}

impl CoordinatorClock {
    /// Starts the clock at the current wall-clock time.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin_ms: wall_clock_ms(),
            origin: tokio::time::Instant::now(),
        }
    }

    /// Milliseconds since the Unix epoch, coordinator side.
    #[must_use]
    pub fn now(&self) -> u64 {
        let elapsed = self.origin.elapsed().as_millis() as u64;
        self.origin_ms.saturating_add(elapsed)
    }
}

/// Estimates the coordinator's clock minus the local clock.
///
/// `t0` is the local send time, `server` the coordinator time in the reply,
/// and `t1` the local receive time, all in milliseconds.
#[must_use]
pub const fn estimate_offset(t0: u64, server: u64, t1: u64) -> i64 {
    let rtt = t1 as i64 - t0 as i64;
    server as i64 + rtt / 2 - t1 as i64
}

/// A local clock corrected by a one-shot offset estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncedClock {
    offset: i64,
    rtt: u64,
}

impl SyncedClock {
    /// Creates a clock from a known offset.
    #[must_use]
    pub const fn with_offset(offset: i64) -> Self {
        Self { offset, rtt: 0 }
    }

    /// Creates a clock from one round-trip measurement.
    #[must_use]
    pub const fn from_measurement(t0: u64, server: u64, t1: u64) -> Self {
        Self {
            offset: estimate_offset(t0, server, t1),
            rtt: t1.saturating_sub(t0),
        }
    }

    /// Measures the offset against a coordinator.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the coordinator cannot be reached.
    pub async fn synchronize<S>(service: &S) -> Result<Self, TransportError>
    where
        S: SessionService + ?Sized,
    {
        let t0 = wall_clock_ms();
        let server = service.coordinator_time().await?;
        let t1 = wall_clock_ms();
        let clock = Self::from_measurement(t0, server, t1);
        log::info!(
            "clock synchronised: rtt {} ms, offset {} ms",
            clock.rtt,
            clock.offset
        );
        Ok(clock)
    }

    /// Returns the estimated offset in milliseconds.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns the measured round trip in milliseconds.
    #[must_use]
    pub const fn rtt(&self) -> u64 {
        self.rtt
    }

    /// Converts a local timestamp to estimated coordinator time.
    #[must_use]
    pub const fn adjust(&self, local_ms: u64) -> u64 {
        local_ms.saturating_add_signed(self.offset)
    }

    /// Estimated coordinator time now.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.adjust(wall_clock_ms())
    }

    /// Time left until a coordinator deadline, as seen at local time `local_ms`.
    #[must_use]
    pub const fn remaining_at(&self, deadline: u64, local_ms: u64) -> Duration {
        Duration::from_millis(deadline.saturating_sub(self.adjust(local_ms)))
    }

    /// Time left until a coordinator deadline.
    #[must_use]
    pub fn remaining(&self, deadline: u64) -> Duration {
        self.remaining_at(deadline, wall_clock_ms())
    }

    /// Whole seconds left until a coordinator deadline.
    #[must_use]
    pub fn seconds_left(&self, deadline: u64) -> u64 {
        self.remaining(deadline).as_secs()
    }
}
