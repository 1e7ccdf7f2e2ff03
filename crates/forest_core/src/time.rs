//! Simulation time
//!
//! All time-dependent operations take an explicit [`Timestamp`] so that a
//! tick is a pure function of its inputs. The render loop advances a
//! [`SimClock`] by its frame delta and hands the resulting timestamp down.

use serde::{Deserialize, Serialize};

/// Milliseconds since the simulation started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Convert from seconds, saturating negative/NaN input to zero
    #[inline]
    pub fn from_secs_f32(secs: f32) -> Self {
        Self((secs.max(0.0) * 1000.0).round() as u64)
    }

    #[inline]
    pub const fn millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier` (0 if `earlier` is in the future)
    #[inline]
    pub fn millis_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Seconds elapsed since `earlier` (0 if `earlier` is in the future)
    #[inline]
    pub fn secs_since(self, earlier: Timestamp) -> f32 {
        self.millis_since(earlier) as f32 / 1000.0
    }

    #[inline]
    pub fn add_millis(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    #[inline]
    pub fn add_secs(self, secs: f32) -> Self {
        self.add_millis(Self::from_secs_f32(secs).0)
    }
}

/// Accumulates frame deltas into timestamps
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    elapsed: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by a frame delta in seconds. Negative or NaN deltas are ignored.
    pub fn advance(&mut self, delta_time: f32) -> Timestamp {
        if delta_time.is_finite() && delta_time > 0.0 {
            self.elapsed += delta_time as f64;
        }
        self.now()
    }

    pub fn now(&self) -> Timestamp {
        Timestamp((self.elapsed * 1000.0).round() as u64)
    }

    /// Seconds since the clock started
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }
}
