//! Duration filtering of candidate runs.
//!
//! A run is kept when `min_s < len / sfreq < max_s`, both bounds exclusive.
//! The comparison is made in seconds, on the same `len / sfreq` quotient an
//! event reports as its duration, so a run lasting exactly a bound is always
//! rejected whatever the sampling rate.
use serde::Serialize;

use crate::segment::RawRun;

/// Exclusive run-duration window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationBounds {
    pub min_s: f64,
    pub max_s: f64,
    pub sfreq: f64,
}

impl DurationBounds {
    /// ```
    /// use ieeg_ripples::duration::DurationBounds;
    /// let b = DurationBounds::from_seconds(0.038, 0.5, 1000.0);
    /// assert_eq!((b.min_samples(), b.max_samples()), (38.0, 500.0));
    /// ```
    pub fn from_seconds(min_s: f64, max_s: f64, sfreq: f64) -> Self {
        Self { min_s, max_s, sfreq }
    }

    /// Lower bound in (fractional) samples, for display.
    pub fn min_samples(&self) -> f64 {
        self.min_s * self.sfreq
    }

    /// Upper bound in (fractional) samples, for display.
    pub fn max_samples(&self) -> f64 {
        self.max_s * self.sfreq
    }

    #[inline]
    pub fn admits(&self, run: &RawRun) -> bool {
        let duration_s = run.len() as f64 / self.sfreq;
        self.min_s < duration_s && duration_s < self.max_s
    }

    /// Keep the runs that fit, preserving order.
    pub fn filter(&self, runs: Vec<RawRun>) -> Vec<RawRun> {
        runs.into_iter().filter(|r| self.admits(r)).collect()
    }
}
