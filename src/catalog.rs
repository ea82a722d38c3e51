//! Per-channel ripple catalog.
//!
//! [`EventCatalog`] is total over the input channels: every label maps to a
//! [`ChannelEvents`] entry, whose `events` may be empty.  Whether an empty
//! list means "processed, nothing found" or "skipped" is carried by
//! [`ChannelStatus`], never by a sentinel value.
use serde::Serialize;

use crate::segment::RawRun;
use crate::threshold::ThresholdPair;

/// One detected ripple, in both sample and time units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RippleEvent {
    pub channel: String,
    /// First in-band sample.
    pub start_sample: usize,
    /// One past the last in-band sample.
    pub end_sample: usize,
    pub start_time_s: f64,
    pub end_time_s: f64,
    pub duration_s: f64,
}

impl RippleEvent {
    pub fn from_run(channel: &str, run: RawRun, sfreq: f64) -> Self {
        Self {
            channel: channel.to_string(),
            start_sample: run.start,
            end_sample: run.end,
            start_time_s: run.start as f64 / sfreq,
            end_time_s: run.end as f64 / sfreq,
            duration_s: run.len() as f64 / sfreq,
        }
    }

    pub fn n_samples(&self) -> usize {
        self.end_sample - self.start_sample
    }
}

/// Why a channel produced no candidate runs at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Every raw sample has the same value.
    FlatSignal,
    /// The envelope has (numerically) zero standard deviation.
    ZeroVariance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum ChannelStatus {
    Processed,
    Skipped(SkipReason),
}

/// Catalog entry of one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelEvents {
    pub label: String,
    pub status: ChannelStatus,
    /// Envelope statistics; `None` when the channel was skipped before the
    /// envelope was computed.
    pub thresholds: Option<ThresholdPair>,
    /// Ordered by `start_sample`.
    pub events: Vec<RippleEvent>,
}

impl ChannelEvents {
    pub fn processed(label: &str, thresholds: ThresholdPair, runs: &[RawRun], sfreq: f64) -> Self {
        Self {
            label: label.to_string(),
            status: ChannelStatus::Processed,
            thresholds: Some(thresholds),
            events: runs.iter().map(|&r| RippleEvent::from_run(label, r, sfreq)).collect(),
        }
    }

    pub fn skipped(label: &str, reason: SkipReason, thresholds: Option<ThresholdPair>) -> Self {
        Self {
            label: label.to_string(),
            status: ChannelStatus::Skipped(reason),
            thresholds,
            events: vec![],
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ChannelStatus::Skipped(_))
    }
}

/// Ripple events of every input channel, in input channel order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCatalog {
    pub sfreq: f64,
    pub n_samples: usize,
    pub channels: Vec<ChannelEvents>,
}

impl EventCatalog {
    pub fn new(sfreq: f64, n_samples: usize, channels: Vec<ChannelEvents>) -> Self {
        Self { sfreq, n_samples, channels }
    }

    pub fn get(&self, label: &str) -> Option<&ChannelEvents> {
        self.channels.iter().find(|c| c.label == label)
    }

    /// Events of `label`; empty for skipped or unknown channels.
    pub fn events(&self, label: &str) -> &[RippleEvent] {
        match self.get(label) {
            Some(c) => &c.events,
            None => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelEvents> {
        self.channels.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.label.as_str())
    }

    /// `(start_sample, end_sample)` pairs, for sample-indexed epoching.
    pub fn sample_intervals(&self, label: &str) -> Vec<(usize, usize)> {
        self.events(label).iter().map(|e| (e.start_sample, e.end_sample)).collect()
    }

    /// `(start_time_s, end_time_s)` pairs, for time-indexed epoching.
    pub fn time_intervals(&self, label: &str) -> Vec<(f64, f64)> {
        self.events(label).iter().map(|e| (e.start_time_s, e.end_time_s)).collect()
    }

    pub fn total_events(&self) -> usize {
        self.channels.iter().map(|c| c.events.len()).sum()
    }

    /// Channels flagged as skipped.
    pub fn skipped(&self) -> impl Iterator<Item = &ChannelEvents> {
        self.channels.iter().filter(|c| c.is_skipped())
    }

    /// Events per second of recording on `label`.
    pub fn event_rate_hz(&self, label: &str) -> f64 {
        let duration_s = self.n_samples as f64 / self.sfreq;
        if duration_s > 0.0 {
            self.events(label).len() as f64 / duration_s
        } else {
            0.0
        }
    }
}
