//! Envelope segmentation into candidate runs.
//!
//! A sample is *in band* when `lower < envelope[i] < upper`.  The in-band
//! mask is run-length encoded by a single left-to-right scan with two
//! states:
//!
//! ```text
//!            in band: open run at i
//!   Outside ─────────────────────────▶ Inside { start }
//!      ▲                                   │
//!      └───────────────────────────────────┘
//!        out of band (or end of record): close run at i (exclusive)
//! ```
//!
//! Two in-band regions separated by a single out-of-band sample are two
//! runs; nothing is ever merged.
use serde::Serialize;

use crate::threshold::ThresholdPair;

/// Half-open sample interval `[start, end)` of consecutive in-band samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RawRun {
    pub start: usize,
    pub end: usize,
}

impl RawRun {
    /// Length in samples.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside { start: usize },
}

/// In-band mask of `envelope`.
pub fn band_mask(envelope: &[f32], thresholds: &ThresholdPair) -> Vec<bool> {
    envelope.iter().map(|&v| thresholds.admits(v)).collect()
}

/// Run-length encode the `true` regions of `mask`, in order.
///
/// ```
/// use ieeg_ripples::segment::{runs_from_mask, RawRun};
///
/// let runs = runs_from_mask([false, true, true, false, true]);
/// assert_eq!(runs, vec![RawRun { start: 1, end: 3 }, RawRun { start: 4, end: 5 }]);
/// ```
pub fn runs_from_mask<I>(mask: I) -> Vec<RawRun>
where
    I: IntoIterator<Item = bool>,
{
    let mut runs = Vec::new();
    let mut state = ScanState::Outside;
    let mut n = 0;

    for (i, in_band) in mask.into_iter().enumerate() {
        state = match (state, in_band) {
            (ScanState::Outside, true) => ScanState::Inside { start: i },
            (ScanState::Inside { start }, false) => {
                runs.push(RawRun { start, end: i });
                ScanState::Outside
            }
            (s, _) => s,
        };
        n = i + 1;
    }

    if let ScanState::Inside { start } = state {
        runs.push(RawRun { start, end: n });
    }
    runs
}

/// Candidate runs of one channel's envelope.
pub fn segment(envelope: &[f32], thresholds: &ThresholdPair) -> Vec<RawRun> {
    runs_from_mask(envelope.iter().map(|&v| thresholds.admits(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(start: usize, end: usize) -> RawRun {
        RawRun { start, end }
    }

    #[test]
    fn empty_and_all_false_masks_have_no_runs() {
        assert!(runs_from_mask(Vec::<bool>::new()).is_empty());
        assert!(runs_from_mask(vec![false; 16]).is_empty());
    }

    #[test]
    fn all_true_mask_is_one_run() {
        assert_eq!(runs_from_mask(vec![true; 5]), vec![run(0, 5)]);
    }

    #[test]
    fn run_open_at_end_is_closed_at_length() {
        assert_eq!(runs_from_mask([false, false, true, true]), vec![run(2, 4)]);
    }

    #[test]
    fn run_starting_at_zero() {
        assert_eq!(runs_from_mask([true, true, false]), vec![run(0, 2)]);
    }

    #[test]
    fn single_false_sample_splits_runs() {
        let mask = [true, true, true, false, true, true];
        assert_eq!(runs_from_mask(mask), vec![run(0, 3), run(4, 6)]);
    }

    #[test]
    fn isolated_single_samples() {
        let mask = [true, false, true, false, true];
        assert_eq!(runs_from_mask(mask), vec![run(0, 1), run(2, 3), run(4, 5)]);
    }

    #[test]
    fn values_on_either_threshold_are_outside() {
        let t = ThresholdPair { mean: 0.0, sd: 1.0, lower: 1.0, upper: 3.0 };
        let env = [0.0_f32, 1.0, 2.0, 2.5, 3.0, 2.0, 1.0];
        assert_eq!(band_mask(&env, &t), vec![false, false, true, true, false, true, false]);
        assert_eq!(segment(&env, &t), vec![run(2, 4), run(5, 6)]);
    }
}
