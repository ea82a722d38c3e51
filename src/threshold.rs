//! Per-channel adaptive amplitude thresholds.
//!
//! `lower = μ + k_lo · σ`,  `upper = μ + k_hi · σ`, where μ and σ are the
//! mean and population standard deviation (`ddof = 0`) of the whole
//! envelope.  A channel whose envelope has no spread is degenerate: both
//! thresholds collapse to μ and no sample can lie strictly between them.
use serde::Serialize;

/// σ/|μ| at or below which an envelope counts as constant.
const FLAT_SD_RATIO: f64 = 1e-9;

/// Lower/upper envelope cutoffs of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdPair {
    pub mean: f64,
    pub sd: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ThresholdPair {
    /// Statistics of `envelope` and the resulting cutoffs.
    ///
    /// An empty envelope yields an all-zero (degenerate) pair.
    pub fn from_envelope(envelope: &[f32], sd_lower: f64, sd_upper: f64) -> Self {
        let (mean, sd) = mean_std(envelope);
        Self {
            mean,
            sd,
            lower: mean + sd_lower * sd,
            upper: mean + sd_upper * sd,
        }
    }

    /// `true` when the envelope has no usable spread.
    ///
    /// σ is compared against a small fraction of μ rather than exact zero:
    /// summing a constant in floating point does not always give σ = 0.
    pub fn is_degenerate(&self) -> bool {
        !(self.sd.is_finite() && self.sd > FLAT_SD_RATIO * self.mean.abs())
    }

    /// `lower < value < upper`, strict on both ends.
    #[inline]
    pub fn admits(&self, value: f32) -> bool {
        let v = value as f64;
        self.lower < v && v < self.upper
    }
}

/// Mean and population standard deviation, accumulated in `f64`.
pub fn mean_std(x: &[f32]) -> (f64, f64) {
    if x.is_empty() {
        return (0.0, 0.0);
    }
    let n = x.len() as f64;
    let mean = x.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = x
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, var.sqrt())
}
