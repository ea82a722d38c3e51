//! Ripple-band limiting.
//!
//! - [`design`]: Hamming-windowed sinc band-pass FIR design, matching
//!   `mne.filter.create_filter(fir_window='hamming', phase='zero')`.
//! - [`apply`]: Overlap-add zero-phase convolution, matching MNE's
//!   `_overlap_add_filter` / `_1d_overlap_filter`.
//! - [`BandLimiter`]: validated band + kernel, applied per channel.

pub mod apply;
pub mod design;

pub use apply::{filter_1d, OverlapAdd};
pub use design::{auto_filter_length, auto_transition_bandwidths, design_bandpass, firwin_bandpass, hamming};

use ndarray::{Array2, ArrayView1};

use crate::config::RippleConfig;
use crate::error::{ConfigError, InputError};
use crate::signal::MultiChannelSignal;

/// A zero-phase band-pass designed for one sampling rate.
#[derive(Debug, Clone)]
pub struct BandLimiter {
    low_hz: f64,
    high_hz: f64,
    sfreq: f64,
    taps: Vec<f32>,
}

impl BandLimiter {
    /// Design the pass band `[low_hz, high_hz]` for `sfreq`.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when a cutoff is not positive, reaches Nyquist, or
    /// `low_hz >= high_hz`.
    pub fn new(low_hz: f64, high_hz: f64, sfreq: f64) -> Result<Self, ConfigError> {
        if !(sfreq.is_finite() && sfreq > 0.0) {
            return Err(ConfigError::NonPositive { name: "sfreq", value: sfreq });
        }
        for (name, value) in [("low_cutoff_hz", low_hz), ("high_cutoff_hz", high_hz)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
            if value >= sfreq / 2.0 {
                return Err(ConfigError::CutoffAboveNyquist { name, value_hz: value, nyquist_hz: sfreq / 2.0 });
            }
        }
        if low_hz >= high_hz {
            return Err(ConfigError::EmptyBand { low_hz, high_hz });
        }

        let taps = design_bandpass(low_hz, high_hz, sfreq);
        log::debug!("band-pass {low_hz}-{high_hz} Hz @ {sfreq} Hz: {} taps", taps.len());
        Ok(Self { low_hz, high_hz, sfreq, taps })
    }

    /// The band configured in `cfg`.
    pub fn from_config(cfg: &RippleConfig, sfreq: f64) -> Result<Self, ConfigError> {
        Self::new(cfg.low_cutoff_hz, cfg.high_cutoff_hz, sfreq)
    }

    pub fn band(&self) -> (f64, f64) {
        (self.low_hz, self.high_hz)
    }

    pub fn sfreq(&self) -> f64 {
        self.sfreq
    }

    /// FIR impulse response (odd length, symmetric).
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Delay-compensated kernel planned for `n_samples`-long channels.
    pub fn plan(&self, n_samples: usize) -> OverlapAdd {
        OverlapAdd::new(&self.taps, n_samples)
    }

    /// Band-limit one channel.
    pub fn apply_1d(&self, x: ArrayView1<'_, f32>) -> Vec<f32> {
        filter_1d(&x.to_vec(), &self.taps)
    }

    /// Band-limit every channel of `signal`.
    ///
    /// Returns a new signal with the same labels, shape and sampling rate.
    ///
    /// # Errors
    ///
    /// [`InputError::SamplingRateMismatch`] if `signal` was recorded at a
    /// different rate than this filter was designed for.
    pub fn apply(&self, signal: &MultiChannelSignal) -> Result<MultiChannelSignal, InputError> {
        if (signal.sfreq() - self.sfreq).abs() >= 1e-9 {
            return Err(InputError::SamplingRateMismatch { expected_hz: self.sfreq, found_hz: signal.sfreq() });
        }
        let plan = self.plan(signal.n_samples());
        let mut out = Array2::<f32>::zeros(signal.data().dim());
        for (src, mut dst) in signal.data().rows().into_iter().zip(out.rows_mut()) {
            let filtered = plan.filter(&src.to_vec())?;
            dst.assign(&ArrayView1::from(&filtered));
        }
        Ok(signal.with_data(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_band_above_nyquist() {
        let err = BandLimiter::new(80.0, 120.0, 200.0).unwrap_err();
        assert!(matches!(err, ConfigError::CutoffAboveNyquist { name: "high_cutoff_hz", .. }));
        let err = BandLimiter::new(120.0, 130.0, 240.0).unwrap_err();
        assert!(matches!(err, ConfigError::CutoffAboveNyquist { name: "low_cutoff_hz", .. }));
    }

    #[test]
    fn rejects_inverted_band() {
        let err = BandLimiter::new(120.0, 80.0, 1000.0).unwrap_err();
        assert_eq!(err, ConfigError::EmptyBand { low_hz: 120.0, high_hz: 80.0 });
    }

    #[test]
    fn apply_keeps_shape_and_labels() {
        let sig = MultiChannelSignal::new(
            vec!["a".into(), "b".into()],
            Array2::from_shape_fn((2, 700), |(c, t)| ((c + 1) as f32 * t as f32 * 0.2).sin()),
            1000.0,
        )
        .unwrap();
        let bl = BandLimiter::new(80.0, 120.0, 1000.0).unwrap();
        let out = bl.apply(&sig).unwrap();
        assert_eq!(out.data().dim(), (2, 700));
        assert_eq!(out.labels(), sig.labels());
        assert_eq!(out.channel(1).to_vec(), bl.apply_1d(sig.channel(1)));
    }

    #[test]
    fn apply_rejects_other_sampling_rates() {
        let sig = MultiChannelSignal::new(vec!["a".into()], Array2::zeros((1, 500)), 500.0).unwrap();
        let bl = BandLimiter::new(80.0, 120.0, 1000.0).unwrap();
        let err = bl.apply(&sig).unwrap_err();
        assert_eq!(err, InputError::SamplingRateMismatch { expected_hz: 1000.0, found_hz: 500.0 });
    }
}
