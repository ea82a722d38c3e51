//! Detector configuration.
//!
//! [`RippleConfig`] holds every tunable parameter of the ripple detector.
//! All fields have defaults matching the published detection criteria
//! (80–120 Hz band, 20 ms RMS window, 2.5–9 SD amplitude window,
//! 38–500 ms duration window).
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::DurationBounds;
use crate::error::ConfigError;

/// Configuration for ripple detection.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use ieeg_ripples::RippleConfig;
///
/// let cfg = RippleConfig {
///     low_cutoff_hz:  100.0,   // narrower band
///     sd_lower_cutoff: 3.0,    // stricter amplitude criterion
///     ..RippleConfig::default()
/// };
/// assert!(cfg.validate(1000.0).is_ok());
/// ```
///
/// The same fields can be read from TOML; omitted keys keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RippleConfig {
    /// Lower edge of the ripple pass band in Hz.
    ///
    /// Default: `80.0` Hz.
    pub low_cutoff_hz: f64,

    /// Upper edge of the ripple pass band in Hz.  Must stay below Nyquist.
    ///
    /// Default: `120.0` Hz.
    pub high_cutoff_hz: f64,

    /// Length of the moving-RMS window in seconds.
    ///
    /// Converted to `round(smoothing_window_s · sfreq)` samples, at least 1.
    ///
    /// Default: `0.02` s.
    pub smoothing_window_s: f64,

    /// Lower amplitude cutoff, in standard deviations above the envelope mean.
    ///
    /// Default: `2.5`.
    pub sd_lower_cutoff: f64,

    /// Upper amplitude cutoff, in standard deviations above the envelope mean.
    /// Envelope excursions at or above it are treated as artefacts.
    ///
    /// Default: `9.0`.
    pub sd_upper_cutoff: f64,

    /// Events must be strictly longer than this (seconds).
    ///
    /// Default: `0.038` s (three cycles at 80 Hz).
    pub min_ripple_length_s: f64,

    /// Events must be strictly shorter than this (seconds).
    ///
    /// Default: `0.5` s.
    pub max_ripple_length_s: f64,

    /// Worker threads used across channels.
    ///
    /// `None` uses the global rayon pool (one worker per core).
    ///
    /// Default: `None`.
    pub n_threads: Option<usize>,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            low_cutoff_hz: 80.0,
            high_cutoff_hz: 120.0,
            smoothing_window_s: 0.02,
            sd_lower_cutoff: 2.5,
            sd_upper_cutoff: 9.0,
            min_ripple_length_s: 0.038,
            max_ripple_length_s: 0.5,
            n_threads: None,
        }
    }
}

impl RippleConfig {
    /// Parse a TOML document.  Unknown keys are rejected.
    ///
    /// ```
    /// use ieeg_ripples::RippleConfig;
    /// let cfg = RippleConfig::from_toml_str("sd_lower_cutoff = 3.0").unwrap();
    /// assert_eq!(cfg.sd_lower_cutoff, 3.0);
    /// assert_eq!(cfg.high_cutoff_hz, 120.0);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to parse ripple configuration")
    }

    /// Read a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Check every parameter against the recording's sampling rate.
    pub fn validate(&self, sfreq: f64) -> Result<(), ConfigError> {
        positive("low_cutoff_hz", self.low_cutoff_hz)?;
        positive("high_cutoff_hz", self.high_cutoff_hz)?;
        positive("smoothing_window_s", self.smoothing_window_s)?;
        positive("sd_lower_cutoff", self.sd_lower_cutoff)?;
        positive("sd_upper_cutoff", self.sd_upper_cutoff)?;
        positive("min_ripple_length_s", self.min_ripple_length_s)?;
        positive("max_ripple_length_s", self.max_ripple_length_s)?;

        let nyquist = sfreq / 2.0;
        for (name, value) in [
            ("low_cutoff_hz", self.low_cutoff_hz),
            ("high_cutoff_hz", self.high_cutoff_hz),
        ] {
            if value >= nyquist {
                return Err(ConfigError::CutoffAboveNyquist { name, value_hz: value, nyquist_hz: nyquist });
            }
        }
        if self.low_cutoff_hz >= self.high_cutoff_hz {
            return Err(ConfigError::EmptyBand {
                low_hz: self.low_cutoff_hz,
                high_hz: self.high_cutoff_hz,
            });
        }
        if self.min_ripple_length_s >= self.max_ripple_length_s {
            return Err(ConfigError::EmptyDurationRange {
                min_s: self.min_ripple_length_s,
                max_s: self.max_ripple_length_s,
            });
        }
        if self.sd_lower_cutoff >= self.sd_upper_cutoff {
            return Err(ConfigError::EmptySdRange {
                lower: self.sd_lower_cutoff,
                upper: self.sd_upper_cutoff,
            });
        }
        if self.n_threads == Some(0) {
            return Err(ConfigError::NonPositive { name: "n_threads", value: 0.0 });
        }
        Ok(())
    }

    /// Moving-RMS window length in samples: `round(smoothing_window_s · sfreq)`, at least 1.
    ///
    /// ```
    /// use ieeg_ripples::RippleConfig;
    /// assert_eq!(RippleConfig::default().smoothing_window_samples(1000.0), 20);
    /// ```
    pub fn smoothing_window_samples(&self, sfreq: f64) -> usize {
        crate::envelope::window_samples(self.smoothing_window_s, sfreq)
    }

    /// Duration window converted to samples at `sfreq`.
    pub fn duration_bounds(&self, sfreq: f64) -> DurationBounds {
        DurationBounds::from_seconds(self.min_ripple_length_s, self.max_ripple_length_s, sfreq)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_at_common_rates() {
        for sfreq in [500.0, 512.0, 1000.0, 1024.0, 2048.0] {
            RippleConfig::default().validate(sfreq).unwrap();
        }
    }

    #[test]
    fn band_must_sit_below_nyquist() {
        // 200 Hz: Nyquist = 100 Hz, so 120 Hz is aliased.
        let err = RippleConfig::default().validate(200.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::CutoffAboveNyquist { name: "high_cutoff_hz", value_hz: 120.0, nyquist_hz: 100.0 }
        );
        // Exactly at Nyquist is rejected too.
        let err = RippleConfig::default().validate(240.0).unwrap_err();
        assert!(matches!(err, ConfigError::CutoffAboveNyquist { .. }));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let cfg = RippleConfig { low_cutoff_hz: 120.0, high_cutoff_hz: 80.0, ..Default::default() };
        assert!(matches!(cfg.validate(1000.0), Err(ConfigError::EmptyBand { .. })));

        let cfg = RippleConfig { min_ripple_length_s: 0.5, ..Default::default() };
        assert!(matches!(cfg.validate(1000.0), Err(ConfigError::EmptyDurationRange { .. })));

        let cfg = RippleConfig { sd_lower_cutoff: 9.0, ..Default::default() };
        assert!(matches!(cfg.validate(1000.0), Err(ConfigError::EmptySdRange { .. })));
    }

    #[test]
    fn non_positive_values_are_rejected() {
        let cfg = RippleConfig { smoothing_window_s: 0.0, ..Default::default() };
        assert_eq!(
            cfg.validate(1000.0).unwrap_err(),
            ConfigError::NonPositive { name: "smoothing_window_s", value: 0.0 }
        );
        let cfg = RippleConfig { sd_lower_cutoff: -1.0, ..Default::default() };
        assert!(matches!(cfg.validate(1000.0), Err(ConfigError::NonPositive { name: "sd_lower_cutoff", .. })));
        let cfg = RippleConfig { n_threads: Some(0), ..Default::default() };
        assert!(matches!(cfg.validate(1000.0), Err(ConfigError::NonPositive { name: "n_threads", .. })));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(RippleConfig::from_toml_str("sd_cutoff = 3").is_err());
        let cfg = RippleConfig::from_toml_str("n_threads = 4\nmax_ripple_length_s = 0.25").unwrap();
        assert_eq!(cfg.n_threads, Some(4));
        assert_eq!(cfg.max_ripple_length_s, 0.25);
        assert_eq!(cfg.low_cutoff_hz, 80.0);
    }
}
