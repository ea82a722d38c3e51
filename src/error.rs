//! Error taxonomy.
//!
//! [`ConfigError`] and [`InputError`] are fatal to a detection call and are
//! raised before any channel is processed.  A degenerate channel is *not* an
//! error: it is reported as [`crate::ChannelStatus::Skipped`] in the catalog.
use thiserror::Error;

/// Invalid detection parameters, usually relative to the sampling rate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A band edge sits at or above the Nyquist frequency.
    #[error("{name} = {value_hz} Hz must be below the Nyquist frequency ({nyquist_hz} Hz)")]
    CutoffAboveNyquist {
        name: &'static str,
        value_hz: f64,
        nyquist_hz: f64,
    },

    /// `low_cutoff_hz >= high_cutoff_hz`.
    #[error("empty pass band: low cutoff {low_hz} Hz >= high cutoff {high_hz} Hz")]
    EmptyBand { low_hz: f64, high_hz: f64 },

    /// A parameter that must be strictly positive and finite is not.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// `min_ripple_length_s >= max_ripple_length_s`.
    #[error("empty duration range: min {min_s} s >= max {max_s} s")]
    EmptyDurationRange { min_s: f64, max_s: f64 },

    /// `sd_lower_cutoff >= sd_upper_cutoff`.
    #[error("empty amplitude range: lower SD cutoff {lower} >= upper SD cutoff {upper}")]
    EmptySdRange { lower: f64, upper: f64 },
}

/// Malformed input recording.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("recording has no channels")]
    NoChannels,

    #[error("recording has no samples")]
    NoSamples,

    #[error("{labels} channel labels supplied for {rows} data rows")]
    LabelCountMismatch { labels: usize, rows: usize },

    #[error("duplicate channel label '{0}'")]
    DuplicateLabel(String),

    #[error("channel '{label}' has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("sampling rate must be positive and finite, got {0}")]
    InvalidSamplingRate(f64),

    #[error("channel '{label}' has a non-finite sample at index {index}")]
    NonFiniteSample { label: String, index: usize },

    /// A channel handed to a filter plan built for another length.
    #[error("signal has {found} samples, filter was planned for {expected}")]
    SignalLengthMismatch { expected: usize, found: usize },

    /// A signal handed to a filter designed for another rate.
    #[error("filter designed for {expected_hz} Hz applied to a {found_hz} Hz signal")]
    SamplingRateMismatch { expected_hz: f64, found_hz: f64 },
}

/// Any failure of [`crate::detect_ripples`].
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// The cancellation flag was raised before every channel had been run.
    #[error("detection cancelled")]
    Cancelled,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
