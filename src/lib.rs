//! # ieeg-ripples — ripple detection for intracranial EEG
//!
//! `ieeg-ripples` detects ripples (short 80–120 Hz oscillatory bursts) in
//! continuous multi-channel intracranial recordings.  The band-pass design
//! follows MNE-Python's automatic FIR rules so results line up with the
//! usual Python workflow.
//!
//! ## Pipeline overview
//!
//! ```text
//! MultiChannelSignal [C, T]
//!   │
//!   ├─ filter::BandLimiter     zero-phase FIR band-pass (80–120 Hz)
//!   ├─ envelope::moving_rms    20 ms trailing RMS
//!   ├─ threshold               μ + 2.5σ  <  env  <  μ + 9σ   (per channel)
//!   ├─ segment                 two-state scan → [start, end) runs
//!   ├─ duration                38 ms  <  run  <  500 ms
//!   └─ catalog                 EventCatalog (samples + seconds, per channel)
//! ```
//!
//! Channels are independent after the shared input is read and are
//! processed on a rayon worker pool.
//!
//! ## Quick start
//!
//! ```
//! use ieeg_ripples::{detect_ripples, MultiChannelSignal, RippleConfig};
//!
//! let sfreq = 1000.0;
//! let burst: Vec<f32> = (0..4000)
//!     .map(|i| {
//!         let t = i as f32 / sfreq as f32;
//!         if (2000..2100).contains(&i) { (2.0 * std::f32::consts::PI * 100.0 * t).sin() } else { 0.0 }
//!     })
//!     .collect();
//! let signal = MultiChannelSignal::from_channels(vec![("LA1".into(), burst)], sfreq).unwrap();
//!
//! let catalog = detect_ripples(&signal, &RippleConfig::default()).unwrap();
//! for ev in catalog.events("LA1") {
//!     println!("{:.3}–{:.3} s ({:.0} ms)", ev.start_time_s, ev.end_time_s, ev.duration_s * 1e3);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod detect;
pub mod duration;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod io;
pub mod segment;
pub mod signal;
pub mod sta;
pub mod threshold;

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

// ── Crate-root re-exports ─────────────────────────────────────────────────

pub use catalog::{ChannelEvents, ChannelStatus, EventCatalog, RippleEvent, SkipReason};
pub use config::RippleConfig;
pub use detect::{detect_channel, detect_in_envelope, ChannelContext};
pub use duration::DurationBounds;
pub use envelope::{envelope, moving_rms, window_samples};
pub use error::{ConfigError, DetectError, InputError};
pub use filter::{design_bandpass, filter_1d, BandLimiter, OverlapAdd};
pub use segment::{band_mask, runs_from_mask, segment, RawRun};
pub use signal::MultiChannelSignal;
pub use sta::{event_triggered_average, ripple_triggered_average, TriggeredAverage};
pub use threshold::ThresholdPair;

/// Detect ripples on every channel of `signal`.
///
/// This is the main entry point of the library.
///
/// # Pipeline steps (per channel)
///
/// 1. Skip the channel if its raw samples are constant.
/// 2. Band-limit to `[low_cutoff_hz, high_cutoff_hz]` with a zero-phase FIR.
/// 3. Moving RMS over `smoothing_window_s`.
/// 4. Thresholds `μ + sd_lower_cutoff·σ` and `μ + sd_upper_cutoff·σ`; skip the
///    channel if σ is zero.
/// 5. Segment samples strictly between the thresholds into runs.
/// 6. Keep runs strictly between `min_ripple_length_s` and `max_ripple_length_s`.
///
/// # Errors
///
/// [`DetectError::Config`] for parameters that are invalid at the signal's
/// sampling rate.  Degenerate channels are not errors; they are returned
/// with [`ChannelStatus::Skipped`].
pub fn detect_ripples(signal: &MultiChannelSignal, cfg: &RippleConfig) -> Result<EventCatalog, DetectError> {
    detect_ripples_cancellable(signal, cfg, &AtomicBool::new(false))
}

/// [`detect_ripples`] with cooperative cancellation.
///
/// `cancel` is checked before each channel starts.  Once it is raised no
/// further channel is started, and the call returns
/// [`DetectError::Cancelled`] unless every channel had already been
/// processed; a partial catalog is never returned.
pub fn detect_ripples_cancellable(
    signal: &MultiChannelSignal,
    cfg: &RippleConfig,
    cancel: &AtomicBool,
) -> Result<EventCatalog, DetectError> {
    let sfreq = signal.sfreq();
    cfg.validate(sfreq)?;

    let band_limiter = BandLimiter::from_config(cfg, sfreq)?;
    let ctx = ChannelContext {
        cfg,
        sfreq,
        window: cfg.smoothing_window_samples(sfreq),
        band: band_limiter.plan(signal.n_samples()),
    };

    let run = || -> Vec<Option<Result<ChannelEvents, InputError>>> {
        signal
            .labels()
            .par_iter()
            .enumerate()
            .map(|(ch, label)| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                // Rows of a standard-layout record are contiguous.
                let row = signal.channel(ch);
                let raw = match row.to_slice() {
                    Some(s) => Cow::Borrowed(s),
                    None => Cow::Owned(row.to_vec()),
                };
                Some(detect_channel(label, &raw, &ctx))
            })
            .collect()
    };

    let results = match cfg.n_threads {
        Some(n) => rayon::ThreadPoolBuilder::new().num_threads(n).build()?.install(run),
        None => run(),
    };

    let channels = results
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(DetectError::Cancelled)?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let catalog = EventCatalog::new(sfreq, signal.n_samples(), channels);
    log::info!(
        "{} channels × {} samples @ {} Hz: {} ripples, {} channels skipped",
        signal.n_channels(),
        signal.n_samples(),
        sfreq,
        catalog.total_events(),
        catalog.skipped().count(),
    );
    Ok(catalog)
}
