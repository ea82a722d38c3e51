//! Single-channel detection pipeline.
//!
//! ```text
//! raw channel
//!   ├─ flat?                   → Skipped(FlatSignal)
//!   ├─ band-limit              zero-phase FIR (shared plan)
//!   ├─ moving RMS              trailing window
//!   ├─ thresholds              μ + k·σ, degenerate? → Skipped(ZeroVariance)
//!   ├─ segment                 lower < env < upper, two-state scan
//!   └─ duration filter         min < len < max
//! ```
use crate::catalog::{ChannelEvents, SkipReason};
use crate::config::RippleConfig;
use crate::envelope::moving_rms;
use crate::error::InputError;
use crate::filter::OverlapAdd;
use crate::segment::segment;
use crate::threshold::ThresholdPair;

/// Everything a channel worker needs besides its own samples.
///
/// Built once per call and shared read-only by all workers.
pub struct ChannelContext<'a> {
    pub cfg: &'a RippleConfig,
    pub sfreq: f64,
    pub window: usize,
    pub band: OverlapAdd,
}

/// Run the full pipeline on one raw channel.
///
/// # Errors
///
/// [`InputError::SignalLengthMismatch`] when `raw` is not as long as the
/// band-pass plan in `ctx`.
pub fn detect_channel(label: &str, raw: &[f32], ctx: &ChannelContext<'_>) -> Result<ChannelEvents, InputError> {
    if is_flat(raw) {
        log::warn!("channel {label}: constant signal, skipped");
        return Ok(ChannelEvents::skipped(label, SkipReason::FlatSignal, None));
    }
    let band = ctx.band.filter(raw)?;
    let env = moving_rms(&band, ctx.window);
    Ok(detect_in_envelope(label, &env, ctx.sfreq, ctx.cfg))
}

/// Threshold, segment and duration-filter an already computed envelope.
///
/// Useful when the envelope comes from elsewhere (or in tests, where it can
/// be constructed exactly).
pub fn detect_in_envelope(label: &str, envelope: &[f32], sfreq: f64, cfg: &RippleConfig) -> ChannelEvents {
    let thresholds = ThresholdPair::from_envelope(envelope, cfg.sd_lower_cutoff, cfg.sd_upper_cutoff);
    if thresholds.is_degenerate() {
        log::warn!(
            "channel {label}: envelope has zero variance (mean {:.3e}), skipped",
            thresholds.mean
        );
        return ChannelEvents::skipped(label, SkipReason::ZeroVariance, Some(thresholds));
    }

    let runs = segment(envelope, &thresholds);
    let n_candidates = runs.len();
    let kept = cfg.duration_bounds(sfreq).filter(runs);

    log::debug!(
        "channel {label}: mean={:.4e} sd={:.4e} cutoffs=({:.4e}, {:.4e}) candidates={n_candidates} kept={}",
        thresholds.mean,
        thresholds.sd,
        thresholds.lower,
        thresholds.upper,
        kept.len(),
    );
    ChannelEvents::processed(label, thresholds, &kept, sfreq)
}

/// True when every sample equals the first (or there are none).
pub fn is_flat(x: &[f32]) -> bool {
    match x.first() {
        Some(&first) => x.iter().all(|&v| v == first),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ChannelStatus;

    /// Zeros with a plateau of `height` over `[start, start + len)`.
    fn plateau(n: usize, start: usize, len: usize, height: f32) -> Vec<f32> {
        let mut env = vec![0.0_f32; n];
        env[start..start + len].fill(height);
        env
    }

    #[test]
    fn plateau_is_one_event() {
        let cfg = RippleConfig::default();
        let env = plateau(2000, 700, 100, 1.0);
        let ch = detect_in_envelope("x", &env, 1000.0, &cfg);
        assert_eq!(ch.status, ChannelStatus::Processed);
        assert_eq!(ch.events.len(), 1);
        assert_eq!((ch.events[0].start_sample, ch.events[0].end_sample), (700, 800));
    }

    #[test]
    fn constant_envelope_is_skipped() {
        let cfg = RippleConfig::default();
        let ch = detect_in_envelope("x", &vec![0.25; 500], 1000.0, &cfg);
        assert_eq!(ch.status, ChannelStatus::Skipped(SkipReason::ZeroVariance));
        assert!(ch.events.is_empty());
        assert!(ch.thresholds.is_some());
    }

    #[test]
    fn channel_shorter_than_the_plan_is_an_error() {
        let cfg = RippleConfig::default();
        let ctx = ChannelContext {
            cfg: &cfg,
            sfreq: 1000.0,
            window: cfg.smoothing_window_samples(1000.0),
            band: crate::filter::BandLimiter::from_config(&cfg, 1000.0).unwrap().plan(2000),
        };
        let raw: Vec<f32> = (0..1500).map(|i| (i as f32 * 0.6).sin()).collect();
        let err = detect_channel("x", &raw, &ctx).unwrap_err();
        assert_eq!(err, InputError::SignalLengthMismatch { expected: 2000, found: 1500 });
    }

    #[test]
    fn flat_detection() {
        assert!(is_flat(&[]));
        assert!(is_flat(&[2.0, 2.0, 2.0]));
        assert!(!is_flat(&[2.0, 2.0, 2.5]));
    }
}
