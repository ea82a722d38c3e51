//! Event-triggered averaging.
//!
//! Cuts a fixed window `[onset − pre, onset + post)` around every event of
//! one channel, stacks the windows into `[E, pre + post]` and averages across
//! events.  Windows that would run past either end of the record are dropped.
use ndarray::{s, Array1, Array2, ArrayView1, Axis};

use crate::catalog::EventCatalog;
use crate::signal::MultiChannelSignal;

/// Average of the event-locked windows and its standard error.
#[derive(Debug, Clone)]
pub struct TriggeredAverage {
    /// Per-sample mean across events, length `pre + post`.
    pub mean: Array1<f32>,
    /// Per-sample standard error (population SD / √n_events).
    pub sem: Array1<f32>,
    /// Number of events whose window fit inside the record.
    pub n_events: usize,
    /// Samples before the onset (the onset is at index `n_pre`).
    pub n_pre: usize,
}

/// Stack the windows around `onsets_s` into `[E, n_pre + n_post]`.
///
/// Onset index is `floor(onset · sfreq)`; window lengths are
/// `floor(pre_s · sfreq)` and `floor(post_s · sfreq)`.
pub fn event_locked_windows(
    x: ArrayView1<'_, f32>,
    onsets_s: &[f64],
    sfreq: f64,
    pre_s: f64,
    post_s: f64,
) -> Array2<f32> {
    let n_pre = (pre_s * sfreq) as usize;
    let n_post = (post_s * sfreq) as usize;
    let width = n_pre + n_post;
    let n_t = x.len();

    let starts: Vec<usize> = onsets_s
        .iter()
        .filter(|t| t.is_finite() && **t >= 0.0)
        .map(|&t| (t * sfreq) as usize)
        .filter(|&onset| onset >= n_pre && onset + n_post <= n_t)
        .map(|onset| onset - n_pre)
        .collect();

    let mut out = Array2::<f32>::zeros((starts.len(), width));
    for (e, &start) in starts.iter().enumerate() {
        out.slice_mut(s![e, ..]).assign(&x.slice(s![start..start + width]));
    }
    out
}

/// Event-triggered average of `x` around `onsets_s`.
///
/// Returns `None` when no window fits inside the record.
pub fn event_triggered_average(
    x: ArrayView1<'_, f32>,
    onsets_s: &[f64],
    sfreq: f64,
    pre_s: f64,
    post_s: f64,
) -> Option<TriggeredAverage> {
    let windows = event_locked_windows(x, onsets_s, sfreq, pre_s, post_s);
    let n_events = windows.nrows();
    if n_events == 0 || windows.ncols() == 0 {
        return None;
    }
    let mean = windows.mean_axis(Axis(0))?;
    let sem = windows.std_axis(Axis(0), 0.0) / (n_events as f32).sqrt();
    Some(TriggeredAverage { mean, sem, n_events, n_pre: (pre_s * sfreq) as usize })
}

/// Average `signal[label]` around the onsets of that channel's ripples.
pub fn ripple_triggered_average(
    signal: &MultiChannelSignal,
    catalog: &EventCatalog,
    label: &str,
    pre_s: f64,
    post_s: f64,
) -> Option<TriggeredAverage> {
    let x = signal.channel_by_label(label)?;
    let onsets: Vec<f64> = catalog.events(label).iter().map(|e| e.start_time_s).collect();
    event_triggered_average(x, &onsets, signal.sfreq(), pre_s, post_s)
}
