//! FIR band-pass design matching MNE / `scipy.signal.firwin`.
//!
//! For a band-pass `[low, high]` Hz at sampling rate `sfreq`:
//!   • lower transition band = min(max(0.25 * low, 2.0), low)
//!   • upper transition band = min(max(0.25 * high, 2.0), nyquist - high)
//!   • filter length N       = ceil(3.3 / min(transitions) * sfreq), rounded to odd
//!   • windowed-sinc design (Hamming window), −6 dB points at the middle of
//!     each transition band, unit gain at the centre of the pass band
use std::f64::consts::PI;

/// Hamming window length factor (MNE `_length_factors['hamming']`).
const HAMMING_LENGTH_FACTOR: f64 = 3.3;

/// MNE-compatible automatic transition bandwidths `(l_trans, h_trans)` in Hz.
///
/// ```
/// use ieeg_ripples::filter::auto_transition_bandwidths;
/// let (l, h) = auto_transition_bandwidths(80.0, 120.0, 1000.0);
/// assert_eq!((l, h), (20.0, 30.0));
/// ```
pub fn auto_transition_bandwidths(low_hz: f64, high_hz: f64, sfreq: f64) -> (f64, f64) {
    let nyquist = sfreq / 2.0;
    let l_trans = (0.25 * low_hz).max(2.0).min(low_hz);
    let h_trans = (0.25 * high_hz).max(2.0).min(nyquist - high_hz);
    (l_trans, h_trans)
}

/// Number of FIR taps for a given transition bandwidth.
/// Returns an odd integer (required for a symmetric, zero-phase kernel).
///
/// Formula: `ceil(3.3 / trans_bw * sfreq)` rounded up to odd.
pub fn auto_filter_length(trans_bw: f64, sfreq: f64) -> usize {
    let n_raw = ((HAMMING_LENGTH_FACTOR / trans_bw * sfreq).ceil() as usize).max(1);
    if n_raw % 2 == 0 { n_raw + 1 } else { n_raw }
}

/// Design a zero-phase band-pass FIR filter using a Hamming-windowed sinc.
///
/// Matches `mne.filter.create_filter(x, sfreq, l_freq=low_hz, h_freq=high_hz,
///   filter_length='auto', fir_window='hamming', fir_design='firwin', phase='zero')`.
///
/// The caller is responsible for `0 < low_hz < high_hz < sfreq / 2`
/// (see [`crate::RippleConfig::validate`]).
///
/// Returns the impulse response `h[N]` as `Vec<f32>`.
pub fn design_bandpass(low_hz: f64, high_hz: f64, sfreq: f64) -> Vec<f32> {
    let (l_trans, h_trans) = auto_transition_bandwidths(low_hz, high_hz, sfreq);
    let n = auto_filter_length(l_trans.min(h_trans), sfreq);

    let f1 = low_hz - l_trans / 2.0;
    let f2 = high_hz + h_trans / 2.0;

    firwin_bandpass(n, f1, f2, sfreq).into_iter().map(|v| v as f32).collect()
}

/// Hamming-windowed band-pass between the −6 dB points `f1_hz` and `f2_hz`,
/// scaled to unit gain at the centre frequency `(f1 + f2) / 2`.
pub fn firwin_bandpass(n: usize, f1_hz: f64, f2_hz: f64, sfreq: f64) -> Vec<f64> {
    assert!(n % 2 == 1, "firwin_bandpass requires odd N for a linear-phase filter");
    let alpha = (n - 1) as f64 / 2.0;
    let nyq = sfreq / 2.0;
    // Normalised to [0, 1] where 1 = Nyquist.
    let lo = f1_hz / nyq;
    let hi = f2_hz / nyq;

    let win = hamming(n);

    let mut h: Vec<f64> = win
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let x = i as f64 - alpha;
            (lowpass_sinc(hi, x) - lowpass_sinc(lo, x)) * w
        })
        .collect();

    let centre = 0.5 * (lo + hi);
    let gain: f64 = h
        .iter()
        .enumerate()
        .map(|(i, &v)| v * (PI * (i as f64 - alpha) * centre).cos())
        .sum();
    h.iter_mut().for_each(|v| *v /= gain);
    h
}

/// Ideal lowpass impulse response at normalised cutoff `fc`:
/// `sin(π·fc·x) / (π·x)`, with the `x → 0` limit `fc`.
fn lowpass_sinc(fc: f64, x: f64) -> f64 {
    if x == 0.0 { fc } else { (PI * fc * x).sin() / (PI * x) }
}

/// Hamming window of length `n`.
pub fn hamming(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}
