//! Moving-RMS amplitude envelope.
//!
//! `env[i] = sqrt(mean(x[j]²  for j in max(0, i-w+1) ..= i))`
//!
//! The window trails the current sample (a rolling mean with
//! `min_periods = 1`).  Near the start of the record the mean is taken over
//! the samples that exist rather than zero-padding, so the envelope is not
//! artificially depressed at the edge.
use ndarray::Array2;

use crate::signal::MultiChannelSignal;

/// Window length in samples: `round(window_s · sfreq)`, at least 1.
pub fn window_samples(window_s: f64, sfreq: f64) -> usize {
    ((window_s * sfreq).round() as usize).max(1)
}

/// Moving RMS of `x` over a trailing window of `window` samples.
///
/// Output has the same length as `x`; every value is ≥ 0.
pub fn moving_rms(x: &[f32], window: usize) -> Vec<f32> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(x.len());
    let mut sum_sq = 0.0_f64;

    for (i, &v) in x.iter().enumerate() {
        sum_sq += (v as f64) * (v as f64);
        if i >= window {
            let old = x[i - window] as f64;
            sum_sq -= old * old;
        }
        let count = (i + 1).min(window) as f64;
        // Running subtraction can leave a tiny negative residue.
        out.push((sum_sq / count).max(0.0).sqrt() as f32);
    }
    out
}

/// Envelope of every channel of a band-limited signal, shape `[C, T]`.
pub fn envelope(band_limited: &MultiChannelSignal, window_s: f64) -> Array2<f32> {
    let w = window_samples(window_s, band_limited.sfreq());
    let mut out = Array2::<f32>::zeros(band_limited.data().dim());
    for (src, mut dst) in band_limited.data().rows().into_iter().zip(out.rows_mut()) {
        let env = moving_rms(&src.to_vec(), w);
        dst.assign(&ndarray::ArrayView1::from(&env));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_rounded_and_clamped() {
        assert_eq!(window_samples(0.02, 1000.0), 20);
        assert_eq!(window_samples(0.02, 1024.0), 20); // 20.48
        assert_eq!(window_samples(0.02, 2048.0), 41); // 40.96
        assert_eq!(window_samples(1e-6, 1000.0), 1);
    }

    #[test]
    fn leading_edge_averages_available_samples() {
        let x = [3.0_f32, 4.0, 0.0, 0.0];
        let env = moving_rms(&x, 3);
        approx::assert_abs_diff_eq!(env[0], 3.0, epsilon = 1e-6_f32);
        approx::assert_abs_diff_eq!(env[1], (12.5_f32).sqrt(), epsilon = 1e-6_f32);
        approx::assert_abs_diff_eq!(env[2], (25.0_f32 / 3.0).sqrt(), epsilon = 1e-6_f32);
        approx::assert_abs_diff_eq!(env[3], 4.0 / 3.0_f32.sqrt(), epsilon = 1e-6_f32);
    }

    #[test]
    fn window_of_one_is_absolute_value() {
        let x = [-2.0_f32, 0.5, -0.25];
        assert_eq!(moving_rms(&x, 1), vec![2.0, 0.5, 0.25]);
        assert_eq!(moving_rms(&x, 0), vec![2.0, 0.5, 0.25]);
    }

    #[test]
    fn sine_rms_is_amplitude_over_sqrt2() {
        // Window spans whole periods: 100 Hz at 1000 Hz, 20 samples = 2 cycles.
        let x: Vec<f32> = (0..1000)
            .map(|i| 2.0 * (2.0 * std::f32::consts::PI * 100.0 * i as f32 / 1000.0).sin())
            .collect();
        let env = moving_rms(&x, 20);
        for &v in &env[20..] {
            approx::assert_abs_diff_eq!(v, std::f32::consts::SQRT_2, epsilon = 1e-4_f32);
        }
    }

    #[test]
    fn envelope_is_non_negative_after_large_transient() {
        let mut x = vec![0.0_f32; 200];
        x[50] = 1e6;
        let env = moving_rms(&x, 10);
        assert_eq!(env.len(), x.len());
        assert!(env.iter().all(|&v| v >= 0.0 && v.is_finite()));
        assert!(env[100] < 1e-3);
    }
}
