//! Overlap-add zero-phase FIR convolution.
//!
//! Matches MNE's `_overlap_add_filter` + `_1d_overlap_filter`.
//!
//! Zero-phase is achieved by shifting the output left by `(N-1)/2` samples
//! (the group delay of a symmetric kernel), NOT by running filtfilt, so the
//! magnitude response is applied once.  The edge transient is suppressed by
//! reflect-limited padding of `N-1` samples on each side.
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::InputError;

/// A kernel planned for one signal length.
///
/// The FFT plans and the kernel spectrum are computed once and reused for
/// every channel; the struct is `Send + Sync` so channel workers can share it.
pub struct OverlapAdd {
    n_h: usize,
    n_x: usize,
    n_fft: usize,
    h_fft: Vec<Complex<f32>>,
    fwd: Arc<dyn Fft<f32>>,
    inv: Arc<dyn Fft<f32>>,
}

impl OverlapAdd {
    /// Plan kernel `h` (odd length) for signals of `n_x` samples.
    pub fn new(h: &[f32], n_x: usize) -> Self {
        let n_h = h.len();
        debug_assert!(n_h % 2 == 1, "zero-phase FIR needs an odd number of taps");
        let n_ext = n_x + 2 * (n_h - 1);
        let n_fft = choose_fft_len(n_h, n_ext);

        let mut planner: FftPlanner<f32> = FftPlanner::new();
        let fwd = planner.plan_fft_forward(n_fft);
        let inv = planner.plan_fft_inverse(n_fft);

        let mut h_fft = zero_padded(h, n_fft);
        fwd.process(&mut h_fft);

        Self { n_h, n_x, n_fft, h_fft, fwd, inv }
    }

    /// Signal length this plan was built for.
    pub fn signal_len(&self) -> usize {
        self.n_x
    }

    /// Filter one channel.
    ///
    /// Returns a vector of the same length as `x`.
    ///
    /// # Errors
    ///
    /// [`InputError::SignalLengthMismatch`] when `x.len()` differs from
    /// [`signal_len`](Self::signal_len).
    pub fn filter(&self, x: &[f32]) -> Result<Vec<f32>, InputError> {
        if x.len() != self.n_x {
            return Err(InputError::SignalLengthMismatch { expected: self.n_x, found: x.len() });
        }
        Ok(self.filter_planned(x))
    }

    /// [`filter`](Self::filter) for an `x` already known to match the plan.
    fn filter_planned(&self, x: &[f32]) -> Vec<f32> {
        if x.is_empty() {
            return vec![];
        }

        let shift = (self.n_h - 1) / 2;
        let n_edge = self.n_h - 1;

        let x_ext = reflect_limited_pad(x, n_edge, n_edge);
        let n_ext = x_ext.len();

        let n_seg = self.n_fft - self.n_h + 1;
        let inv_scale = 1.0 / self.n_fft as f32;
        let mut acc = vec![0.0_f32; n_ext];

        for start in (0..n_ext).step_by(n_seg) {
            let stop = (start + n_seg).min(n_ext);

            let mut buf = zero_padded(&x_ext[start..stop], self.n_fft);
            self.fwd.process(&mut buf);
            for (b, &hf) in buf.iter_mut().zip(&self.h_fft) {
                *b *= hf;
            }
            self.inv.process(&mut buf);

            // Accumulate, moving every product sample `shift` to the left.
            let out_start = start.saturating_sub(shift);
            let out_end = (out_start + self.n_fft).min(n_ext);
            let prod_start = shift.saturating_sub(start);
            for (o, b) in acc[out_start..out_end].iter_mut().zip(&buf[prod_start..]) {
                *o += b.re * inv_scale;
            }
        }

        acc[n_edge..n_edge + self.n_x].to_vec()
    }
}

/// Filter a single 1-D signal with a zero-phase FIR kernel `h` (odd length).
///
/// Convenience wrapper that plans the FFT for this call only; use
/// [`OverlapAdd`] when filtering many channels of the same length.
pub fn filter_1d(x: &[f32], h: &[f32]) -> Vec<f32> {
    OverlapAdd::new(h, x.len()).filter_planned(x)
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn zero_padded(x: &[f32], n: usize) -> Vec<Complex<f32>> {
    x.iter()
        .map(|&v| Complex { re: v, im: 0.0 })
        .chain(std::iter::repeat(Complex::default()))
        .take(n)
        .collect()
}

/// Reflect-limited padding (matches MNE's `_smart_pad`).
///
/// Left:  `pad[i] = 2*x[0] - x[n_l-i]`  for i in 1..=n_l
/// Right: `pad[i] = 2*x[-1] - x[-(i+1)]` for i in 1..=n_r
///
/// Whatever does not fit inside the signal (`n_l > len - 1`) is zero-filled
/// on the outside.
pub(crate) fn reflect_limited_pad(x: &[f32], n_l: usize, n_r: usize) -> Vec<f32> {
    let n = x.len();
    let actual_l = n_l.min(n - 1);
    let actual_r = n_r.min(n - 1);
    let first = x[0];
    let last = x[n - 1];

    let mut out = Vec::with_capacity(n_l + n + n_r);
    out.extend(std::iter::repeat(0.0).take(n_l - actual_l));
    out.extend((1..=actual_l).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=actual_r).map(|i| 2.0 * last - x[n - 1 - i]));
    out.extend(std::iter::repeat(0.0).take(n_r - actual_r));
    out
}

/// Choose the optimal FFT block size (power of 2 minimising operation count).
///
/// Matches MNE's cost function:
///   `cost = ceil(n_x / (N - n_h + 1)) * N * (log2(N) + 1) + 4e-5 * N * n_x`
fn choose_fft_len(n_h: usize, n_x: usize) -> usize {
    let min_fft = 2 * n_h - 1;
    let min_pow = (min_fft as f64).log2().ceil() as u32;
    let max_pow = ((n_x as f64).log2().ceil() as u32 + 1).max(min_pow);

    (min_pow..=max_pow)
        .map(|pow| {
            let n = 1_usize << pow;
            let n_seg = (n - n_h + 1) as f64;
            let cost = (n_x as f64 / n_seg).ceil() * n as f64 * (pow as f64 + 1.0)
                + 4e-5 * n as f64 * n_x as f64;
            (n, cost)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(1 << max_pow, |(n, _)| n)
}
