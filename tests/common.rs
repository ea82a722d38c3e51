/// Shared synthetic-signal builders for the integration tests.
use ieeg_ripples::MultiChannelSignal;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

#[allow(unused)]
pub const SFREQ: f64 = 1000.0;

#[allow(unused)]
/// Zeros of length `n`.
pub fn silence(n: usize) -> Vec<f32> {
    vec![0.0; n]
}

#[allow(unused)]
/// Seeded uniform noise in `[-amp, amp)`.
pub fn noise(n: usize, amp: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-amp..amp)).collect()
}

#[allow(unused)]
/// Add a sinusoid of `freq_hz` and amplitude `amp` on samples `[start, start + len)`.
pub fn add_burst(x: &mut [f32], sfreq: f64, start: usize, len: usize, freq_hz: f32, amp: f32) {
    for (i, v) in x[start..start + len].iter_mut().enumerate() {
        let t = i as f32 / sfreq as f32;
        *v += amp * (2.0 * PI * freq_hz * t).sin();
    }
}

#[allow(unused)]
/// A full-length sinusoid.
pub fn tone(n: usize, sfreq: f64, freq_hz: f32, amp: f32) -> Vec<f32> {
    let mut x = vec![0.0; n];
    add_burst(&mut x, sfreq, 0, n, freq_hz, amp);
    x
}

#[allow(unused)]
/// Build a signal from `(label, samples)` pairs.
pub fn signal(channels: Vec<(&str, Vec<f32>)>, sfreq: f64) -> MultiChannelSignal {
    MultiChannelSignal::from_channels(
        channels.into_iter().map(|(l, x)| (l.to_string(), x)).collect(),
        sfreq,
    )
    .unwrap()
}

#[allow(unused)]
/// RMS of a slice.
pub fn rms(x: &[f32]) -> f32 {
    (x.iter().map(|v| v * v).sum::<f32>() / x.len() as f32).sqrt()
}
