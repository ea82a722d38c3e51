use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use ieeg_ripples::{
    detect_ripples, envelope::moving_rms, filter::BandLimiter, segment::runs_from_mask,
    MultiChannelSignal, RippleConfig,
};
use ndarray::Array2;

const SFREQ: f64 = 1000.0;

/// 16 channels × 60 s of a slow chirp with periodic 100 Hz bursts.
fn synthetic(n_ch: usize, n_t: usize) -> MultiChannelSignal {
    let data = Array2::from_shape_fn((n_ch, n_t), |(c, t)| {
        let ts = t as f32 / SFREQ as f32;
        let slow = (2.0 * std::f32::consts::PI * (3.0 + c as f32) * ts).sin();
        let burst = if (t + 97 * c) % 5000 < 80 {
            (2.0 * std::f32::consts::PI * 100.0 * ts).sin()
        } else {
            0.0
        };
        0.2 * slow + burst
    });
    let labels = (0..n_ch).map(|c| format!("ch{c}")).collect();
    MultiChannelSignal::new(labels, data, SFREQ).unwrap()
}

fn bench_detect(c: &mut Criterion) {
    let sig = synthetic(16, 60_000);
    let cfg = RippleConfig::default();
    c.bench_function("detect_ripples [16×60000]", |b| {
        b.iter(|| {
            let cat = detect_ripples(black_box(&sig), &cfg).unwrap();
            black_box(cat.total_events())
        })
    });
}

fn bench_bandpass(c: &mut Criterion) {
    let sig = synthetic(1, 60_000);
    let x = sig.channel(0).to_vec();
    let bl = BandLimiter::new(80.0, 120.0, SFREQ).unwrap();
    let plan = bl.plan(x.len());
    c.bench_function("band-pass 1 ch × 60 s (planned)", |b| {
        b.iter(|| black_box(plan.filter(black_box(&x)).unwrap()))
    });
}

fn bench_envelope_and_segment(c: &mut Criterion) {
    let sig = synthetic(1, 60_000);
    let x = sig.channel(0).to_vec();
    c.bench_function("moving_rms + segment 1 ch × 60 s", |b| {
        b.iter(|| {
            let env = moving_rms(black_box(&x), 20);
            black_box(runs_from_mask(env.iter().map(|&v| v > 0.5 && v < 2.0)).len())
        })
    });
}

criterion_group!(benches, bench_detect, bench_bandpass, bench_envelope_and_segment);
criterion_main!(benches);
