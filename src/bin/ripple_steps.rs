/// ripple_steps: read a recording, run each detection stage, write every
/// intermediate array to a safetensors file for comparison against Python.
///
/// Output keys:
///   raw           [C, T]   f32  input samples
///   band          [C, T]   f32  after the zero-phase ripple band-pass
///   envelope      [C, T]   f32  moving RMS of `band`
///   thresholds    [C, 4]   f64  mean, sd, lower, upper per channel (NaN if flat)
///   mask          [C, T]   u8   lower < envelope < upper (all 0 if skipped)
///   runs_N        [R, 2]   f64  kept [start, end) sample pairs of channel N
///   taps          [N]      f32  FIR impulse response
///   ch_names      u8            newline-separated labels
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use ieeg_ripples::{
    detect::{detect_in_envelope, is_flat},
    envelope::envelope,
    filter::BandLimiter,
    io::{load_recording, StWriter},
    segment::band_mask,
    ChannelEvents, RippleConfig, SkipReason,
};

#[derive(Parser, Debug)]
#[command(name = "ripple_steps")]
struct Args {
    /// Input recording (safetensors).
    #[arg(long)]
    input: PathBuf,

    /// Output safetensors path.
    #[arg(long)]
    output: PathBuf,

    /// Optional TOML detector settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = match &args.config {
        Some(p) => RippleConfig::load(p)?,
        None => RippleConfig::default(),
    };

    // ── 1. Read ────────────────────────────────────────────────────────────
    let t_read = now();
    let signal = load_recording(&args.input)?;
    let sfreq = signal.sfreq();
    cfg.validate(sfreq)?;
    let ms_read = t_read.elapsed().as_secs_f64() * 1000.0;

    // ── 2. Band-pass ───────────────────────────────────────────────────────
    let t_bp = now();
    let limiter = BandLimiter::from_config(&cfg, sfreq)?;
    let band = limiter.apply(&signal)?;
    let ms_bp = t_bp.elapsed().as_secs_f64() * 1000.0;

    // ── 3. Envelope ────────────────────────────────────────────────────────
    let t_env = now();
    let env = envelope(&band, cfg.smoothing_window_s);
    let ms_env = t_env.elapsed().as_secs_f64() * 1000.0;

    // ── 4. Thresholds, mask, runs ──────────────────────────────────────────
    let t_seg = now();
    let mut thresholds = Vec::with_capacity(signal.n_channels() * 4);
    let mut masks = Vec::with_capacity(signal.n_channels());
    let mut channels = Vec::with_capacity(signal.n_channels());
    for (ch, (label, row)) in signal.labels().iter().zip(env.rows()).enumerate() {
        let row = row.to_vec();
        // Same skip rules as the detector: flat raw samples, then zero variance.
        let events = if is_flat(&signal.channel(ch).to_vec()) {
            ChannelEvents::skipped(label, SkipReason::FlatSignal, None)
        } else {
            detect_in_envelope(label, &row, sfreq, &cfg)
        };
        match (&events.thresholds, events.is_skipped()) {
            (Some(t), false) => masks.push(band_mask(&row, t)),
            _ => masks.push(vec![false; row.len()]),
        }
        let t = events.thresholds;
        thresholds.extend(t.map_or([f64::NAN; 4], |t| [t.mean, t.sd, t.lower, t.upper]));
        channels.push(events);
    }
    let ms_seg = t_seg.elapsed().as_secs_f64() * 1000.0;

    eprintln!(
        "TIMING read={ms_read:.4}ms bandpass={ms_bp:.4}ms envelope={ms_env:.4}ms segment={ms_seg:.4}ms",
    );
    eprintln!(
        "  {} ch  sfreq={sfreq} Hz  {} taps",
        signal.n_channels(),
        limiter.taps().len()
    );

    // ── 5. Write output ────────────────────────────────────────────────────
    eprintln!("Writing → {}", args.output.display());
    let mut w = StWriter::new();
    w.add_f32_arr2("raw", signal.data());
    w.add_f32_arr2("band", band.data());
    w.add_f32_arr2("envelope", &env);
    w.add_f64("thresholds", &thresholds, &[signal.n_channels(), 4]);
    w.add_mask("mask", &masks);
    for (i, ch) in channels.iter().enumerate() {
        let flat: Vec<f64> = ch
            .events
            .iter()
            .flat_map(|e| [e.start_sample as f64, e.end_sample as f64])
            .collect();
        w.add_f64(&format!("runs_{i}"), &flat, &[ch.events.len(), 2]);
    }
    w.add_f32("taps", limiter.taps(), &[limiter.taps().len()]);
    w.add_strings("ch_names", signal.labels());
    w.write(&args.output)?;

    eprintln!("Done.");
    Ok(())
}

/// Return `std::time::Instant::now()` (used for internal timing).
#[inline(always)]
fn now() -> std::time::Instant { std::time::Instant::now() }
