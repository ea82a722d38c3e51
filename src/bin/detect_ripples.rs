use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use ieeg_ripples::{detect_ripples, io, RippleConfig};

#[derive(Parser)]
#[command(name = "detect_ripples", about = "Ripple detection for continuous iEEG recordings")]
struct Args {
    /// recording.safetensors (`data` [C, T], `sfreq`, optional `ch_names`)
    #[arg(long)]
    input: PathBuf,

    /// JSON catalog output path
    #[arg(long)]
    output: PathBuf,

    /// TOML file with detector settings (defaults for omitted keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lower pass-band edge in Hz
    #[arg(long)]
    low_cutoff: Option<f64>,

    /// Upper pass-band edge in Hz
    #[arg(long)]
    high_cutoff: Option<f64>,

    /// Moving-RMS window in seconds
    #[arg(long)]
    smoothing_window: Option<f64>,

    /// Lower amplitude cutoff in SD above the mean
    #[arg(long)]
    sd_lower: Option<f64>,

    /// Upper amplitude cutoff in SD above the mean
    #[arg(long)]
    sd_upper: Option<f64>,

    /// Minimum ripple length in seconds (exclusive)
    #[arg(long)]
    min_length: Option<f64>,

    /// Maximum ripple length in seconds (exclusive)
    #[arg(long)]
    max_length: Option<f64>,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,
}

impl Args {
    fn config(&self) -> Result<RippleConfig> {
        let mut cfg = match &self.config {
            Some(path) => RippleConfig::load(path)?,
            None => RippleConfig::default(),
        };
        let overrides = [
            (self.low_cutoff, &mut cfg.low_cutoff_hz),
            (self.high_cutoff, &mut cfg.high_cutoff_hz),
            (self.smoothing_window, &mut cfg.smoothing_window_s),
            (self.sd_lower, &mut cfg.sd_lower_cutoff),
            (self.sd_upper, &mut cfg.sd_upper_cutoff),
            (self.min_length, &mut cfg.min_ripple_length_s),
            (self.max_length, &mut cfg.max_ripple_length_s),
        ];
        for (value, field) in overrides {
            if let Some(v) = value {
                *field = v;
            }
        }
        if self.threads.is_some() {
            cfg.n_threads = self.threads;
        }
        Ok(cfg)
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let cfg = args.config()?;

    let signal = io::load_recording(&args.input)?;
    log::info!(
        "loaded {} ch × {} samples @ {} Hz from {}",
        signal.n_channels(),
        signal.n_samples(),
        signal.sfreq(),
        args.input.display()
    );

    let catalog = detect_ripples(&signal, &cfg)?;
    for ch in catalog.iter() {
        match ch.status {
            ieeg_ripples::ChannelStatus::Processed => println!(
                "{:<16} {:>5} ripples  ({:.3} /s)",
                ch.label,
                ch.events.len(),
                catalog.event_rate_hz(&ch.label)
            ),
            ieeg_ripples::ChannelStatus::Skipped(reason) => {
                println!("{:<16} skipped ({reason:?})", ch.label)
            }
        }
    }

    io::write_catalog_json(&catalog, &args.output)?;
    println!("Written → {}", args.output.display());
    Ok(())
}
