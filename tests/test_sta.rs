mod common;
use common::{add_burst, signal, silence, SFREQ};
use ieeg_ripples::{detect_ripples, ripple_triggered_average, RippleConfig};

#[test]
fn ripple_triggered_average_locks_on_onsets() {
    let mut x = silence(12_000);
    for start in [2000, 5000, 8000] {
        add_burst(&mut x, SFREQ, start, 120, 100.0, 1.0);
    }
    let sig = signal(vec![("LA1", x)], SFREQ);
    let cat = detect_ripples(&sig, &RippleConfig::default()).unwrap();
    assert_eq!(cat.events("LA1").len(), 3);

    let avg = ripple_triggered_average(&sig, &cat, "LA1", 0.2, 0.3).unwrap();
    assert_eq!(avg.n_events, 3);
    assert_eq!(avg.n_pre, 200);
    assert_eq!(avg.mean.len(), 500);

    // Silence well before the onset, burst energy right after it.
    let pre_energy: f32 = avg.mean.iter().take(150).map(|v| v * v).sum();
    let post_energy: f32 = avg.mean.iter().skip(200).take(100).map(|v| v * v).sum();
    assert!(pre_energy < 1e-6, "pre-onset energy {pre_energy}");
    assert!(post_energy > 1.0, "post-onset energy {post_energy}");
}

#[test]
fn unknown_channel_has_no_average() {
    let sig = signal(vec![("LA1", silence(1000))], SFREQ);
    let cat = detect_ripples(&sig, &RippleConfig::default()).unwrap();
    assert!(ripple_triggered_average(&sig, &cat, "RA1", 0.1, 0.1).is_none());
    // Known channel but no events.
    assert!(ripple_triggered_average(&sig, &cat, "LA1", 0.1, 0.1).is_none());
}
