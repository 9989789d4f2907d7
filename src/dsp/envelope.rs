//! Envelope curves derived across a set of aligned signals.
//!
//! Every function here takes signals that share one time grid (same
//! duration and sample rate) and produces a new signal on that grid. The
//! alignment is a caller-side precondition: it always holds because every
//! spec in a collection is synthesized against the same display settings.
//! A single-signal input is not an error, it just yields a degenerate
//! (trivially equal) curve.
//!
//! The RMS curve is an instantaneous cross-signal aggregate: at each
//! sample index it is the root of the mean square across the supplied
//! signals at that index. It is NOT a sliding time-window RMS of a single
//! signal.

use crate::dsp::oscillator::SampledSignal;

/// Per-sample maximum across all supplied signals.
pub fn compute_max(signals: &[SampledSignal]) -> SampledSignal {
    let Some(first) = signals.first() else {
        return SampledSignal::default();
    };
    check_alignment(signals, first);

    let mut amplitude = vec![f64::NEG_INFINITY; first.len()];
    for signal in signals {
        for (out, &sample) in amplitude.iter_mut().zip(&signal.amplitude) {
            *out = out.max(sample);
        }
    }

    SampledSignal {
        time: first.time.clone(),
        amplitude,
    }
}

/// Per-sample minimum across all supplied signals.
pub fn compute_min(signals: &[SampledSignal]) -> SampledSignal {
    let Some(first) = signals.first() else {
        return SampledSignal::default();
    };
    check_alignment(signals, first);

    let mut amplitude = vec![f64::INFINITY; first.len()];
    for signal in signals {
        for (out, &sample) in amplitude.iter_mut().zip(&signal.amplitude) {
            *out = out.min(sample);
        }
    }

    SampledSignal {
        time: first.time.clone(),
        amplitude,
    }
}

/// Per-sample cross-signal RMS: `sqrt(mean(a_k[i]^2))` at each index `i`.
pub fn compute_rms(signals: &[SampledSignal]) -> SampledSignal {
    let Some(first) = signals.first() else {
        return SampledSignal::default();
    };
    check_alignment(signals, first);

    let mut amplitude = vec![0.0f64; first.len()];
    for signal in signals {
        for (sum, &sample) in amplitude.iter_mut().zip(&signal.amplitude) {
            *sum += sample * sample;
        }
    }
    let count = signals.len() as f64;
    for sum in &mut amplitude {
        *sum = (*sum / count).sqrt();
    }

    SampledSignal {
        time: first.time.clone(),
        amplitude,
    }
}

fn check_alignment(signals: &[SampledSignal], first: &SampledSignal) {
    debug_assert!(
        signals.iter().all(|s| s.len() == first.len()),
        "envelope inputs must share one time grid"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{generate, WaveKind};

    fn opposed_sines() -> Vec<SampledSignal> {
        let a = generate(WaveKind::Sine, 2.0, 1.0, 0.0, 50.0, 1.0, 100.0);
        let mut b = a.clone();
        for sample in &mut b.amplitude {
            *sample = -*sample;
        }
        vec![a, b]
    }

    #[test]
    fn max_and_min_of_opposed_sines_trace_the_magnitude() {
        let signals = opposed_sines();
        let max = compute_max(&signals);
        let min = compute_min(&signals);

        assert_eq!(max.time, signals[0].time);
        for i in 0..signals[0].len() {
            let magnitude = signals[0].amplitude[i].abs();
            assert!((max.amplitude[i] - magnitude).abs() < 1e-12);
            assert!((min.amplitude[i] + magnitude).abs() < 1e-12);
        }
    }

    #[test]
    fn rms_of_a_single_signal_is_its_magnitude() {
        let signal = generate(WaveKind::Sawtooth, 3.0, 2.0, 0.0, 50.0, 1.0, 100.0);
        let rms = compute_rms(std::slice::from_ref(&signal));
        for i in 0..signal.len() {
            assert!(
                (rms.amplitude[i] - signal.amplitude[i].abs()).abs() < 1e-12,
                "sample {i}: rms {} vs |{}|",
                rms.amplitude[i],
                signal.amplitude[i]
            );
        }
    }

    #[test]
    fn rms_is_computed_per_sample_not_per_window() {
        // Two constant signals, 3 and 4: per-sample RMS is sqrt((9+16)/2)
        // everywhere. A windowed implementation would disagree at the edges.
        let a = generate(WaveKind::Sine, 0.0, 1.0, 3.0, 50.0, 0.5, 100.0);
        let b = generate(WaveKind::Sine, 0.0, 1.0, 4.0, 50.0, 0.5, 100.0);
        let expected = (12.5f64).sqrt();
        let rms = compute_rms(&[a, b]);
        assert!(rms
            .amplitude
            .iter()
            .all(|&v| (v - expected).abs() < 1e-12));
    }

    #[test]
    fn empty_input_yields_an_empty_curve() {
        assert!(compute_max(&[]).is_empty());
        assert!(compute_min(&[]).is_empty());
        assert!(compute_rms(&[]).is_empty());
    }
}
