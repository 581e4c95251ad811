//! Two-pass histogram vote over per-pattern positional differences.

use crate::config::FittingOptions;
use crate::error::AlignError;
use crate::histogram::histogram;

use super::Fingerprint;

/// Result of aligning one fingerprint against a reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Seconds. Positive means `self` appears *later* than the reference, i.e.
    /// `self` must be shifted earlier by this amount to align.
    pub estimated_time_offset: f64,
}

/// First-wins argmax: the smallest index among the bins sharing the maximum count.
fn argmax_first_wins(counts: &[u64]) -> usize {
    let mut best_idx = 0;
    let mut best_count = counts[0];
    for (idx, &count) in counts.iter().enumerate().skip(1) {
        if count > best_count {
            best_count = count;
            best_idx = idx;
        }
    }
    best_idx
}

pub fn align(
    query: &Fingerprint,
    reference: &Fingerprint,
    options: FittingOptions,
) -> Result<Alignment, AlignError> {
    if query.configuration != reference.configuration {
        return Err(AlignError::FingerprintConfigurationMismatch);
    }

    let finest = query.configuration.finest_time_resolution();
    let time_resolution = options.time_resolution.max(finest);
    let time_resolution_coarse = options.time_resolution_coarse.max(finest);
    let sample_rate = query.configuration.sample_rate as f64;

    let diffs: Vec<f64> = query
        .patterns
        .iter()
        .filter_map(|(pattern, &position)| {
            reference
                .patterns
                .get(pattern)
                .map(|&ref_position| (ref_position - position) as f64 / sample_rate)
        })
        .collect();

    if diffs.is_empty() {
        return Err(AlignError::NoMatchesFound);
    }

    let (coarse_counts, coarse_centers) = histogram(&diffs, time_resolution_coarse);
    let coarse_idx = argmax_first_wins(&coarse_counts);
    let center = coarse_centers[coarse_idx];

    let half_focus = options.focus_interval / 2.0;
    let mut focused: Vec<f64> = diffs
        .iter()
        .copied()
        .filter(|&d| d >= center - half_focus && d <= center + half_focus)
        .collect();

    // Only reachable if focus_interval is configured narrower than the coarse bin
    // width; fall back to the full diff set rather than histogramming an empty slice.
    if focused.is_empty() {
        focused = diffs;
    }

    let (fine_counts, fine_centers) = histogram(&focused, time_resolution);
    let fine_idx = argmax_first_wins(&fine_counts);

    Ok(Alignment {
        estimated_time_offset: fine_centers[fine_idx],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, STFTConfiguration};
    use crate::fingerprint::Fingerprint;

    fn sine(sample_rate: u32, duration_secs: f64, freq: f32) -> Vec<f32> {
        let n = (sample_rate as f64 * duration_secs) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn test_configuration() -> Configuration {
        Configuration {
            sample_rate: 16_000,
            stft: STFTConfiguration { segment: 1024, overlap: 512 },
            ..Configuration::default()
        }
    }

    fn chirp(sample_rate: u32, duration_secs: f64) -> Vec<f32> {
        let n = (sample_rate as f64 * duration_secs) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let freq = 300.0 + 2500.0 * t;
                (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn self_alignment_is_exactly_zero() {
        let cfg = test_configuration();
        let audio = chirp(cfg.sample_rate, 5.0);
        let fp = Fingerprint::new(&audio, cfg).unwrap();

        let alignment = fp.align(&fp, FittingOptions::default()).unwrap();
        assert_eq!(alignment.estimated_time_offset, 0.0);
    }

    #[test]
    fn shift_recovery_within_finest_resolution() {
        let cfg = test_configuration();
        let reference_audio = chirp(cfg.sample_rate, 8.0);

        let shift_samples = (cfg.sample_rate as f64 * 1.0) as usize; // 1s shift
        let mut shifted_audio = vec![0.0f32; shift_samples];
        shifted_audio.extend_from_slice(&reference_audio);

        let reference = Fingerprint::new(&reference_audio, cfg).unwrap();
        let shifted = Fingerprint::new(&shifted_audio, cfg).unwrap();

        let alignment = shifted.align(&reference, FittingOptions::default()).unwrap();
        let expected = shift_samples as f64 / cfg.sample_rate as f64;
        let finest = cfg.finest_time_resolution();

        assert!(
            (alignment.estimated_time_offset - expected).abs() <= finest + 1e-9,
            "expected {expected}, got {}",
            alignment.estimated_time_offset
        );
    }

    #[test]
    fn anti_symmetry_within_finest_resolution() {
        let cfg = test_configuration();
        let reference_audio = chirp(cfg.sample_rate, 8.0);

        let shift_samples = (cfg.sample_rate as f64 * 0.5) as usize;
        let mut shifted_audio = vec![0.0f32; shift_samples];
        shifted_audio.extend_from_slice(&reference_audio);

        let reference = Fingerprint::new(&reference_audio, cfg).unwrap();
        let shifted = Fingerprint::new(&shifted_audio, cfg).unwrap();

        let forward = shifted.align(&reference, FittingOptions::default()).unwrap();
        let backward = reference.align(&shifted, FittingOptions::default()).unwrap();

        let finest = cfg.finest_time_resolution();
        assert!((forward.estimated_time_offset + backward.estimated_time_offset).abs() <= finest + 1e-9);
    }

    #[test]
    fn configuration_mismatch_is_rejected() {
        let cfg_a = test_configuration();
        let mut cfg_b = cfg_a;
        cfg_b.sample_rate = 8_000;

        let audio_a = chirp(cfg_a.sample_rate, 5.0);
        let audio_b = chirp(cfg_b.sample_rate, 5.0);

        let fp_a = Fingerprint::new(&audio_a, cfg_a).unwrap();
        let fp_b = Fingerprint::new(&audio_b, cfg_b).unwrap();

        let err = fp_a.align(&fp_b, FittingOptions::default()).unwrap_err();
        assert!(matches!(err, AlignError::FingerprintConfigurationMismatch));
    }

    #[test]
    fn disjoint_spectra_yield_no_matches_or_a_weak_vote() {
        let cfg = Configuration {
            sample_rate: 16_000,
            stft: STFTConfiguration { segment: 1024, overlap: 512 },
            peaks: crate::config::PeaksConfiguration {
                minimum_frequency: 0,
                maximum_frequency: 8_000,
                ..Default::default()
            },
            ..Configuration::default()
        };

        let low = sine(cfg.sample_rate, 4.0, 300.0);
        let high = sine(cfg.sample_rate, 4.0, 7000.0);

        let fp_low = Fingerprint::new(&low, cfg).unwrap();
        let fp_high = Fingerprint::new(&high, cfg).unwrap();

        // Either no shared patterns, or a valid (if not meaningful) alignment; must
        // not panic either way.
        let _ = fp_low.align(&fp_high, FittingOptions::default());
    }
}
