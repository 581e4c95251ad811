//! STFT → log-magnitude spectrogram.
//!
//! Uses a full complex FFT over the Hann-windowed frame (the real signal is packed
//! with a zero imaginary part) rather than a packed real-FFT convention; the Nyquist
//! bin is simply dropped. This is the conventional alternative the spec's Design
//! Notes (§9) explicitly permit in place of the Swift original's packed-bin trick.

use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use crate::config::STFTConfiguration;
use crate::error::FingerprintError;

/// Log-magnitude spectrogram plus its frequency and position axis labels.
///
/// `stft` is row-major `height x width`: `stft[h * width + k]` is the dB magnitude
/// of frame `h`, frequency bin `k`.
pub struct Spectrum {
    pub frequencies: Vec<i32>,
    pub positions: Vec<i32>,
    pub stft: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Spectrum {
    pub fn get(&self, h: usize, k: usize) -> f32 {
        self.stft[h * self.width + k]
    }
}

const LOG_FLOOR: f32 = 1e-20;

fn hann_window(segment: usize) -> Vec<f32> {
    let mut window: Vec<f32> = (0..segment)
        .map(|n| {
            0.5 - 0.5 * (2.0 * std::f32::consts::PI * n as f32 / (segment as f32 - 1.0)).cos()
        })
        .collect();

    let sum: f32 = window.iter().sum();
    for w in &mut window {
        *w /= sum;
    }
    window
}

/// Builds the spectrogram for a mono PCM buffer. `sample_count` is the number of
/// valid samples in `audio` (may be less than `audio.len()`).
pub fn make_spectrum(
    audio: &[f32],
    sample_count: usize,
    sample_rate: u32,
    cfg: &STFTConfiguration,
) -> Result<Spectrum, FingerprintError> {
    if cfg.segment <= 16 {
        return Err(FingerprintError::STFTSegmentTooShort { segment: cfg.segment });
    }

    let min_samples = (2 * cfg.segment).max(sample_rate as usize);
    if !(sample_count > 2 * cfg.segment && sample_count > sample_rate as usize) {
        return Err(FingerprintError::AudioTooShort {
            min_samples,
            actual_samples: sample_count,
        });
    }

    if !cfg.segment.is_power_of_two() {
        return Err(FingerprintError::InvalidSTFTSegment { segment: cfg.segment });
    }

    let hop = cfg.hop();
    let width = cfg.segment / 2;
    let height = (sample_count - cfg.segment) / hop + 1;

    let window = hann_window(cfg.segment);
    // The 1/2 factor compensates for taking a full complex FFT (which would
    // otherwise report twice the energy a packed real/Nyquist convention reports)
    // while still normalizing by the window's sum, per spec.md's scale convention.
    let scale = 1.0 / window.iter().sum::<f32>() / 2.0;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(cfg.segment);
    if fft.len() != cfg.segment {
        return Err(FingerprintError::CannotSetupFFT { segment: cfg.segment });
    }

    let frequencies: Vec<i32> = (0..width)
        .map(|i| ((i as f64 * (sample_rate as f64 / 2.0)) / width as f64).round() as i32)
        .collect();
    let positions: Vec<i32> = (0..height).map(|h| (h * hop) as i32).collect();

    let mut stft = vec![0f32; height * width];
    stft.par_chunks_mut(width)
        .enumerate()
        .for_each(|(h, row)| {
            let start = h * hop;
            let mut buf: Vec<Complex<f32>> = (0..cfg.segment)
                .map(|n| Complex::new(audio[start + n] * window[n], 0.0))
                .collect();
            // Each frame gets its own FFT scratch buffer; `Fft::process` is safe to
            // call concurrently across buffers from a shared planned `Fft`.
            fft.process(&mut buf);

            for (k, slot) in row.iter_mut().enumerate() {
                let mag = buf[k].norm();
                *slot = 20.0 * (mag * scale).max(LOG_FLOOR).log10();
            }
        });

    Ok(Spectrum {
        frequencies,
        positions,
        stft,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(sample_rate: u32, duration_secs: f64, freq: f32) -> Vec<f32> {
        let n = (sample_rate as f64 * duration_secs) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn spectrum_has_expected_shape() {
        let sample_rate = 16_000;
        let audio = sine(sample_rate, 2.0, 440.0);
        let cfg = STFTConfiguration { segment: 1024, overlap: 512 };

        let spectrum = make_spectrum(&audio, audio.len(), sample_rate, &cfg).unwrap();

        assert_eq!(spectrum.width, 512);
        let hop = cfg.hop();
        let expected_height = (audio.len() - cfg.segment) / hop + 1;
        assert_eq!(spectrum.height, expected_height);
        assert_eq!(spectrum.stft.len(), spectrum.width * spectrum.height);
        assert_eq!(spectrum.frequencies.len(), spectrum.width);
        assert_eq!(spectrum.positions.len(), spectrum.height);
    }

    #[test]
    fn spectrum_values_are_finite() {
        let sample_rate = 16_000;
        let audio = vec![0.0f32; sample_rate as usize * 2];
        let cfg = STFTConfiguration::default();

        let spectrum = make_spectrum(&audio, audio.len(), sample_rate, &cfg).unwrap();
        assert!(spectrum.stft.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn rejects_non_power_of_two_segment() {
        let sample_rate = 16_000;
        let audio = sine(sample_rate, 2.0, 440.0);
        let cfg = STFTConfiguration { segment: 1000, overlap: 0 };

        let err = make_spectrum(&audio, audio.len(), sample_rate, &cfg).unwrap_err();
        assert!(matches!(err, FingerprintError::InvalidSTFTSegment { .. }));
    }

    #[test]
    fn rejects_too_short_segment() {
        let sample_rate = 16_000;
        let audio = sine(sample_rate, 2.0, 440.0);
        let cfg = STFTConfiguration { segment: 16, overlap: 0 };

        let err = make_spectrum(&audio, audio.len(), sample_rate, &cfg).unwrap_err();
        assert!(matches!(err, FingerprintError::STFTSegmentTooShort { .. }));
    }

    #[test]
    fn rejects_too_short_audio() {
        let sample_rate = 16_000;
        let audio = sine(sample_rate, 0.3, 440.0);
        let cfg = STFTConfiguration::default();

        let err = make_spectrum(&audio, audio.len(), sample_rate, &cfg).unwrap_err();
        assert!(matches!(err, FingerprintError::AudioTooShort { .. }));
    }

    #[test]
    fn audio_too_short_takes_priority_over_invalid_segment() {
        // segment=1000 is both non-power-of-two and, paired with this audio length,
        // below the 2*segment/sample_rate floor. spec.md §4.3 lists AudioTooShort
        // before InvalidSTFTSegment, so that's the error that must surface.
        let sample_rate = 16_000;
        let cfg = STFTConfiguration { segment: 1000, overlap: 0 };
        let audio = sine(sample_rate, 0.3, 440.0);
        assert!(audio.len() < sample_rate as usize);
        assert!(!cfg.segment.is_power_of_two());

        let err = make_spectrum(&audio, audio.len(), sample_rate, &cfg).unwrap_err();
        assert!(matches!(err, FingerprintError::AudioTooShort { .. }));
    }
}
