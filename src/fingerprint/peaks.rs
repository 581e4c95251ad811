//! Spectral peak extraction: 2-D local-maximum filtering with a clamped/replicated
//! boundary, an amplitude floor derived from an approximate percentile, and a
//! frequency band gate.

use rayon::prelude::*;

use crate::config::PeaksConfiguration;
use crate::histogram::approximate_percentile;

use super::spectrum::Spectrum;

/// A constellation peak: a spectrogram cell that is the local maximum of its
/// neighborhood and clears the amplitude floor and frequency band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub frequency: i32,
    pub position: i32,
}

/// Extracts peaks from `spectrum` in row-major order (ascending frame, then
/// ascending frequency bin). This ordering is load-bearing for the last-writer-wins
/// semantics of pattern generation.
pub fn make_peaks(spectrum: &Spectrum, cfg: &PeaksConfiguration) -> Vec<Peak> {
    let half = cfg.local_maximum_kernel_size / 2;
    let (height, width) = (spectrum.height, spectrum.width);

    // Local-max image: a plain dilation with a square structuring element, computed
    // row-parallel since neighborhoods only read `stft`, never write it.
    let local_max: Vec<f32> = (0..height)
        .into_par_iter()
        .flat_map(|h| {
            let h0 = h.saturating_sub(half);
            let h1 = (h + half).min(height - 1);

            (0..width)
                .map(|k| {
                    let k0 = k.saturating_sub(half);
                    let k1 = (k + half).min(width - 1);

                    let mut max_val = f32::NEG_INFINITY;
                    for hi in h0..=h1 {
                        for ki in k0..=k1 {
                            max_val = max_val.max(spectrum.get(hi, ki));
                        }
                    }
                    max_val
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let amplitudes: Vec<f64> = spectrum.stft.iter().map(|&v| v as f64).collect();
    let max_amp =
        approximate_percentile(&amplitudes, 0.1, cfg.maximum_amplitude_approximate_percentile)
            as f32;
    let min_amp = max_amp + cfg.relative_minimum_amplitude;

    let mut peaks = Vec::new();
    for h in 0..height {
        for k in 0..width {
            let value = spectrum.get(h, k);
            if value != local_max[h * width + k] {
                continue;
            }
            if value <= min_amp {
                continue;
            }

            let frequency = spectrum.frequencies[k];
            if frequency < cfg.minimum_frequency || frequency > cfg.maximum_frequency {
                continue;
            }

            peaks.push(Peak {
                frequency,
                position: spectrum.positions[h],
            });
        }
    }

    peaks
}
