//! Decode/downmix/resample adapter: turns an arbitrary audio file into a mono
//! `f32` PCM buffer at a target sample rate. External collaborator to the
//! fingerprinting core (spec.md §1/§6) — the core only ever sees the finished
//! buffer this module produces.

use std::path::Path;

use fundsp::prelude::Wave;

use crate::error::PcmError;

/// A mono PCM buffer at a known sample rate, ready for [`crate::fingerprint::Fingerprint::new`].
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Decodes `source`, downmixes to mono by channel averaging, and resamples (linear
/// interpolation) to `target_sample_rate`.
pub fn load_mono_pcm(source: &Path, target_sample_rate: u32) -> Result<PcmBuffer, PcmError> {
    let wave = Wave::load(source).map_err(|e| PcmError::CannotCreatePCMBuffer {
        message: format!("{source:?}: {e}"),
    })?;

    let source_sample_rate = wave.sample_rate();
    let num_channels = wave.channels();
    if num_channels == 0 {
        return Err(PcmError::CannotCreatePCMBuffer {
            message: format!("{source:?}: no channels in decoded audio"),
        });
    }

    if source_sample_rate <= 0.0 || target_sample_rate == 0 {
        return Err(PcmError::CannotCreateAudioConverter {
            message: format!(
                "{source:?}: degenerate sample rate (source {source_sample_rate}, target {target_sample_rate})"
            ),
        });
    }

    // Over-allocating by ceil(duration / sample_rate) (the quirk spec.md §9 Q1
    // flags) is avoided here: size directly from the decoded frame count.
    let num_samples = (wave.duration() * source_sample_rate) as usize;
    let mono = downmix(&wave, num_channels, num_samples);

    if (source_sample_rate - target_sample_rate as f64).abs() < f64::EPSILON {
        return Ok(PcmBuffer { samples: mono, sample_rate: target_sample_rate });
    }

    let resampled = resample_linear(&mono, source_sample_rate, target_sample_rate as f64)?;
    Ok(PcmBuffer { samples: resampled, sample_rate: target_sample_rate })
}

fn downmix(wave: &Wave, num_channels: usize, num_samples: usize) -> Vec<f32> {
    average_channels(num_channels, num_samples, |channel_idx, sample_idx| {
        wave.at(channel_idx, sample_idx) as f32
    })
}

/// Averages `num_channels` channels of `num_samples` samples each, reading each
/// `(channel, sample)` pair through `at`. Factored out of [`downmix`] so the
/// averaging arithmetic is testable without a decoded [`Wave`].
fn average_channels(num_channels: usize, num_samples: usize, at: impl Fn(usize, usize) -> f32) -> Vec<f32> {
    let mut mono = vec![0.0f32; num_samples];
    for sample_idx in 0..num_samples {
        let mut sum = 0.0f32;
        for channel_idx in 0..num_channels {
            sum += at(channel_idx, sample_idx);
        }
        mono[sample_idx] = sum / num_channels as f32;
    }
    mono
}

/// Resamples `samples` from `source_rate` to `target_rate` Hz via linear
/// interpolation. Output length is sized by `ceil(len * target_rate / source_rate)`,
/// per spec.md §9 Q1's resolution (any trailing zero pad beyond that is
/// insignificant, so none is added here).
///
/// Rejects non-finite or non-positive rates with `CannotCreateAudioConverter`
/// rather than letting the arithmetic overflow into an unbounded allocation.
fn resample_linear(samples: &[f32], source_rate: f64, target_rate: f64) -> Result<Vec<f32>, PcmError> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    if !source_rate.is_finite() || !target_rate.is_finite() || source_rate <= 0.0 || target_rate <= 0.0 {
        return Err(PcmError::CannotCreateAudioConverter {
            message: format!("cannot resample from {source_rate}Hz to {target_rate}Hz"),
        });
    }

    let ratio = source_rate / target_rate;
    let out_len_f = (samples.len() as f64) * target_rate / source_rate;
    if !out_len_f.is_finite() || out_len_f > usize::MAX as f64 {
        return Err(PcmError::CannotCreateAudioConverter {
            message: format!("resampled length overflow ({out_len_f} frames)"),
        });
    }
    let out_len = out_len_f.ceil() as usize;

    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let src_pos = i as f64 * ratio;
        let idx0 = src_pos.floor() as usize;
        let frac = (src_pos - idx0 as f64) as f32;

        let s0 = samples[idx0.min(samples.len() - 1)];
        let s1 = samples[(idx0 + 1).min(samples.len() - 1)];
        out.push(s0 + (s1 - s0) * frac);
    }
    Ok(out)
}
