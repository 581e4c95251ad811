//! Fingerprinting: STFT → peaks → patterns, composed into an immutable [`Fingerprint`].

mod align;
mod patterns;
mod peaks;
mod spectrum;

pub use align::Alignment;
pub use patterns::{Pattern, Patterns};
pub use peaks::Peak;

use crate::config::{Configuration, FittingOptions};
use crate::error::{AlignError, FingerprintError};

/// A shift-invariant acoustic fingerprint: a `Configuration` plus the constellation
/// `Patterns` table built from it. Immutable after construction and cheap to clone
/// (only the pattern map, not the spectrogram, is retained).
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    pub configuration: Configuration,
    pub patterns: Patterns,
}

impl Fingerprint {
    /// Builds a fingerprint from a mono PCM buffer at `configuration.sample_rate`.
    pub fn new(audio: &[f32], configuration: Configuration) -> Result<Self, FingerprintError> {
        let spectrum = spectrum::make_spectrum(
            audio,
            audio.len(),
            configuration.sample_rate,
            &configuration.stft,
        )?;
        let peaks = peaks::make_peaks(&spectrum, &configuration.peaks);
        let patterns = patterns::make_patterns(&peaks, &configuration.patterns)?;

        Ok(Self { configuration, patterns })
    }

    /// Estimates the time offset by which `self` must be shifted to align with
    /// `reference`. Positive means `self` is later than `reference`.
    pub fn align(&self, reference: &Fingerprint, options: FittingOptions) -> Result<Alignment, AlignError> {
        align::align(self, reference, options)
    }
}
