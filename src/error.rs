use thiserror::Error;

/// Errors raised while building a [`crate::fingerprint::Fingerprint`].
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("audio too short: need at least {min_samples} samples (>= 2*segment and >= 1s), got {actual_samples}")]
    AudioTooShort {
        min_samples: usize,
        actual_samples: usize,
    },

    #[error("STFT segment too short: {segment} (must be > 16)")]
    STFTSegmentTooShort { segment: usize },

    #[error("STFT segment {segment} is not a power of two")]
    InvalidSTFTSegment { segment: usize },

    #[error("failed to set up FFT planner for segment size {segment}")]
    CannotSetupFFT { segment: usize },

    #[error("no patterns found in peak set")]
    NoPatternsFound,
}

/// Errors raised while aligning two fingerprints.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("fingerprint configurations do not match")]
    FingerprintConfigurationMismatch,

    #[error("no matching patterns between fingerprints")]
    NoMatchesFound,
}

/// Errors raised by the PCM decode/resample adapter boundary (not part of the core).
#[derive(Debug, Error)]
pub enum PcmError {
    #[error("cannot create PCM buffer from source: {message}")]
    CannotCreatePCMBuffer { message: String },

    #[error("cannot create audio converter: {message}")]
    CannotCreateAudioConverter { message: String },
}
