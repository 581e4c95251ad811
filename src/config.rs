/// Parameters for the short-time Fourier transform.
///
/// Invariant: `segment` is a power of two; `hop() = segment - overlap` is > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct STFTConfiguration {
    pub segment: usize,
    pub overlap: usize,
}

impl STFTConfiguration {
    pub fn hop(&self) -> usize {
        self.segment - self.overlap
    }
}

impl Default for STFTConfiguration {
    fn default() -> Self {
        Self {
            segment: 4096,
            overlap: 0,
        }
    }
}

/// Parameters for spectral peak extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeaksConfiguration {
    pub local_maximum_kernel_size: usize,
    pub maximum_amplitude_approximate_percentile: f64,
    pub relative_minimum_amplitude: f32,
    pub minimum_frequency: i32,
    pub maximum_frequency: i32,
}

impl Default for PeaksConfiguration {
    fn default() -> Self {
        Self {
            local_maximum_kernel_size: 5,
            maximum_amplitude_approximate_percentile: 0.999,
            relative_minimum_amplitude: -35.0,
            minimum_frequency: 0,
            maximum_frequency: 5_000,
        }
    }
}

/// Parameters for constellation pattern ("hash") generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternsConfiguration {
    pub fan: usize,
    pub minimum_sample_position_delta: i32,
    pub maximum_sample_position_delta: i32,
}

impl Default for PatternsConfiguration {
    fn default() -> Self {
        Self {
            fan: 10,
            minimum_sample_position_delta: 0,
            // ~12.5s at the default 16kHz sample rate; loose enough that `fan` is the
            // binding constraint in practice.
            maximum_sample_position_delta: 200_000,
        }
    }
}

/// Top-level fingerprinting configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub sample_rate: u32,
    pub stft: STFTConfiguration,
    pub peaks: PeaksConfiguration,
    pub patterns: PatternsConfiguration,
}

impl Configuration {
    /// Lower bound on alignment precision, in seconds: `hop / sample_rate`.
    pub fn finest_time_resolution(&self) -> f64 {
        self.stft.hop() as f64 / self.sample_rate as f64
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            stft: STFTConfiguration::default(),
            peaks: PeaksConfiguration::default(),
            patterns: PatternsConfiguration::default(),
        }
    }
}

/// Tunables for the two-pass histogram vote in [`crate::fingerprint::align`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittingOptions {
    pub time_resolution: f64,
    pub time_resolution_coarse: f64,
    pub focus_interval: f64,
}

impl Default for FittingOptions {
    fn default() -> Self {
        Self {
            time_resolution: 0.001,
            time_resolution_coarse: 0.1,
            focus_interval: 5.0,
        }
    }
}
