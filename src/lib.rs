pub mod config;
pub mod error;
pub mod fingerprint;
pub mod histogram;
pub mod pcm;

pub use config::{Configuration, FittingOptions, PatternsConfiguration, PeaksConfiguration, STFTConfiguration};
pub use error::{AlignError, FingerprintError, PcmError};
pub use fingerprint::{Alignment, Fingerprint, Pattern, Patterns};
