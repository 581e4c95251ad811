//! Constellation pattern ("hash") generation: pairs each peak with its next `fan`
//! successors, keyed by `(frequencyA, frequencyB, Δposition)`.

use std::collections::HashMap;

use crate::config::PatternsConfiguration;
use crate::error::FingerprintError;

use super::peaks::Peak;

/// `(frequencyA, frequencyB, positionDelta)`.
pub type Pattern = (i32, i32, i32);

/// `Pattern -> anchor SamplePosition` (the position of the earlier peak in the pair).
pub type Patterns = HashMap<Pattern, i32>;

/// Builds the pattern table. Iterates `i` ascending, then `j` ascending, so that
/// `HashMap::insert`'s natural overwrite-on-collision gives last-writer-wins: the
/// stored anchor is always the one from the largest qualifying `i`.
pub fn make_patterns(peaks: &[Peak], cfg: &PatternsConfiguration) -> Result<Patterns, FingerprintError> {
    let n = peaks.len();
    let mut patterns = Patterns::new();

    for i in 0..n {
        for j in 1..cfg.fan {
            if i + j >= n {
                break;
            }

            let delta = peaks[i + j].position - peaks[i].position;
            if delta < cfg.minimum_sample_position_delta || delta > cfg.maximum_sample_position_delta {
                continue;
            }

            patterns.insert((peaks[i].frequency, peaks[i + j].frequency, delta), peaks[i].position);
        }
    }

    if patterns.is_empty() {
        return Err(FingerprintError::NoPatternsFound);
    }

    Ok(patterns)
}
