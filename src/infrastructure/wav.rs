//! WAV header inspection for saved audio.

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavSummary {
    pub channels: u16,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

impl fmt::Display for WavSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} channels, {}Hz, {:.1}s",
            self.channels, self.sample_rate, self.duration_secs
        )
    }
}

/// Read the header of a WAV file.
pub fn describe(path: &Path) -> Result<WavSummary> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    // duration() is in samples per channel
    let frames = reader.duration();
    let duration_secs = if spec.sample_rate == 0 {
        0.0
    } else {
        frames as f64 / spec.sample_rate as f64
    };

    Ok(WavSummary {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        duration_secs,
    })
}
