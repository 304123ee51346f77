//! Core domain traits for dependency inversion.
//!
//! The CLI dispatcher talks to speech engines only through these traits, so
//! the espeak-ng subprocess and the Azure client can be swapped for mocks in
//! tests.

use anyhow::Result;

use crate::domain::types::{AudioFormat, LocalSpeech, Voice};

/// Locally installed speech engine.
pub trait LocalSynthesizer {
    /// Installed voices, in the engine's order. Indices shown by `--list`
    /// refer to this order.
    fn voices(&self) -> Result<Vec<Voice>>;

    /// Speak to the default audio device, or write a WAV file when
    /// `speech.save` is set. Blocks until the engine finishes.
    fn speak(&self, speech: &LocalSpeech<'_>) -> Result<()>;
}

/// Cloud speech service.
#[allow(async_fn_in_trait)] // only used with static dispatch
pub trait CloudSynthesizer {
    /// Voices offered by the service.
    async fn voices(&self) -> Result<Vec<Voice>>;

    /// Synthesize an SSML document and return the encoded audio bytes
    /// exactly as the service sent them.
    async fn synthesize(&self, ssml: &str, format: &AudioFormat) -> Result<Vec<u8>>;
}
