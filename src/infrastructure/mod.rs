//! Adapters for the external collaborators: the espeak-ng program, the
//! Azure Speech service, system audio players and WAV headers.

pub mod azure;
pub mod espeak;
pub mod player;
pub mod wav;

pub use azure::AzureClient;
pub use espeak::EspeakEngine;
