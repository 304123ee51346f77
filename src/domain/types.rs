//! Core domain types.
//!
//! These are plain value types shared between the CLI layer and the speech
//! engines. They carry no I/O.

use anyhow::{bail, Result};
use std::fmt;
use std::path::PathBuf;

/// Azure output format used when none is configured.
pub const DEFAULT_AUDIO_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

/// Which speech engine handles the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Locally installed voices (espeak-ng)
    #[default]
    Local,
    /// Azure neural voices over REST
    Azure,
}

/// Where the text to read comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// Text passed on the command line
    Inline(String),
    /// Plain text file
    File(PathBuf),
    /// Standard input (`--file -`)
    Stdin,
    /// SSML document
    Ssml(PathBuf),
}

impl TextSource {
    /// Whether the loaded text is SSML markup rather than plain text.
    pub fn is_ssml(&self) -> bool {
        matches!(self, TextSource::Ssml(_))
    }
}

/// Speaking rate on the classic desktop speech scale: -10 (slowest)
/// to 10 (fastest), 0 is the engine's normal speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeechRate(i32);

impl SpeechRate {
    pub const MIN: i32 = -10;
    pub const MAX: i32 = 10;

    /// espeak-ng default speed in words per minute.
    const BASE_WPM: f32 = 175.0;

    pub fn new(value: i32) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            bail!(
                "Rate must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            );
        }
        Ok(Self(value))
    }

    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_default(self) -> bool {
        self.0 == 0
    }

    /// Speed relative to normal: +10 is about 3x, -10 about 1/3x.
    pub fn multiplier(self) -> f32 {
        3f32.powf(self.0 as f32 / 10.0)
    }

    /// Words per minute for espeak-ng's `-s` option.
    pub fn words_per_minute(self) -> u32 {
        (Self::BASE_WPM * self.multiplier()).round().clamp(80.0, 450.0) as u32
    }

    /// Relative rate for an SSML `<prosody rate="...">` attribute.
    pub fn ssml_percent(self) -> String {
        let percent = ((self.multiplier() - 1.0) * 100.0).round() as i32;
        format!("{:+}%", percent)
    }
}

/// Output volume, 0 (silent) to 100 (full).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            bail!("Volume must be between 0 and {}, got {}", Self::MAX, value);
        }
        Ok(Self(value))
    }

    pub fn clamped(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_default(self) -> bool {
        self.0 == Self::MAX
    }

    /// Amplitude for espeak-ng's `-a` option (100 is its normal level).
    pub fn amplitude(self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// An Azure output format identifier such as `riff-24khz-16bit-mono-pcm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFormat(String);

impl AudioFormat {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim().to_ascii_lowercase();
        if value.is_empty()
            || !value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            bail!("Invalid audio format: {:?}", value);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RIFF formats carry a WAV header.
    pub fn is_riff(&self) -> bool {
        self.0.starts_with("riff-")
    }

    /// File extension matching the container.
    pub fn extension(&self) -> &'static str {
        let f = self.0.as_str();
        if f.starts_with("riff-") {
            "wav"
        } else if f.ends_with("-mp3") {
            "mp3"
        } else if f.starts_with("ogg-") {
            "ogg"
        } else if f.starts_with("webm-") {
            "webm"
        } else if f.starts_with("raw-") {
            "pcm"
        } else {
            "bin"
        }
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self(DEFAULT_AUDIO_FORMAT.to_string())
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An installed voice as reported by a speech engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Identifier handed back to the engine when speaking
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Language or locale tag (e.g. "en-us")
    pub language: String,
    /// Gender as reported by the engine, if any
    pub gender: Option<String>,
}

/// Trim and lowercase an Azure region. Blank means unset.
pub fn normalize_region(region: &str) -> Option<String> {
    let region = region.trim();
    if region.is_empty() {
        None
    } else {
        Some(region.to_ascii_lowercase())
    }
}

/// Azure credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureCredentials {
    pub region: String,
    pub key: String,
}

impl fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("region", &self.region)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Fully resolved options for one invocation (CLI merged over config).
#[derive(Debug, Clone)]
pub struct SpeakOptions {
    /// `None` only when listing voices
    pub source: Option<TextSource>,
    pub voice: Option<String>,
    pub rate: SpeechRate,
    pub volume: Volume,
    pub save: Option<PathBuf>,
    pub list: bool,
    pub backend: Backend,
    pub azure_region: Option<String>,
    pub azure_key: Option<String>,
    pub audio_format: AudioFormat,
}

impl SpeakOptions {
    /// Region and key, or an error naming the flag and environment variable
    /// that would supply the missing one.
    pub fn azure_credentials(&self) -> Result<AzureCredentials> {
        let region = match self.azure_region.as_deref().and_then(normalize_region) {
            Some(r) => r,
            None => bail!(
                "Azure region is not set. Use --azure-region or set AZURE_SPEECH_REGION"
            ),
        };
        let key = match self.azure_key.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() => k.to_string(),
            _ => bail!("Azure key is not set. Use --azure-key or set AZURE_SPEECH_KEY"),
        };
        Ok(AzureCredentials { region, key })
    }
}

/// One local synthesis job.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSpeech<'a> {
    pub text: &'a str,
    pub voice: &'a Voice,
    pub rate: SpeechRate,
    pub volume: Volume,
    /// Text is SSML markup
    pub markup: bool,
    /// Write a WAV file here instead of playing
    pub save: Option<&'a std::path::Path>,
}
