//! Mock implementations for unit testing.
//!
//! These mocks implement the engine traits from `crate::domain::traits` to
//! enable testing without espeak-ng, an audio device, or Azure credentials.

use crate::domain::traits::{CloudSynthesizer, LocalSynthesizer};
use crate::domain::types::{AudioFormat, LocalSpeech, Voice};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A small voice table shaped like espeak-ng's.
pub fn sample_voices() -> Vec<Voice> {
    let voice = |id: &str, name: &str, language: &str, gender: &str| Voice {
        id: id.to_string(),
        name: name.to_string(),
        language: language.to_string(),
        gender: Some(gender.to_string()),
    };
    vec![
        voice("gmw/af", "Afrikaans", "af", "M"),
        voice("gmw/en-US", "English (America)", "en-us", "M"),
        voice("gmw/en", "English (Great Britain)", "en-gb", "M"),
        voice("roa/fr", "French", "fr-fr", "M"),
    ]
}

/// What the local mock was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSpeech {
    pub text: String,
    pub voice_id: String,
    pub rate: i32,
    pub volume: u8,
    pub markup: bool,
    pub save: Option<PathBuf>,
}

/// Mock local engine.
///
/// Returns a fixed voice list and records every speak() call.
pub struct MockLocalSynthesizer {
    voices: Vec<Voice>,
    calls: Mutex<Vec<RecordedSpeech>>,
    fail_speak: bool,
}

impl MockLocalSynthesizer {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            calls: Mutex::new(Vec::new()),
            fail_speak: false,
        }
    }

    /// Create a mock whose speak() always fails (simulates a broken engine).
    pub fn failing(voices: Vec<Voice>) -> Self {
        Self {
            fail_speak: true,
            ..Self::new(voices)
        }
    }

    pub fn calls(&self) -> Vec<RecordedSpeech> {
        self.calls.lock().unwrap().clone()
    }
}

impl LocalSynthesizer for MockLocalSynthesizer {
    fn voices(&self) -> Result<Vec<Voice>> {
        Ok(self.voices.clone())
    }

    fn speak(&self, speech: &LocalSpeech<'_>) -> Result<()> {
        if self.fail_speak {
            anyhow::bail!("mock engine failure");
        }
        self.calls.lock().unwrap().push(RecordedSpeech {
            text: speech.text.to_string(),
            voice_id: speech.voice.id.clone(),
            rate: speech.rate.value(),
            volume: speech.volume.value(),
            markup: speech.markup,
            save: speech.save.map(|p| p.to_path_buf()),
        });
        Ok(())
    }
}

/// Mock cloud service.
///
/// Returns predefined audio bytes and records each SSML request.
pub struct MockCloudSynthesizer {
    audio: Vec<u8>,
    voices: Vec<Voice>,
    requests: Mutex<Vec<String>>,
    formats: Mutex<Vec<String>>,
    voice_calls: AtomicUsize,
}

impl MockCloudSynthesizer {
    pub fn new(audio: Vec<u8>) -> Self {
        Self {
            audio,
            voices: Vec::new(),
            requests: Mutex::new(Vec::new()),
            formats: Mutex::new(Vec::new()),
            voice_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::new(Vec::new())
        }
    }

    /// Same mock, answering synthesis requests with `audio`.
    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.audio = audio;
        self
    }

    /// SSML documents received, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Output formats requested, in order.
    pub fn formats(&self) -> Vec<String> {
        self.formats.lock().unwrap().clone()
    }

    pub fn voice_calls(&self) -> usize {
        self.voice_calls.load(Ordering::SeqCst)
    }
}

impl CloudSynthesizer for MockCloudSynthesizer {
    async fn voices(&self) -> Result<Vec<Voice>> {
        self.voice_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.voices.clone())
    }

    async fn synthesize(&self, ssml: &str, format: &AudioFormat) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(ssml.to_string());
        self.formats.lock().unwrap().push(format.to_string());
        Ok(self.audio.clone())
    }
}
