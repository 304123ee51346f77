//! Local speech engine backed by the `espeak-ng` program.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::process::{Command, Output, Stdio};

use crate::domain::traits::LocalSynthesizer;
use crate::domain::types::{LocalSpeech, Voice};

/// Drives espeak-ng as a subprocess.
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    command: String,
}

impl EspeakEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> anyhow::Error {
        if e.kind() == ErrorKind::NotFound {
            anyhow::anyhow!(
                "Speech engine '{}' not found. Install espeak-ng (e.g. sudo apt install espeak-ng) \
                 or set local_command in the config",
                self.command
            )
        } else {
            anyhow::Error::new(e).context(format!("Failed to run {}", self.command))
        }
    }

    /// Command-line arguments for one speech job. Text goes on stdin.
    /// The save path is passed through unchanged, so non-UTF-8 names survive.
    pub fn speak_args(speech: &LocalSpeech<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-v".into(),
            speech.voice.id.clone().into(),
            "-s".into(),
            speech.rate.words_per_minute().to_string().into(),
            "-a".into(),
            speech.volume.amplitude().to_string().into(),
        ];
        if speech.markup {
            args.push("-m".into());
        }
        if let Some(path) = speech.save {
            args.push("-w".into());
            args.push(path.as_os_str().to_os_string());
        }
        args.push("--stdin".into());
        args
    }
}

fn check_status(command: &str, output: &Output) -> Result<()> {
    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        bail!("{} failed ({}): {}", command, output.status, error_msg.trim());
    }
    Ok(())
}

impl LocalSynthesizer for EspeakEngine {
    fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.command)
            .arg("--voices")
            .output()
            .map_err(|e| self.spawn_error(e))?;
        check_status(&self.command, &output)?;

        Ok(parse_voice_table(&String::from_utf8_lossy(&output.stdout)))
    }

    fn speak(&self, speech: &LocalSpeech<'_>) -> Result<()> {
        let args = Self::speak_args(speech);
        tracing::debug!(command = %self.command, ?args, "starting local engine");

        let mut child = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .context("Failed to open engine stdin")?;
            stdin
                .write_all(speech.text.as_bytes())
                .context("Failed to send text to speech engine")?;
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for {}", self.command))?;
        check_status(&self.command, &output)
    }
}

/// Parse the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
///  5  en-us           --/M      English_(America)  gmw/en-US            (en 2)
/// ```
pub fn parse_voice_table(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?;
            let language = cols.next()?;
            let age_gender = cols.next()?;
            let name = cols.next()?;
            let file = cols.next()?;

            let gender = match age_gender.rsplit('/').next() {
                Some("M") => Some("male".to_string()),
                Some("F") => Some("female".to_string()),
                _ => None,
            };

            Some(Voice {
                id: file.to_string(),
                name: name.replace('_', " "),
                language: language.to_string(),
                gender,
            })
        })
        .collect()
}
