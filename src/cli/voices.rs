//! Voice listing (`--list`).

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::domain::traits::{CloudSynthesizer, LocalSynthesizer};
use crate::domain::types::Voice;

/// Print one `[index]:label` line per voice. The index can be passed to
/// `--voice` with either backend.
fn print_voices(out: &mut dyn Write, voices: &[Voice], label: impl Fn(&Voice) -> &str) -> Result<()> {
    if voices.is_empty() {
        writeln!(out, "No voices found.")?;
        return Ok(());
    }

    for (i, voice) in voices.iter().enumerate() {
        let line = format!(
            "[{}]:{:30} {:10} {}",
            i,
            label(voice),
            voice.language,
            voice.gender.as_deref().unwrap_or("")
        );
        writeln!(out, "{}", line.trim_end()).context("Failed to write voice list")?;
    }

    writeln!(out)?;
    writeln!(out, "Voices: {}", voices.len())?;
    Ok(())
}

/// List voices of the local engine by display name.
pub fn list_local<E: LocalSynthesizer>(engine: &E, out: &mut impl Write) -> Result<()> {
    let voices = engine.voices()?;
    print_voices(out, &voices, |v| v.name.as_str())
}

/// List Azure voices by short name. `--voice` takes the short name or the
/// index shown here.
pub async fn list_cloud<C: CloudSynthesizer>(client: &C, out: &mut impl Write) -> Result<()> {
    let voices = client.voices().await?;
    print_voices(out, &voices, |v| v.id.as_str())
}

/// Show the local voices and ask which one to use. A blank answer or end
/// of input gives `None`.
pub fn prompt_voice(
    voices: &[Voice],
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Option<String>> {
    print_voices(out, voices, |v| v.name.as_str())?;
    write!(out, "Select a voice: ")?;
    out.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read voice selection")?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mocks::{sample_voices, MockCloudSynthesizer, MockLocalSynthesizer};

    #[test]
    fn test_list_local_format() {
        let engine = MockLocalSynthesizer::new(sample_voices());
        let mut out = Vec::new();
        list_local(&engine, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("[0]:Afrikaans"));
        assert!(lines[1].starts_with("[1]:English (America)"));
        assert!(lines[1].contains("en-us"));
        assert!(lines[3].starts_with("[3]:French"));
        assert!(text.contains("Voices: 4"));
    }

    #[test]
    fn test_list_local_empty() {
        let engine = MockLocalSynthesizer::new(Vec::new());
        let mut out = Vec::new();
        list_local(&engine, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No voices found.\n");
    }

    #[tokio::test]
    async fn test_list_cloud_uses_short_names() {
        let cloud = MockCloudSynthesizer::with_voices(vec![Voice {
            id: "en-US-JennyNeural".to_string(),
            name: "Jenny".to_string(),
            language: "en-US".to_string(),
            gender: Some("female".to_string()),
        }]);
        let mut out = Vec::new();
        list_cloud(&cloud, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[0]:en-US-JennyNeural"));
        assert!(text.lines().next().unwrap().ends_with("female"));
        assert_eq!(cloud.voice_calls(), 1);
    }

    #[test]
    fn test_prompt_voice_lists_and_reads_answer() {
        let mut input: &[u8] = b"  2 \n";
        let mut out = Vec::new();
        let answer = prompt_voice(&sample_voices(), &mut input, &mut out).unwrap();
        assert_eq!(answer.as_deref(), Some("2"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[0]:Afrikaans"));
        assert!(text.ends_with("Select a voice: "));
    }

    #[test]
    fn test_prompt_voice_blank_or_closed_input() {
        let mut input: &[u8] = b"\n";
        assert_eq!(prompt_voice(&sample_voices(), &mut input, &mut Vec::<u8>::new()).unwrap(), None);

        let mut input: &[u8] = b"";
        assert_eq!(prompt_voice(&sample_voices(), &mut input, &mut Vec::<u8>::new()).unwrap(), None);
    }
}
