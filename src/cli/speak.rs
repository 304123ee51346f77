//! The speak command: resolve options, pick an engine, read the text.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;
use std::time::Duration;

use crate::app::config::{config_path, load_config, load_config_from, save_config_to, Config};
use crate::cli::args::Cli;
use crate::cli::input::{load_text, resolve_source};
use crate::cli::voices;
use crate::domain::selection::{select_voice, MatchKind};
use crate::domain::traits::{CloudSynthesizer, LocalSynthesizer};
use crate::domain::types::{
    normalize_region, AudioFormat, Backend, LocalSpeech, SpeakOptions, SpeechRate, TextSource,
    Volume,
};
use crate::infrastructure::azure::build_ssml;
use crate::infrastructure::{player, wav, AzureClient, EspeakEngine};

/// Run the command described by `args`.
pub fn run(args: Cli) -> Result<()> {
    // 1. Load config (custom path or default)
    let config = load_config_cascade(&args)?;

    // 2. Merge CLI over config
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let options = resolve_options(&args, &config, &cwd)?;
    tracing::debug!(
        backend = ?options.backend,
        voice = ?options.voice,
        rate = options.rate.value(),
        volume = options.volume.value(),
        "resolved options"
    );

    if args.save_config {
        persist_settings(&args, &options, config.clone())?;
    }

    // 3. Dispatch
    match options.backend {
        Backend::Local => {
            let engine = EspeakEngine::new(config.local_command.clone());
            if options.list {
                return voices::list_local(&engine, &mut std::io::stdout().lock());
            }
            let text = load_source(&options)?;
            if should_prompt(&options, std::io::stdin().is_terminal()) {
                let mut input = std::io::stdin().lock();
                let mut out = std::io::stderr();
                let prompt = VoicePrompt {
                    input: &mut input,
                    out: &mut out,
                };
                speak_local(&engine, &options, &text, Some(prompt))
            } else {
                speak_local(&engine, &options, &text, None)
            }
        }
        Backend::Azure => {
            let credentials = options.azure_credentials()?;
            let client =
                AzureClient::new(credentials, Duration::from_secs(config.azure_timeout_secs))?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;

            if options.list {
                return runtime
                    .block_on(voices::list_cloud(&client, &mut std::io::stdout().lock()));
            }
            let text = load_source(&options)?;
            runtime.block_on(speak_azure(&client, &options, &text))
        }
    }
}

/// Load config with cascade: custom path -> default path -> defaults.
fn load_config_cascade(args: &Cli) -> Result<Config> {
    match args.config {
        Some(ref custom_path) => load_config_from(custom_path),
        None => load_config(),
    }
}

/// Merge command-line options over the config. CLI flags (and their
/// environment fallbacks) win; the config fills the gaps.
pub fn resolve_options(args: &Cli, config: &Config, cwd: &Path) -> Result<SpeakOptions> {
    let backend = if args.azure {
        Backend::Azure
    } else {
        Backend::Local
    };

    let source = if args.list {
        None
    } else {
        Some(resolve_source(args, cwd)?)
    };

    let voice = match backend {
        Backend::Local => args.voice.clone().or_else(|| config.voice.clone()),
        Backend::Azure => Some(
            args.voice
                .clone()
                .unwrap_or_else(|| config.azure_voice.clone()),
        ),
    };

    let rate = match args.rate {
        Some(r) => SpeechRate::new(r)?,
        None => SpeechRate::clamped(config.rate),
    };
    let volume = match args.volume {
        Some(v) => Volume::new(v)?,
        None => Volume::clamped(config.volume),
    };

    let audio_format =
        AudioFormat::parse(args.audio_format.as_deref().unwrap_or(&config.audio_format))?;

    // Checked by the Azure client only, so a stray region never blocks local speech.
    let azure_region = args
        .azure_region
        .as_deref()
        .or(config.azure_region.as_deref())
        .and_then(normalize_region);
    let azure_key = args.azure_key.clone().or_else(|| config.azure_key.clone());

    Ok(SpeakOptions {
        source,
        voice,
        rate,
        volume,
        save: args.save.clone(),
        list: args.list,
        backend,
        azure_region,
        azure_key,
        audio_format,
    })
}

fn load_source(options: &SpeakOptions) -> Result<String> {
    let source = options
        .source
        .as_ref()
        .context("No text source resolved")?;
    load_text(source)
}

fn is_ssml(options: &SpeakOptions) -> bool {
    options.source.as_ref().is_some_and(TextSource::is_ssml)
}

/// Write the effective settings back as defaults. The key is never
/// written from the command line; edit the file to store one.
fn persist_settings(args: &Cli, options: &SpeakOptions, mut config: Config) -> Result<()> {
    match options.backend {
        Backend::Local => config.voice = options.voice.clone(),
        Backend::Azure => {
            if let Some(ref voice) = options.voice {
                config.azure_voice = voice.clone();
            }
        }
    }
    config.rate = options.rate.value();
    config.volume = options.volume.value();
    config.audio_format = options.audio_format.to_string();
    if options.azure_region.is_some() {
        config.azure_region = options.azure_region.clone();
    }

    let path = args.config.clone().unwrap_or_else(config_path);
    save_config_to(&config, &path)?;
    eprintln!("Settings saved to: {}", path.display());
    Ok(())
}

/// Interactive voice choice: the list and question go to `out`, the answer
/// is read from `input`.
pub struct VoicePrompt<'a> {
    pub input: &'a mut dyn BufRead,
    pub out: &'a mut dyn Write,
}

/// Ask for a voice only when none was chosen and the user is at a terminal
/// that is not already supplying the text.
fn should_prompt(options: &SpeakOptions, stdin_is_terminal: bool) -> bool {
    stdin_is_terminal
        && options.voice.is_none()
        && !matches!(options.source, Some(TextSource::Stdin))
}

/// Read `text` with a local voice. With a `prompt`, the voice list is shown
/// and the answer is used as the selector.
pub fn speak_local<E: LocalSynthesizer>(
    engine: &E,
    options: &SpeakOptions,
    text: &str,
    prompt: Option<VoicePrompt<'_>>,
) -> Result<()> {
    let voices = engine.voices()?;
    let answer = match prompt {
        Some(prompt) if !voices.is_empty() => {
            voices::prompt_voice(&voices, prompt.input, prompt.out)?
        }
        _ => None,
    };
    let wanted = answer.as_deref().or(options.voice.as_deref());

    let selection = match select_voice(&voices, wanted) {
        Some(s) => s,
        None => bail!("No voices installed for the local speech engine"),
    };

    if selection.matched == MatchKind::Fallback {
        if let Some(wanted) = wanted {
            eprintln!(
                "Warning: voice '{}' not found, using '{}'",
                wanted, selection.voice.name
            );
        }
    }
    eprintln!("Voice: [{}] {}", selection.index, selection.voice.name);

    let speech = LocalSpeech {
        text,
        voice: selection.voice,
        rate: options.rate,
        volume: options.volume,
        markup: is_ssml(options),
        save: options.save.as_deref(),
    };
    engine.speak(&speech)?;

    if let Some(ref path) = options.save {
        report_saved(path, true);
    }
    Ok(())
}

/// Read `text` with an Azure voice. The response bytes are written verbatim
/// to `--save`, or played through a system player.
pub async fn speak_azure<C: CloudSynthesizer>(
    client: &C,
    options: &SpeakOptions,
    text: &str,
) -> Result<()> {
    speak_azure_with_player(client, options, text, player::play_file).await
}

/// Azure voice name for `selector`. A list index, as printed by
/// `--list --azure`, is looked up in the voice list; anything else is
/// already a voice name.
async fn resolve_azure_voice<C: CloudSynthesizer>(client: &C, selector: &str) -> Result<String> {
    let selector = selector.trim();
    let Ok(index) = selector.parse::<usize>() else {
        return Ok(selector.to_string());
    };

    let voices = client.voices().await?;
    match select_voice(&voices, Some(selector)) {
        Some(selection) if selection.matched == MatchKind::Index => {
            tracing::debug!(index, voice = %selection.voice.id, "resolved Azure voice index");
            Ok(selection.voice.id.clone())
        }
        _ => bail!(
            "No Azure voice at index {} ({} voices). Run --list --azure to see them",
            index,
            voices.len()
        ),
    }
}

async fn speak_azure_with_player<C, P>(
    client: &C,
    options: &SpeakOptions,
    text: &str,
    play: P,
) -> Result<()>
where
    C: CloudSynthesizer,
    P: FnOnce(&Path, &AudioFormat) -> Result<()>,
{
    let ssml = if is_ssml(options) {
        if !options.rate.is_default() || !options.volume.is_default() {
            eprintln!("Warning: rate and volume are ignored with --ssml; set them in the document");
        }
        text.to_string()
    } else {
        let selector = options
            .voice
            .as_deref()
            .context("No Azure voice configured")?;
        let voice = resolve_azure_voice(client, selector).await?;
        eprintln!("Voice: {}", voice);
        build_ssml(text, &voice, options.rate, options.volume)
    };

    let audio = client.synthesize(&ssml, &options.audio_format).await?;
    if audio.is_empty() {
        bail!("Azure returned no audio");
    }

    match options.save {
        Some(ref path) => {
            write_audio(path, &audio)?;
            report_saved(path, options.audio_format.is_riff());
        }
        None => {
            // Deleted when `staged` drops, after the player has finished.
            let mut staged = tempfile::Builder::new()
                .prefix("readout-")
                .suffix(&format!(".{}", options.audio_format.extension()))
                .tempfile()
                .context("Failed to create temporary audio file")?;
            staged
                .write_all(&audio)
                .context("Failed to write temporary audio file")?;
            play(staged.path(), &options.audio_format)?;
        }
    }
    Ok(())
}

/// Write bytes to a temp file next to `path`, then rename into place.
fn write_audio(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".part");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, bytes)
        .with_context(|| format!("Failed to write audio: {}", temp_path.display()))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| {
            format!(
                "Failed to rename {} -> {}",
                temp_path.display(),
                path.display()
            )
        });
    }

    Ok(())
}

fn report_saved(path: &Path, is_wav: bool) {
    eprintln!("Saved: {}", path.display());
    if !is_wav || !path.exists() {
        return;
    }
    match wav::describe(path) {
        Ok(summary) => eprintln!("  {}", summary),
        Err(e) => tracing::warn!("could not inspect saved audio: {:#}", e),
    }
}
