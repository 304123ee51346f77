//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Readout - read text aloud with a local or Azure voice
#[derive(Parser, Debug, Default)]
#[command(name = "readout")]
#[command(about = "Read text aloud with a local espeak-ng voice or an Azure neural voice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Text to read (reads README.md from the current directory if nothing is given)
    #[arg(conflicts_with_all = ["file", "ssml"])]
    pub text: Vec<String>,

    /// Read text from a file ("-" for stdin)
    #[arg(short, long, conflicts_with = "ssml")]
    pub file: Option<PathBuf>,

    /// Voice: list index, name, or part of a name (Azure: list index or voice name, e.g. en-US-JennyNeural)
    #[arg(short, long)]
    pub voice: Option<String>,

    /// Speaking rate from -10 (slowest) to 10 (fastest)
    #[arg(
        short,
        long,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-10..=10)
    )]
    pub rate: Option<i32>,

    /// Volume from 0 to 100
    #[arg(
        long,
        visible_alias = "vol",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub volume: Option<u8>,

    /// Write audio to this file instead of playing it
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// List available voices and exit
    #[arg(short, long)]
    pub list: bool,

    /// Use Azure neural voices instead of the local engine
    #[arg(long)]
    pub azure: bool,

    /// Azure region (e.g. westeurope)
    #[arg(long, env = "AZURE_SPEECH_REGION")]
    pub azure_region: Option<String>,

    /// Azure subscription key
    #[arg(long, env = "AZURE_SPEECH_KEY", hide_env_values = true)]
    pub azure_key: Option<String>,

    /// Azure output format (e.g. riff-24khz-16bit-mono-pcm, audio-24khz-48kbitrate-mono-mp3)
    #[arg(long)]
    pub audio_format: Option<String>,

    /// Read an SSML document instead of plain text
    #[arg(long)]
    pub ssml: Option<PathBuf>,

    /// Config file path (default: ~/.config/readout/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Store voice, rate, volume, region and format as the new defaults
    #[arg(long)]
    pub save_config: bool,

    /// Print debug logging to stderr
    #[arg(long)]
    pub verbose: bool,
}
