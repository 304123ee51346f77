//! Playback of encoded audio files through an installed system player.

use anyhow::{anyhow, bail, Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use crate::domain::types::AudioFormat;

/// A command-line audio player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub command: &'static str,
    pub args: &'static [&'static str],
    /// Only understands WAV input
    pub wav_only: bool,
}

const PLAYERS: &[Player] = &[
    Player {
        command: "paplay",
        args: &[],
        wav_only: true,
    },
    Player {
        command: "aplay",
        args: &["-q"],
        wav_only: true,
    },
    Player {
        command: "ffplay",
        args: &["-nodisp", "-autoexit", "-loglevel", "quiet"],
        wav_only: false,
    },
];

/// Players able to handle `format`, in preference order.
pub fn candidates(format: &AudioFormat) -> Vec<Player> {
    PLAYERS
        .iter()
        .filter(|p| format.is_riff() || !p.wav_only)
        .copied()
        .collect()
}

/// Play `path` with the first player that is installed and succeeds.
/// Blocks until playback ends.
pub fn play_file(path: &Path, format: &AudioFormat) -> Result<()> {
    let players = candidates(format);
    play_with(&players, path)
        .with_context(|| format!("Failed to play {} ({})", path.display(), format))
}

fn play_with(players: &[Player], path: &Path) -> Result<()> {
    let mut last_error = None;

    for player in players {
        let result = Command::new(player.command)
            .args(player.args)
            .arg(path)
            .output();

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(player = player.command, "player not installed");
                continue;
            }
            Err(e) => {
                tracing::warn!(player = player.command, "failed to start player: {}", e);
                last_error = Some(
                    anyhow::Error::new(e).context(format!("Failed to run {}", player.command)),
                );
                continue;
            }
        };

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                player = player.command,
                status = %output.status,
                "player failed, trying the next one"
            );
            last_error = Some(anyhow!(
                "{} failed ({}): {}",
                player.command,
                output.status,
                error_msg.trim()
            ));
            continue;
        }
        return Ok(());
    }

    if let Some(e) = last_error {
        return Err(e);
    }
    let names: Vec<&str> = players.iter().map(|p| p.command).collect();
    bail!(
        "No audio player found (tried {}). Use --save to write the audio to a file",
        names.join(", ")
    );
}
