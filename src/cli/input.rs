//! Text loading for the speak command.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::args::Cli;
use crate::domain::types::TextSource;

/// File read when no text, `--file` or `--ssml` is given.
pub const DEFAULT_TEXT_FILE: &str = "README.md";

/// Work out where the text comes from. `cwd` is only consulted for the
/// README.md default.
pub fn resolve_source(args: &Cli, cwd: &Path) -> Result<TextSource> {
    if let Some(ref path) = args.ssml {
        return Ok(TextSource::Ssml(path.clone()));
    }

    if let Some(ref path) = args.file {
        if path.as_os_str() == "-" {
            return Ok(TextSource::Stdin);
        }
        return Ok(TextSource::File(path.clone()));
    }

    if !args.text.is_empty() {
        return Ok(TextSource::Inline(args.text.join(" ")));
    }

    let fallback: PathBuf = cwd.join(DEFAULT_TEXT_FILE);
    if fallback.is_file() {
        tracing::debug!(path = %fallback.display(), "no text given, using default file");
        return Ok(TextSource::File(fallback));
    }

    bail!(
        "Nothing to read. Pass text as an argument, use --file or --ssml, \
         or run in a directory containing {}",
        DEFAULT_TEXT_FILE
    );
}

fn read_utf8(bytes: Vec<u8>, what: &str) -> Result<String> {
    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", what))
}

/// Load the text for `source`. Empty or whitespace-only text is an error.
pub fn load_text(source: &TextSource) -> Result<String> {
    let text = match source {
        TextSource::Inline(text) => text.clone(),
        TextSource::File(path) | TextSource::Ssml(path) => {
            if !path.exists() {
                bail!("File not found: {}", path.display());
            }
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            read_utf8(bytes, &path.display().to_string())?
        }
        TextSource::Stdin => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("Failed to read stdin")?;
            read_utf8(bytes, "stdin")?
        }
    };

    if text.trim().is_empty() {
        bail!("Nothing to read: the text is empty");
    }

    Ok(text)
}
