//! Persisted best score across lab runs: one integer in a text file. The
//! simulation core only reports scores; reading and writing them lives out
//! here with the rest of the I/O.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// A missing file reads as zero; a present-but-garbled one is an error.
pub fn load(path: &Path) -> Result<u32> {
    match fs::read_to_string(path) {
        Ok(contents) => contents
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid high score in {}", path.display())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(0),
        Err(err) => {
            Err(err).with_context(|| format!("failed reading {}", path.display()))
        }
    }
}

/// Records `score` if it beats the stored value; returns whichever stands
/// afterwards.
pub fn record(path: &Path, score: u32) -> Result<u32> {
    let current = load(path)?;
    if score <= current {
        return Ok(current);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
    }
    fs::write(path, format!("{score}\n"))
        .with_context(|| format!("failed writing {}", path.display()))?;
    Ok(score)
}
