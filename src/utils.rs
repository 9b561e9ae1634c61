// ABOUTME: Utility functions for the finance-deck application
// ABOUTME: Directory handling, output naming and atomic file writes

use crate::errors::{DeckError, Result};
use chrono::{DateTime, Utc};
use log::warn;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(DeckError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory_exists(parent)?;
        }
    }
    Ok(())
}

/// Turn a free-text subject into something safe to use as a file stem.
pub fn sanitize_file_stem(subject: &str) -> String {
    let stem: String = subject
        .trim()
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%' | '#' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .take(80)
        .collect();

    if stem.is_empty() {
        "presentation".to_string()
    } else {
        stem
    }
}

/// `{dir}/{subject}_{YYYYmmdd_HHMMSS}_{id}.pptx`, where `id` is eight hex
/// digits so two decks started in the same second never share a path.
pub fn default_output_path(output_dir: &Path, subject: &str, now: DateTime<Utc>) -> PathBuf {
    let id = uuid::Uuid::new_v4().simple().to_string();
    output_dir.join(format!(
        "{}_{}_{}.pptx",
        sanitize_file_stem(subject),
        now.format("%Y%m%d_%H%M%S"),
        &id[..8]
    ))
}

/// Write `bytes` to `path` via a temporary sibling file and a rename, so
/// readers never observe a half-written file.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| DeckError::ValidationError(format!("Not a file path: {:?}", path)))?;
    let temp_path = path.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4()
    ));

    let result = (|| -> Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;
        Ok(())
    })();

    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            warn!("Failed to clean up temp file {:?}: {}", temp_path, e);
        }
    }
    result
}
