//! Note discovery and loading.
//!
//! A note is a plain UTF-8 file. JSON files wrapping the text as
//! `{"data": "..."}` are unwrapped before extraction.

use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const NOTE_EXTENSIONS: &[&str] = &["txt", "json"];

/// A note loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Where the note came from
    pub path: PathBuf,
    /// Unwrapped note text
    pub text: String,
}

#[derive(Deserialize)]
struct Envelope {
    data: String,
}

/// Expand files and directories into the list of note files to read.
///
/// Files are taken as given. Directories contribute their `.txt` and
/// `.json` files, non-recursively, sorted by path.
pub fn discover(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(path)? {
                let entry_path = entry?.path();
                if entry_path.is_file() && has_note_extension(&entry_path) {
                    entries.push(entry_path);
                }
            }
            entries.sort();
            debug!("Found {} note file(s) in {}", entries.len(), path.display());
            files.extend(entries);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(CliError::InvalidInput(format!(
                "{} is not a file or directory",
                path.display()
            )));
        }
    }

    Ok(files)
}

/// Read a note, unwrapping a `{"data": ...}` envelope if present.
pub fn read_note(path: &Path) -> Result<Note> {
    let raw = fs::read_to_string(path)?;
    let text = unwrap_envelope(path, raw)?;
    Ok(Note {
        path: path.to_path_buf(),
        text,
    })
}

/// Unwrap the note text from its envelope.
///
/// A `.json` file must be an envelope. Any other file is unwrapped only if
/// its whole content happens to be one.
pub fn unwrap_envelope(path: &Path, raw: String) -> Result<String> {
    let is_json_file = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    match serde_json::from_str::<Envelope>(&raw) {
        Ok(envelope) => Ok(envelope.data),
        Err(e) if is_json_file => Err(CliError::InvalidInput(format!(
            "{} is not a {{\"data\": \"...\"}} note: {}",
            path.display(),
            e
        ))),
        Err(_) => Ok(raw),
    }
}

fn has_note_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            NOTE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
