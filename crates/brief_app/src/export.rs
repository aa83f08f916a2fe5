//! Saves generated briefs as markdown files.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot use {} as the output directory: {detail}", .dir.display())]
    OutputDir { dir: PathBuf, detail: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes documents into a fixed directory, one file per project title,
/// atomically via a temp file rename.
pub struct DocumentExporter {
    dir: PathBuf,
}

impl DocumentExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writes `content` under a filename derived from `title` and returns
    /// the final path. An existing file for the same title is replaced.
    pub fn write(&self, title: &str, content: &str) -> Result<PathBuf, ExportError> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(self.dir_error("not a directory"));
        }
        fs::create_dir_all(&self.dir).map_err(|err| self.dir_error(&err.to_string()))?;

        // The temp file lives in the target directory, so creating it doubles
        // as the writability check and the final rename stays on one
        // filesystem.
        let mut tmp =
            NamedTempFile::new_in(&self.dir).map_err(|err| self.dir_error(&err.to_string()))?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        let target = self.dir.join(document_filename(title));
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|err| ExportError::Io(err.error))?;
        Ok(target)
    }

    fn dir_error(&self, detail: &str) -> ExportError {
        ExportError::OutputDir {
            dir: self.dir.clone(),
            detail: detail.to_string(),
        }
    }
}

/// Windows-safe filename for a document: `{sanitized_title}.md`, with the
/// stem `tz` standing in for untitled projects.
pub fn document_filename(title: &str) -> String {
    format!("{}.md", sanitize_title(title))
}

fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    // Runs of underscores read badly in a directory listing; keep one.
    let mut stem = String::with_capacity(replaced.len());
    for chunk in replaced.split('_').filter(|chunk| !chunk.is_empty()) {
        if !stem.is_empty() {
            stem.push('_');
        }
        stem.push_str(chunk);
    }
    let mut stem = stem.trim_matches(['_', ' ', '.']).to_string();

    if stem.is_empty() {
        stem = "tz".to_string();
    }
    // Titles are frequently Cyrillic; cap on a character boundary.
    if let Some((cut, _)) = stem.char_indices().nth(80) {
        stem.truncate(cut);
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
