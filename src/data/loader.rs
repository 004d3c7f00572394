// ============================================================
// Layer 4 — Utterance Loader
// ============================================================
// Reads a persona corpus file written by `split`:
//   one utterance per line, UTF-8.
//
// Invalid UTF-8 bytes are replaced rather than rejected, the
// same leniency the transcript reader uses. Blank lines are
// dropped and every line is trimmed.
//
// Unlike a transcript, a missing corpus file is an error: the
// trainer must never build a half-complete artifact set.

use anyhow::{Context, Result};
use std::{fs, path::Path, path::PathBuf};

use crate::domain::traits::UtteranceSource;

/// A persona corpus on disk.
pub struct UtteranceFile {
    path: PathBuf,
}

impl UtteranceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UtteranceSource for UtteranceFile {
    fn load_utterances(&self) -> Result<Vec<String>> {
        let text = read_lossy(&self.path)
            .with_context(|| format!("Cannot read persona file '{}'", self.path.display()))?;

        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!("Loaded {} utterances from '{}'", lines.len(), self.path.display());
        Ok(lines)
    }
}

/// Read a file as UTF-8, replacing invalid sequences.
pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_skips_blank_lines_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.txt");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "  hi there  \n\n\r\nsecond line").unwrap();

        let lines = UtteranceFile::new(&path).load_utterances().unwrap();
        assert_eq!(lines, vec!["hi there", "second line"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.txt");
        fs::write(&path, b"ok \xff line\n").unwrap();

        let lines = UtteranceFile::new(&path).load_utterances().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("ok"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = UtteranceFile::new(dir.path().join("nope.txt"))
            .load_utterances()
            .unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }
}
