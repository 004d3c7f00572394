// ============================================================
// Layer 2 — SplitUseCase
// ============================================================
// Turns one raw chat export into the two persona corpora:
//
//   Step 1: Read the transcript lossily   (Layer 4 - data)
//   Step 2: Parse, clean and dedupe       (Layer 4 - data)
//   Step 3: Write <handle>.txt per persona (Layer 4 - data)
//
// A missing transcript is not an error: it is logged and the
// run ends without writing anything.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{loader::read_lossy, log_splitter::LogSplitter};
use crate::domain::persona::Persona;

// ─── Split Configuration ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub infile: PathBuf,
    pub outdir: PathBuf,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            infile: PathBuf::from("thecapicornist.txt"),
            outdir: PathBuf::from("data"),
        }
    }
}

/// What a split run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The input file was absent; nothing was written.
    MissingInput,
    Written(Vec<(Persona, PathBuf, usize)>),
}

pub struct SplitUseCase {
    config: SplitConfig,
}

impl SplitUseCase {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<SplitOutcome> {
        let cfg = &self.config;

        if !cfg.infile.is_file() {
            tracing::warn!("Input file '{}' not found; nothing to split", cfg.infile.display());
            return Ok(SplitOutcome::MissingInput);
        }

        // ── Step 1: Read ──────────────────────────────────────────────────────
        let transcript = read_lossy(&cfg.infile)
            .with_context(|| format!("Cannot read transcript '{}'", cfg.infile.display()))?;

        // ── Step 2: Parse and sanitize ────────────────────────────────────────
        let corpora = LogSplitter::new().split(&transcript);

        // ── Step 3: Write corpora ─────────────────────────────────────────────
        let written = corpora.write_to(&cfg.outdir)?;
        let summary: Vec<(Persona, PathBuf, usize)> = written
            .into_iter()
            .map(|(persona, path)| {
                let count = corpora.get(persona).len();
                tracing::info!("Wrote {} utterances for {} to '{}'", count, persona, path.display());
                (persona, path, count)
            })
            .collect();

        Ok(SplitOutcome::Written(summary))
    }
}
