// ============================================================
// Layer 6 — Artifact Errors
// ============================================================
// Typed failures of the artifact store, built with `thiserror`.
//
//   • Variants name the file or directory involved.
//   • The application layer receives them as `anyhow::Error`
//     through `?`, so the CLI prints the message as-is.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::persona::Persona;

#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The models directory does not exist. Serving refuses to start.
    #[error("Models directory '{0}' not found. Run `train` first.")]
    MissingDirectory(PathBuf),

    /// One file of the bundle is absent.
    #[error("Artifact '{0}' is missing; the models directory is incomplete. Re-run `train`.")]
    MissingFile(PathBuf),

    /// A persona's index rows and stored utterances disagree in length.
    #[error("{persona} index has {rows} rows but {utterances} stored utterances")]
    Misaligned {
        persona: Persona,
        rows: usize,
        utterances: usize,
    },

    /// Filesystem failure while reading or writing an artifact.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact file exists but does not parse.
    #[error("Malformed artifact '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ArtifactError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}
