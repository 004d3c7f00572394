// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Persistence for the trained bundle:
//
//   artifact_store.rs — Saving and loading the artifact set
//                       Writes every model as JSON into a
//                       staging directory and swaps it in as
//                       one unit. Loading checks that every
//                       file is present and that each persona's
//                       index lines up with its utterances.
//
//   error.rs          — Typed artifact failures (thiserror)
//
// Everything above this layer sees `Artifacts` and never a
// file name.

/// Artifact bundle persistence
pub mod artifact_store;

/// Artifact error types
pub mod error;
