// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw chat export and clean utterance
// lists, plus the text utilities the models share.
//
//   raw transcript
//       │
//       ▼
//   LogSplitter       → per-persona message lists
//       │
//       ▼
//   Preprocessor      → strips images/URLs, collapses whitespace
//       │
//       ▼
//   <handle>.txt      → one utterance per line
//       │
//       ▼
//   UtteranceFile     → loads a persona corpus for training
//       │
//       ▼
//   tokenize          → tokens for the Markov model and vocabulary
//
// Each module does exactly one step.

/// Word tokenizer and name detector
pub mod tokenizer;

/// Loads persona corpus files
pub mod loader;

/// Cleans collected chat messages
pub mod preprocessor;

/// Splits a raw transcript into persona corpora
pub mod log_splitter;

/// Expanded vocabulary export
pub mod vocabulary;
