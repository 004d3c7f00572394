// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for each command.
//
// Rules for this layer:
//   - No model math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No file formats here (that's Layer 4 and 6)
//   - Only workflow coordination

// Transcript → persona corpora
pub mod split_use_case;

// Corpora → artifact set
pub mod train_use_case;

// Artifacts + user text → persona reply
pub mod reply_engine;
