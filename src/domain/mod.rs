// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that define what the system talks about:
// personas, scripted overrides, reply routes, and the traits
// other layers implement.
//
// Rules for this layer:
//   - NO file I/O
//   - NO model math (tf-idf, Markov tables live in ml/)
//   - Only structs, enums, constants and traits

// The two personas and their speaker aliases
pub mod persona;

// Canned reply sets and the tagged reply routes
pub mod overrides;

// Core abstractions (traits) that other layers implement
pub mod traits;
