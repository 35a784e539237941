// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file concerns that don't belong to the core:
//
//   config_store.rs  — FeedConfig persisted as JSON, so every
//                      command reads the same thresholds.
//
//   lookup_store.rs  — The static lookup tables (letter and
//                      word vocabularies, head mask) read from
//                      plain-text files.
//
//   batch_stats.rs   — Per-batch mask statistics appended to
//                      a CSV file for inspection.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// FeedConfig JSON persistence
pub mod config_store;

/// Vocabulary and head-mask loading
pub mod lookup_store;

/// Batch statistics CSV logger
pub mod batch_stats;
