// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the id files on disk to windowed, masked
// multi-task batches.
//
// The pipeline flows in this order:
//
//   id files
//       │
//       ▼
//   TextCorpusLoader  → reads + aligns the four corpora (once)
//       │
//       ▼
//   flatten           → one id stream per corpus, per epoch
//       │
//       ▼
//   WindowGeometry    → [batch_size, batch_length] lanes,
//       │               num_steps-wide windows
//       ▼
//   MaskBuilder       → per-task loss masks + phrase logits mask
//       │
//       ▼
//   BatchIterator     → one MultiTaskBatch per pull, forever
//
// Each module is responsible for exactly one step.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Reads the plain-text id files of one split
pub mod loader;

/// Concatenates sentences into one stream
pub mod flattener;

/// Lane reshaping and window slicing
pub mod windower;

/// Loss masks and the phrase logits mask
pub mod masks;

/// The batch payload types
pub mod batch;

/// The endless epoch / window state machine
pub mod iterator;
