// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define what the feeder
// works on: the aligned corpora, the lookup tables, the
// configuration and the error taxonomy.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Sentence-aligned corpora and letter encodings
pub mod corpus;

/// Every failure the feeder can report
pub mod error;

/// Window sizes and mask thresholds
pub mod feed_config;

/// Id → token tables and the head-mask table
pub mod lookup;

/// Loader seams implemented by the data and infra layers
pub mod traits;
