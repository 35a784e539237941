// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The feeder never reads files itself. Everything it consumes
// arrives through these two seams, so a different on-disk
// format only needs a new implementation:
//
//   - TextCorpusLoader implements SequenceCorpusLoader
//   - LookupStore      implements LookupSource
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::corpus::{Mode, TaskCorpora};
use crate::domain::lookup::{HeadMaskTable, Vocabularies};

// ─── SequenceCorpusLoader ─────────────────────────────────────────────────────
/// Any component that can produce the four aligned corpora of one split.
///
/// Implementations must return corpora that already satisfy
/// `TaskCorpora::validate`; all I/O happens here, eagerly.
pub trait SequenceCorpusLoader {
    fn load_corpora(&self, mode: Mode) -> Result<TaskCorpora>;
}

// ─── LookupSource ─────────────────────────────────────────────────────────────
/// Any component that can supply the static lookup tables.
pub trait LookupSource {
    /// Input-letter and output-word id → token tables
    fn load_vocabularies(&self) -> Result<Vocabularies>;

    /// Output word id → phrase logits mask
    fn load_head_mask(&self) -> Result<HeadMaskTable>;
}
