// ============================================================
// Layer 3 — Feed Errors
// ============================================================
// Every failure the batch feeder can report. There are no
// retries anywhere in the core: each variant is fatal and is
// handed back to the caller, which decides whether to halt.
//
// Failure classes:
//   - Configuration   → InvalidConfig, ShapeUnderflow
//   - Load contract   → CorpusMismatch, SentenceLengthMismatch,
//                       LetterCountMismatch, LetterWidth,
//                       InvalidToken, HeadMaskWidth
//   - Lookup failure  → UnknownId
//
// Reference: thiserror crate documentation
//            Rust Book §9 (Error Handling)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "Corpora are not aligned: lm_in={lm_in}, lm_out={lm_out}, \
         letters={letters}, phrase={phrase}, emoji={emoji} sentences"
    )]
    CorpusMismatch {
        lm_in:   usize,
        lm_out:  usize,
        letters: usize,
        phrase:  usize,
        emoji:   usize,
    },

    #[error(
        "Sentence {sentence} has mismatched lengths: lm_in={lm_in}, \
         lm_out={lm_out}, phrase={phrase}, emoji={emoji}"
    )]
    SentenceLengthMismatch {
        sentence: usize,
        lm_in:    usize,
        lm_out:   usize,
        phrase:   usize,
        emoji:    usize,
    },

    #[error("Sentence {sentence} has {letters} letter encodings but {words} output words")]
    LetterCountMismatch { sentence: usize, words: usize, letters: usize },

    #[error(
        "Letter encoding {word} of sentence {sentence} is malformed: width {width}, \
         length {length}, expected width {expected}"
    )]
    LetterWidth {
        sentence: usize,
        word:     usize,
        width:    usize,
        length:   usize,
        expected: usize,
    },

    #[error("Token '{0}' is not a non-negative integer id")]
    InvalidToken(String),

    #[error("Head mask row {row} has width {width}, expected {expected}")]
    HeadMaskWidth { row: usize, width: usize, expected: usize },

    #[error(
        "Corpus of {words} words is too short for batch_size={batch_size}, \
         num_steps={num_steps} (batch_length={batch_length})"
    )]
    ShapeUnderflow {
        words:        usize,
        batch_size:   usize,
        num_steps:    usize,
        batch_length: usize,
    },

    #[error("Id {id} is not present in the {table} table")]
    UnknownId { table: &'static str, id: u32 },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Result alias for the core feeder
pub type FeedResult<T> = std::result::Result<T, FeedError>;
