// ============================================================
// Layer 4 — Corpus Flattener
// ============================================================
// Concatenates every sentence of a corpus into one flat
// stream of ids, in sentence order.
//
//   [[1, 2], [3, 4, 5, 6], [7, 8, 9]]  →  [1, 2, 3, 4, 5, 6, 7, 8, 9]
//
// Nothing is inserted between sentences. Sentence boundaries
// survive only through the end-of-sentence ids the data
// already carries.
//
// Reference: Rust Book §13 (Iterators)

use crate::domain::error::{FeedError, FeedResult};

/// Flatten per-sentence sequences into one ordered stream.
pub fn flatten<T: Clone>(sentences: &[Vec<T>]) -> Vec<T> {
    let total = sentences.iter().map(Vec::len).sum();
    let mut flat = Vec::with_capacity(total);
    for sentence in sentences {
        flat.extend_from_slice(sentence);
    }
    flat
}

/// Convert numeric-string tokens into ids.
pub fn parse_ids<S: AsRef<str>>(tokens: &[S]) -> FeedResult<Vec<u32>> {
    tokens
        .iter()
        .map(|t| {
            let t = t.as_ref();
            t.parse::<u32>().map_err(|_| FeedError::InvalidToken(t.to_string()))
        })
        .collect()
}
