// ============================================================
// Layer 3 — Task Corpora
// ============================================================
// The four sentence-aligned corpora a loader hands to the
// feeder, plus the per-word letter encoding.
//
// Shape of the data (one sentence, num_steps = 4):
//
//   lm_in   : [  0,  17,  42,   9 ]      word ids (input vocab)
//   lm_out  : [ 17,  42,   9,   0 ]      word ids (output vocab)
//   phrase  : [  0,   5,   5,   0 ]      phrase ids
//   emoji   : [  0,   0,   0,   0 ]      emoji ids
//
//   letters : [ enc(17), enc(42), enc(9), enc(0) ]
//             one LetterEncoding per lm_out word
//
// The corpora are immutable once validated; the iterator
// re-derives every epoch from them.
//
// Reference: Rust Book §5 (Structs), §8 (Vectors)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::{FeedError, FeedResult};

/// Which split of the corpus to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Train,
    Dev,
}

impl Mode {
    /// Prefix used by the corpus file names, e.g. `train_in_ids_lm`
    pub fn file_prefix(self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Dev   => "dev",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_prefix())
    }
}

/// Letter ids of one word, zero-padded to `max_word_length`.
///
/// `length` counts the real ids, including the leading
/// word-start marker. A length of 1 means only the marker is
/// present, which the data uses for emoji positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterEncoding {
    pub ids:    Vec<u32>,
    pub length: usize,
}

impl LetterEncoding {
    /// Truncate `letters` to `max_word_length` and right-pad with zeros.
    pub fn padded(letters: &[u32], max_word_length: usize) -> Self {
        let length  = letters.len().min(max_word_length);
        let mut ids = Vec::with_capacity(max_word_length);
        ids.extend_from_slice(&letters[..length]);
        ids.resize(max_word_length, 0);
        Self { ids, length }
    }
}

/// Everything one split of the corpus contains.
#[derive(Debug, Clone, Default)]
pub struct TaskCorpora {
    pub lm_in:   Vec<Vec<u32>>,
    pub lm_out:  Vec<Vec<u32>>,
    pub letters: Vec<Vec<LetterEncoding>>,
    pub phrase:  Vec<Vec<u32>>,
    pub emoji:   Vec<Vec<u32>>,
}

impl TaskCorpora {
    pub fn sentence_count(&self) -> usize {
        self.lm_in.len()
    }

    /// Total number of word positions across all sentences
    pub fn word_count(&self) -> usize {
        self.lm_in.iter().map(Vec::len).sum()
    }

    /// Check the alignment contract once, before any batch exists.
    ///
    /// 1. All five corpora have the same sentence count
    /// 2. Inside each sentence the four id sequences have the same length
    /// 3. Each sentence has exactly one letter encoding per output word
    /// 4. Every letter encoding is `max_word_length` wide
    pub fn validate(&self, max_word_length: usize) -> FeedResult<()> {
        let n = self.lm_in.len();
        if [self.lm_out.len(), self.letters.len(), self.phrase.len(), self.emoji.len()]
            .iter()
            .any(|&count| count != n)
        {
            return Err(FeedError::CorpusMismatch {
                lm_in:   n,
                lm_out:  self.lm_out.len(),
                letters: self.letters.len(),
                phrase:  self.phrase.len(),
                emoji:   self.emoji.len(),
            });
        }

        for (sentence, (((lm_in, lm_out), phrase), emoji)) in self
            .lm_in
            .iter()
            .zip(&self.lm_out)
            .zip(&self.phrase)
            .zip(&self.emoji)
            .enumerate()
        {
            let n = lm_in.len();
            if lm_out.len() != n || phrase.len() != n || emoji.len() != n {
                return Err(FeedError::SentenceLengthMismatch {
                    sentence,
                    lm_in:  n,
                    lm_out: lm_out.len(),
                    phrase: phrase.len(),
                    emoji:  emoji.len(),
                });
            }
        }

        for (sentence, (lm_out, letters)) in self.lm_out.iter().zip(&self.letters).enumerate() {
            if letters.len() != lm_out.len() {
                return Err(FeedError::LetterCountMismatch {
                    sentence,
                    words:   lm_out.len(),
                    letters: letters.len(),
                });
            }

            if let Some((word, bad)) = letters
                .iter()
                .enumerate()
                .find(|(_, l)| l.ids.len() != max_word_length || l.length > max_word_length)
            {
                return Err(FeedError::LetterWidth {
                    sentence,
                    word,
                    width:    bad.ids.len(),
                    length:   bad.length,
                    expected: max_word_length,
                });
            }
        }

        Ok(())
    }
}
