// ============================================================
// Layer 6 — Batch Statistics Logger
// ============================================================
// Summarises each batch's masks and appends one CSV row per
// batch, so a data run can be checked before training on it.
//
// Columns:
//   epoch, window          position of the batch
//   lm_active              lm positions with non-zero weight
//   lm_emoji               lm positions weighted 5 (emoji tag / emoji)
//   letter_emoji           words weighted 10 (marker only)
//   letter_reconstructed   words weighted 15 (spelling == target)
//   letter_mismatch        words weighted 5
//   phrase_active          phrase-id positions with non-zero weight
//   emoji_active           emoji positions with non-zero weight
//   emoji_combination      emoji positions weighted 3
//
// Example CSV output:
//   epoch,window,lm_active,lm_emoji,letter_emoji,...
//   0,0,38,2,1,30,5,4,1,0
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::data::batch::MultiTaskBatch;
use crate::data::masks::LetterWeight;

const HEADER: &str = "epoch,window,lm_active,lm_emoji,letter_emoji,letter_reconstructed,\
letter_mismatch,phrase_active,emoji_active,emoji_combination";

/// Counts describing one batch's masks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub epoch:                usize,
    pub window:               usize,
    pub lm_active:            usize,
    pub lm_emoji:             usize,
    pub letter_emoji:         usize,
    pub letter_reconstructed: usize,
    pub letter_mismatch:      usize,
    pub phrase_active:        usize,
    pub emoji_active:         usize,
    pub emoji_combination:    usize,
}

fn count(mask: &Array2<f32>, pred: impl Fn(f32) -> bool) -> usize {
    mask.iter().filter(|&&v| pred(v)).count()
}

impl BatchStats {
    pub fn from_batch(b: &MultiTaskBatch) -> Self {
        // Each word's weight sits on its last real letter, so
        // counting weight values counts words.
        let letters = &b.letter.mask;
        Self {
            epoch:                b.epoch,
            window:               b.window,
            lm_active:            count(&b.lm.mask, |v| v > 0.0),
            lm_emoji:             count(&b.lm.mask, |v| v == 5.0),
            letter_emoji:         count(letters, |v| v == LetterWeight::Emoji.value()),
            letter_reconstructed: count(letters, |v| v == LetterWeight::Reconstructed.value()),
            letter_mismatch:      count(letters, |v| v == LetterWeight::Mismatch.value()),
            phrase_active:        count(&b.phrase.mask, |v| v > 0.0),
            emoji_active:         count(&b.emoji.mask, |v| v > 0.0),
            emoji_combination:    count(&b.emoji.mask, |v| v == 3.0),
        }
    }

    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            self.epoch,
            self.window,
            self.lm_active,
            self.lm_emoji,
            self.letter_emoji,
            self.letter_reconstructed,
            self.letter_mismatch,
            self.phrase_active,
            self.emoji_active,
            self.emoji_combination,
        )
    }
}

/// Appends BatchStats rows to a CSV file.
pub struct BatchStatsLogger {
    csv_path: PathBuf,
}

impl BatchStatsLogger {
    /// Writes the header only when the file is new, so runs append.
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();

        if let Some(parent) = csv_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created batch stats CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, stats: &BatchStats) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot append to '{}'", self.csv_path.display()))?;
        writeln!(f, "{}", stats.csv_row())?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batch::{
        EmojiPayload, LetterPayload, LmPayload, PhraseBoundaryPayload, PhrasePayload,
    };
    use ndarray::{array, Array1};
    use tempfile::tempdir;

    fn batch() -> MultiTaskBatch {
        MultiTaskBatch {
            epoch:      1,
            window:     2,
            epoch_size: 3,
            lm: LmPayload {
                inputs:           array![[1u32, 2]],
                targets:          array![[2u32, 0]],
                mask:             array![[5.0f32, 0.0]],
                sequence_lengths: Array1::from_elem(1, 2),
            },
            letter: LetterPayload {
                inputs:  array![[1u32, 2, 0], [1, 0, 0]],
                targets: array![[2u32, 2, 2], [0, 0, 0]],
                mask:    array![[1.0f32, 15.0, 0.0], [10.0, 0.0, 0.0]],
                lengths: array![2u32, 1],
            },
            phrase_p: PhraseBoundaryPayload {
                targets: array![[1u32, 0]],
                mask:    array![[1.0f32, 0.0]],
            },
            phrase: PhrasePayload {
                targets:     array![[2u32, 0]],
                mask:        array![[1.0f32, 0.0]],
                logits_mask: array![[1.0f32], [0.0]],
            },
            emoji: EmojiPayload {
                targets: array![[9u32, 1]],
                mask:    array![[3.0f32, 1.0]],
            },
        }
    }

    #[test]
    fn test_stats_counts() {
        let s = BatchStats::from_batch(&batch());
        assert_eq!((s.epoch, s.window), (1, 2));
        assert_eq!(s.lm_active, 1);
        assert_eq!(s.lm_emoji, 1);
        assert_eq!(s.letter_emoji, 1);
        assert_eq!(s.letter_reconstructed, 1);
        assert_eq!(s.letter_mismatch, 0);
        assert_eq!(s.phrase_active, 1);
        assert_eq!(s.emoji_active, 2);
        assert_eq!(s.emoji_combination, 1);
    }

    #[test]
    fn test_logger_writes_header_once() {
        let tmp  = tempdir().unwrap();
        let path = tmp.path().join("stats.csv");
        let s    = BatchStats::from_batch(&batch());

        BatchStatsLogger::new(&path).unwrap().log(&s).unwrap();
        BatchStatsLogger::new(&path).unwrap().log(&s).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("epoch,window"));
        assert_eq!(lines[1], "1,2,1,1,1,1,0,1,2,1");
    }
}
