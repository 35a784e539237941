// ============================================================
// Layer 4 — Mask Builder
// ============================================================
// Builds the per-task loss masks for one window, plus the
// phrase logits mask. A mask value of 0.0 removes a position
// from the loss; larger values up-weight it.
//
//   task        shape                       rule
//   ─────────   ─────────────────────────   ─────────────────────────────
//   lm          [B, n]                      0 if id < lm_unused_num
//                                           5 if id == emoji tag
//                                           5 if id >= emoji min id
//   letter      [B*n, max_word_length]      1 … 1, w, 0 … 0   per word
//                                           0 row if target < lm_unused_num
//   phrase_p    [B, n]                      0 if phrase id == 0
//   phrase      [B, n]                      0 if phrase id < phrase_unused_num
//   emoji       [B, n]                      0 if id < emoji_unused_num
//                                           3 if id >= combination min id
//
// Rules inside one mask are applied in the order listed and
// the later rule wins where several match.
//
// The letter weight `w` sits on the last real letter:
//   Emoji          length == 1 (only the word-start marker)  → 10
//   Reconstructed  letters spell the target word             → 15
//   Mismatch       anything else                             →  5
//
// Reference: ndarray documentation (mapv, Zip)

use ndarray::{Array1, Array2};

use crate::domain::error::FeedResult;
use crate::domain::feed_config::MaskThresholds;
use crate::domain::lookup::{HeadMaskTable, Vocabularies};

/// How the last real letter of a word is weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterWeight {
    Emoji,
    Reconstructed,
    Mismatch,
}

impl LetterWeight {
    pub fn value(self) -> f32 {
        match self {
            LetterWeight::Emoji         => 10.0,
            LetterWeight::Reconstructed => 15.0,
            LetterWeight::Mismatch      => 5.0,
        }
    }
}

/// Mask policies for one window. Borrows the lookup tables
/// from the iterator that owns them.
pub struct MaskBuilder<'a> {
    thresholds:      MaskThresholds,
    max_word_length: usize,
    vocab:           &'a Vocabularies,
    head_mask:       &'a HeadMaskTable,
}

impl<'a> MaskBuilder<'a> {
    pub fn new(
        thresholds:      MaskThresholds,
        max_word_length: usize,
        vocab:           &'a Vocabularies,
        head_mask:       &'a HeadMaskTable,
    ) -> Self {
        Self { thresholds, max_word_length, vocab, head_mask }
    }

    // ── Word-level masks ──────────────────────────────────────────────────────

    pub fn lm_mask(&self, targets: &Array2<u32>) -> Array2<f32> {
        let t = self.thresholds;
        targets.mapv(|id| {
            let mut w = 1.0;
            if id < t.lm_unused_num {
                w = 0.0;
            }
            if id == t.out_emoji_tag_id {
                w = 5.0;
            }
            if id >= t.out_emoji_min_id {
                w = 5.0;
            }
            w
        })
    }

    pub fn phrase_p_mask(&self, phrase_targets: &Array2<u32>) -> Array2<f32> {
        phrase_targets.mapv(|id| if id == 0 { 0.0 } else { 1.0 })
    }

    pub fn phrase_mask(&self, phrase_targets: &Array2<u32>) -> Array2<f32> {
        let unused = self.thresholds.phrase_unused_num;
        phrase_targets.mapv(|id| if id < unused { 0.0 } else { 1.0 })
    }

    pub fn emoji_mask(&self, emoji_targets: &Array2<u32>) -> Array2<f32> {
        let t = self.thresholds;
        emoji_targets.mapv(|id| {
            let mut w = 1.0;
            if id < t.emoji_unused_num {
                w = 0.0;
            }
            if id >= t.emoji_out_combination_min_id {
                w = 3.0;
            }
            w
        })
    }

    /// Head-mask row for every flattened lm target.
    pub fn phrase_logits_mask(&self, flat_targets: &[u32]) -> FeedResult<Array2<f32>> {
        self.head_mask.gather(flat_targets)
    }

    // ── Letter mask ───────────────────────────────────────────────────────────

    /// Classify a word with `length > 0` real letters against its target word.
    pub fn letter_weight(
        &self,
        length:         usize,
        letters:        &[u32],
        target_word_id: u32,
    ) -> FeedResult<LetterWeight> {
        if length == 1 {
            return Ok(LetterWeight::Emoji);
        }

        // Skip the word-start marker at index 0
        let mut spelled = String::new();
        for &id in letters.iter().take(length).skip(1) {
            spelled.push_str(self.vocab.in_letters.token(id)?);
        }
        let target = self.vocab.out_words.token(target_word_id)?;

        Ok(if spelled == target {
            LetterWeight::Reconstructed
        } else {
            LetterWeight::Mismatch
        })
    }

    /// One mask row: `[1.0; len-1] + [w] + [0.0; max_word_length-len]`.
    ///
    /// Rows for empty words are all zero. Rows for unused targets
    /// (pad / eos) are built, so their lookups still run, then zeroed.
    pub fn letter_mask_row(
        &self,
        length:         usize,
        letters:        &[u32],
        target_word_id: u32,
    ) -> FeedResult<Vec<f32>> {
        let mut row = vec![0.0f32; self.max_word_length];
        let length  = length.min(self.max_word_length);
        if length == 0 {
            return Ok(row);
        }

        let weight = self.letter_weight(length, letters, target_word_id)?;
        if target_word_id >= self.thresholds.lm_unused_num {
            row[..length - 1].fill(1.0);
            row[length - 1] = weight.value();
        }
        Ok(row)
    }

    /// Letter mask for a whole window: one row per (lane, step).
    pub fn letter_mask(
        &self,
        letter_inputs: &Array2<u32>,
        lengths:       &Array1<u32>,
        flat_targets:  &[u32],
    ) -> FeedResult<Array2<f32>> {
        let rows = letter_inputs.nrows();
        let mut flat = Vec::with_capacity(rows * self.max_word_length);

        for ((letters, &length), &target) in letter_inputs
            .rows()
            .into_iter()
            .zip(lengths.iter())
            .zip(flat_targets)
        {
            let letters = letters.to_vec();
            flat.extend(self.letter_mask_row(length as usize, &letters, target)?);
        }

        Ok(Array2::from_shape_vec((rows, self.max_word_length), flat)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::FeedError;
    use crate::domain::lookup::IdTable;
    use ndarray::array;

    // letters: 0 pad, 1 <s>, 2 a, 3 t, 4 i
    // words:   0 <eos>, 1 at, 2 it, 3 <emoji>, 4 🙂
    fn vocab() -> Vocabularies {
        Vocabularies {
            in_letters: IdTable::new(
                "in_letters",
                ["", "<s>", "a", "t", "i"].iter().map(|s| s.to_string()).collect(),
            ),
            out_words: IdTable::new(
                "out_words",
                ["<eos>", "at", "it", "<emoji>", "🙂"].iter().map(|s| s.to_string()).collect(),
            ),
        }
    }

    fn thresholds() -> MaskThresholds {
        MaskThresholds {
            lm_unused_num:                1,
            phrase_unused_num:            2,
            emoji_unused_num:             1,
            out_emoji_tag_id:             3,
            out_emoji_min_id:             4,
            emoji_out_combination_min_id: 7,
        }
    }

    fn head_mask() -> HeadMaskTable {
        HeadMaskTable::from_rows((0..5).map(|i| vec![i as f32, 1.0]).collect()).unwrap()
    }

    #[test]
    fn test_single_letter_is_emoji_weight() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        // Target id is irrelevant, even one outside the word table
        assert_eq!(b.letter_weight(1, &[1, 0, 0, 0], 99).unwrap().value(), 10.0);
    }

    #[test]
    fn test_reconstructed_spelling_weight() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        assert_eq!(b.letter_weight(3, &[1, 2, 3, 0], 1).unwrap(), LetterWeight::Reconstructed);
        assert_eq!(b.letter_weight(3, &[1, 2, 3, 0], 1).unwrap().value(), 15.0);
        assert_eq!(b.letter_weight(3, &[1, 2, 3, 0], 2).unwrap().value(), 5.0);
    }

    #[test]
    fn test_letter_row_layout() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 5, &v, &hm);
        assert_eq!(
            b.letter_mask_row(3, &[1, 2, 3, 0, 0], 1).unwrap(),
            vec![1.0, 1.0, 15.0, 0.0, 0.0]
        );
        assert_eq!(b.letter_mask_row(1, &[1, 0, 0, 0, 0], 4).unwrap(), vec![10.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(b.letter_mask_row(0, &[0; 5], 1).unwrap(), vec![0.0; 5]);
    }

    #[test]
    fn test_letter_row_zero_for_eos_target() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        assert_eq!(b.letter_mask_row(3, &[1, 2, 3, 0], 0).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn test_unknown_letter_under_eos_target_is_fatal() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        assert!(matches!(
            b.letter_mask_row(3, &[1, 42, 42, 0], 0),
            Err(FeedError::UnknownId { table: "in_letters", id: 42 })
        ));
    }

    #[test]
    fn test_unknown_letter_is_fatal() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        assert!(matches!(
            b.letter_mask_row(2, &[1, 42, 0, 0], 1),
            Err(FeedError::UnknownId { table: "in_letters", id: 42 })
        ));
    }

    #[test]
    fn test_lm_mask_precedence() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        let m = b.lm_mask(&array![[0, 1, 3, 4], [9, 2, 0, 1]]);
        assert_eq!(m, array![[0.0f32, 1.0, 5.0, 5.0], [5.0, 1.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_lm_mask_tag_id_at_or_above_emoji_min() {
        let (v, hm) = (vocab(), head_mask());
        let t = MaskThresholds { out_emoji_tag_id: 4, ..thresholds() };
        let b = MaskBuilder::new(t, 4, &v, &hm);
        assert_eq!(b.lm_mask(&array![[4, 0]]), array![[5.0f32, 0.0]]);
    }

    #[test]
    fn test_phrase_masks() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        let y = array![[0, 1, 2, 5]];
        assert_eq!(b.phrase_p_mask(&y), array![[0.0f32, 1.0, 1.0, 1.0]]);
        assert_eq!(b.phrase_mask(&y), array![[0.0f32, 0.0, 1.0, 1.0]]);
    }

    #[test]
    fn test_emoji_mask() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        let m = b.emoji_mask(&array![[0, 1, 6, 7, 12]]);
        assert_eq!(m, array![[0.0f32, 1.0, 1.0, 3.0, 3.0]]);
    }

    #[test]
    fn test_letter_mask_for_window() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        let letters = array![[1, 2, 3, 0], [1, 4, 3, 0], [1, 0, 0, 0]];
        let lengths = array![3u32, 3, 1];
        let m = b.letter_mask(&letters, &lengths, &[1, 1, 0]).unwrap();
        assert_eq!(
            m,
            array![
                [1.0f32, 1.0, 15.0, 0.0],
                [1.0, 1.0, 5.0, 0.0],
                [0.0, 0.0, 0.0, 0.0],
            ]
        );
    }

    #[test]
    fn test_phrase_logits_mask_gathers_rows() {
        let (v, hm) = (vocab(), head_mask());
        let b = MaskBuilder::new(thresholds(), 4, &v, &hm);
        let m = b.phrase_logits_mask(&[2, 0]).unwrap();
        assert_eq!(m, array![[2.0f32, 1.0], [0.0, 1.0]]);
    }
}
