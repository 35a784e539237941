// ============================================================
// Layer 4 — Multi-Task Batch
// ============================================================
// One windowed, masked batch: five task payloads that share
// the lane dimension B (word level) or B * num_steps (letter
// level, lane-major).
//
//   lm        inputs [B,n]   targets [B,n]   mask [B,n]   sequence_lengths [B]
//   letter    inputs [B*n,W] targets [B*n,W] mask [B*n,W] lengths [B*n]
//   phrase_p  targets [B,n]  mask [B,n]
//   phrase    targets [B,n]  mask [B,n]      logits_mask [B*n, head_mask_width]
//   emoji     targets [B,n]  mask [B,n]
//
// A batch is built fresh per step and owned by the caller.
//
// Reference: Rust Book §5 (Structs)

use ndarray::{Array1, Array2};

/// Next-word prediction payload
#[derive(Debug, Clone, PartialEq)]
pub struct LmPayload {
    pub inputs:           Array2<u32>,
    pub targets:          Array2<u32>,
    pub mask:             Array2<f32>,
    /// Every lane is a full window, so each entry is num_steps
    pub sequence_lengths: Array1<u32>,
}

/// Spelling payload, one row per (lane, step)
#[derive(Debug, Clone, PartialEq)]
pub struct LetterPayload {
    pub inputs:  Array2<u32>,
    /// The lm target id repeated across the word width
    pub targets: Array2<u32>,
    pub mask:    Array2<f32>,
    pub lengths: Array1<u32>,
}

/// Phrase-boundary payload: target is 1 where the phrase id is above 1
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseBoundaryPayload {
    pub targets: Array2<u32>,
    pub mask:    Array2<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhrasePayload {
    pub targets:     Array2<u32>,
    pub mask:        Array2<f32>,
    pub logits_mask: Array2<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmojiPayload {
    pub targets: Array2<u32>,
    pub mask:    Array2<f32>,
}

/// The 6-part batch consumers receive, in field order.
pub type BatchTuple = (
    usize,
    LmPayload,
    LetterPayload,
    PhraseBoundaryPayload,
    PhrasePayload,
    EmojiPayload,
);

#[derive(Debug, Clone, PartialEq)]
pub struct MultiTaskBatch {
    /// Zero-based epoch this batch belongs to
    pub epoch:      usize,
    /// Zero-based window index inside the epoch
    pub window:     usize,
    pub epoch_size: usize,
    pub lm:         LmPayload,
    pub letter:     LetterPayload,
    pub phrase_p:   PhraseBoundaryPayload,
    pub phrase:     PhrasePayload,
    pub emoji:      EmojiPayload,
}

impl MultiTaskBatch {
    pub fn batch_size(&self) -> usize {
        self.lm.inputs.nrows()
    }

    pub fn num_steps(&self) -> usize {
        self.lm.inputs.ncols()
    }

    /// Drop the position metadata and hand out the plain tuple.
    pub fn into_tuple(self) -> BatchTuple {
        (self.epoch_size, self.lm, self.letter, self.phrase_p, self.phrase, self.emoji)
    }
}

/// Binary phrase-boundary targets: 1 where the phrase id is above 1.
pub fn phrase_boundaries(phrase_ids: &Array2<u32>) -> Array2<u32> {
    phrase_ids.mapv(|id| u32::from(id > 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_phrase_boundaries() {
        let p = array![[0u32, 1, 2, 9]];
        assert_eq!(phrase_boundaries(&p), array![[0u32, 0, 1, 1]]);
    }

    #[test]
    fn test_into_tuple_keeps_payload_order() {
        let ids  = array![[1u32, 2]];
        let mask = array![[1.0f32, 0.0]];
        let batch = MultiTaskBatch {
            epoch:      3,
            window:     1,
            epoch_size: 7,
            lm: LmPayload {
                inputs:           ids.clone(),
                targets:          ids.clone(),
                mask:             mask.clone(),
                sequence_lengths: array![2u32],
            },
            letter: LetterPayload {
                inputs:  array![[1u32, 0], [1, 0]],
                targets: array![[1u32, 1], [2, 2]],
                mask:    array![[10.0f32, 0.0], [10.0, 0.0]],
                lengths: array![1u32, 1],
            },
            phrase_p: PhraseBoundaryPayload { targets: array![[0u32, 1]], mask: mask.clone() },
            phrase:   PhrasePayload {
                targets:     array![[0u32, 2]],
                mask:        mask.clone(),
                logits_mask: array![[1.0f32], [1.0]],
            },
            emoji: EmojiPayload { targets: array![[0u32, 9]], mask },
        };
        assert_eq!((batch.batch_size(), batch.num_steps()), (1, 2));

        let (epoch_size, lm, letter, phrase_p, phrase, emoji) = batch.into_tuple();
        assert_eq!(epoch_size, 7);
        assert_eq!(lm.inputs, ids);
        assert_eq!(letter.targets.row(1).to_vec(), vec![2, 2]);
        assert_eq!(phrase_p.targets, array![[0u32, 1]]);
        assert_eq!(phrase.targets, array![[0u32, 2]]);
        assert_eq!(emoji.targets, array![[0u32, 9]]);
    }
}
