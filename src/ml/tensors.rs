// ============================================================
// Layer 5 — Tensor Batch
// ============================================================
// Moves a MultiTaskBatch onto a Burn device. Shapes are kept
// exactly as the feeder produced them; ids and lengths become
// Int tensors, masks become float tensors.
//
//   lm        inputs/targets [B, n] Int    mask [B, n]
//             sequence_lengths [B] Int
//   letter    inputs/targets [B*n, W] Int  mask [B*n, W]
//             lengths [B*n] Int
//   phrase_p  targets [B, n] Int           mask [B, n]
//   phrase    targets [B, n] Int           mask [B, n]
//             logits_mask [B*n, head_mask_width]
//   emoji     targets [B, n] Int           mask [B, n]
//
// B is the Burn Backend (NdArray on CPU, Wgpu on a GPU), so the
// same conversion works on any device.
//
// Reference: Burn Book §4 (Batcher)

use burn::prelude::*;
use burn::tensor::TensorData;
use ndarray::{Array1, Array2};

use crate::data::batch::MultiTaskBatch;

#[derive(Debug, Clone)]
pub struct TensorBatch<B: Backend> {
    pub epoch_size: usize,

    pub lm_inputs:           Tensor<B, 2, Int>,
    pub lm_targets:          Tensor<B, 2, Int>,
    pub lm_mask:             Tensor<B, 2>,
    pub lm_sequence_lengths: Tensor<B, 1, Int>,

    pub letter_inputs:  Tensor<B, 2, Int>,
    pub letter_targets: Tensor<B, 2, Int>,
    pub letter_mask:    Tensor<B, 2>,
    pub letter_lengths: Tensor<B, 1, Int>,

    pub phrase_p_targets: Tensor<B, 2, Int>,
    pub phrase_p_mask:    Tensor<B, 2>,

    pub phrase_targets:     Tensor<B, 2, Int>,
    pub phrase_mask:        Tensor<B, 2>,
    pub phrase_logits_mask: Tensor<B, 2>,

    pub emoji_targets: Tensor<B, 2, Int>,
    pub emoji_mask:    Tensor<B, 2>,
}

/// Burn Int tensors are signed; every u32 id fits in i64 without wrapping.
fn ints2<B: Backend>(a: &Array2<u32>, device: &B::Device) -> Tensor<B, 2, Int> {
    let data: Vec<i64> = a.iter().map(|&x| i64::from(x)).collect();
    Tensor::from_data(TensorData::new(data, [a.nrows(), a.ncols()]), device)
}

fn ints1<B: Backend>(a: &Array1<u32>, device: &B::Device) -> Tensor<B, 1, Int> {
    let data: Vec<i64> = a.iter().map(|&x| i64::from(x)).collect();
    Tensor::from_data(TensorData::new(data, [a.len()]), device)
}

fn floats2<B: Backend>(a: &Array2<f32>, device: &B::Device) -> Tensor<B, 2> {
    let data: Vec<f32> = a.iter().copied().collect();
    Tensor::from_data(TensorData::new(data, [a.nrows(), a.ncols()]), device)
}

impl<B: Backend> TensorBatch<B> {
    pub fn from_batch(b: &MultiTaskBatch, device: &B::Device) -> Self {
        Self {
            epoch_size: b.epoch_size,

            lm_inputs:           ints2(&b.lm.inputs, device),
            lm_targets:          ints2(&b.lm.targets, device),
            lm_mask:             floats2(&b.lm.mask, device),
            lm_sequence_lengths: ints1(&b.lm.sequence_lengths, device),

            letter_inputs:  ints2(&b.letter.inputs, device),
            letter_targets: ints2(&b.letter.targets, device),
            letter_mask:    floats2(&b.letter.mask, device),
            letter_lengths: ints1(&b.letter.lengths, device),

            phrase_p_targets: ints2(&b.phrase_p.targets, device),
            phrase_p_mask:    floats2(&b.phrase_p.mask, device),

            phrase_targets:     ints2(&b.phrase.targets, device),
            phrase_mask:        floats2(&b.phrase.mask, device),
            phrase_logits_mask: floats2(&b.phrase.logits_mask, device),

            emoji_targets: ints2(&b.emoji.targets, device),
            emoji_mask:    floats2(&b.emoji.mask, device),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batch::{
        EmojiPayload, LetterPayload, LmPayload, PhraseBoundaryPayload, PhrasePayload,
    };
    use burn::backend::NdArray;
    use ndarray::array;

    type TestBackend = NdArray;

    fn batch() -> MultiTaskBatch {
        MultiTaskBatch {
            epoch:      0,
            window:     0,
            epoch_size: 4,
            lm: LmPayload {
                inputs:           array![[1u32, 2, 3], [4, 5, 6]],
                targets:          array![[2u32, 3, 0], [5, 6, 7]],
                mask:             array![[1.0f32, 1.0, 0.0], [1.0, 1.0, 5.0]],
                sequence_lengths: array![3u32, 3],
            },
            letter: LetterPayload {
                inputs:  Array2::zeros((6, 5)),
                targets: Array2::zeros((6, 5)),
                mask:    Array2::zeros((6, 5)),
                lengths: Array1::zeros(6),
            },
            phrase_p: PhraseBoundaryPayload {
                targets: Array2::zeros((2, 3)),
                mask:    Array2::ones((2, 3)),
            },
            phrase: PhrasePayload {
                targets:     Array2::zeros((2, 3)),
                mask:        Array2::ones((2, 3)),
                logits_mask: Array2::ones((6, 8)),
            },
            emoji: EmojiPayload {
                targets: Array2::zeros((2, 3)),
                mask:    Array2::ones((2, 3)),
            },
        }
    }

    #[test]
    fn test_shapes_survive_conversion() {
        let device = Default::default();
        let t = TensorBatch::<TestBackend>::from_batch(&batch(), &device);

        assert_eq!(t.epoch_size, 4);
        assert_eq!(t.lm_inputs.dims(), [2, 3]);
        assert_eq!(t.lm_mask.dims(), [2, 3]);
        assert_eq!(t.lm_sequence_lengths.dims(), [2]);
        assert_eq!(t.letter_inputs.dims(), [6, 5]);
        assert_eq!(t.letter_lengths.dims(), [6]);
        assert_eq!(t.phrase_logits_mask.dims(), [6, 8]);
        assert_eq!(t.emoji_mask.dims(), [2, 3]);
    }

    #[test]
    fn test_values_survive_conversion() {
        let device = Default::default();
        let t = TensorBatch::<TestBackend>::from_batch(&batch(), &device);

        let targets: Vec<i64> = t
            .lm_targets
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(targets, vec![2, 3, 0, 5, 6, 7]);

        let mask: Vec<f32> = t.lm_mask.into_data().to_vec().unwrap();
        assert_eq!(mask, vec![1.0, 1.0, 0.0, 1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_large_ids_do_not_wrap() {
        let device = Default::default();
        let mut b  = batch();
        b.lm.targets[[0, 0]] = u32::MAX;
        let t = TensorBatch::<TestBackend>::from_batch(&b, &device);

        let targets: Vec<i64> = t
            .lm_targets
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(targets[0], i64::from(u32::MAX));
    }
}
