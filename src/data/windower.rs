// ============================================================
// Layer 4 — Batch Windower
// ============================================================
// Turns a flat per-epoch stream into batch lanes and carves
// fixed-width windows out of them for truncated backprop.
//
// Lanes, not interleaving:
//   stream = [0 1 2 3 4 5 6 7 8], batch_size = 2
//   batch_length = 9 / 2 = 4   (id 8 is dropped)
//
//   lane 0: [0 1 2 3]
//   lane 1: [4 5 6 7]
//
// Windows (num_steps = 2):
//   epoch_size = (batch_length - 1) / num_steps = 1
//   inputs  of window i: columns [i*n,     (i+1)*n)
//   targets of window i: columns [i*n + 1, (i+1)*n + 1)
//
// The "- 1" in epoch_size keeps the last target column inside
// the lane, so no window ever reads past batch_length.
//
// Reference: ndarray documentation (slicing, s! macro)
//            Rust Book §8 (Slices)

use ndarray::{s, Array1, Array2, Array3};
use std::ops::Range;

use crate::domain::corpus::LetterEncoding;
use crate::domain::error::{FeedError, FeedResult};

/// Lane and window arithmetic for one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub batch_size:   usize,
    pub num_steps:    usize,
    pub batch_length: usize,
    pub epoch_size:   usize,
}

impl WindowGeometry {
    /// Compute the geometry for a stream of `stream_len` ids.
    ///
    /// A stream too short to fill a single window is a
    /// configuration error rather than an empty epoch.
    pub fn new(stream_len: usize, batch_size: usize, num_steps: usize) -> FeedResult<Self> {
        if batch_size == 0 || num_steps == 0 {
            return Err(FeedError::InvalidConfig(
                "batch_size and num_steps must be at least 1".into(),
            ));
        }
        let batch_length = stream_len / batch_size;
        let epoch_size   = batch_length.saturating_sub(1) / num_steps;

        if epoch_size == 0 {
            return Err(FeedError::ShapeUnderflow {
                words: stream_len,
                batch_size,
                num_steps,
                batch_length,
            });
        }

        Ok(Self { batch_size, num_steps, batch_length, epoch_size })
    }

    /// Number of stream ids that fit into the lanes
    pub fn valid_len(&self) -> usize {
        self.batch_size * self.batch_length
    }

    pub fn input_columns(&self, window: usize) -> Range<usize> {
        window * self.num_steps..(window + 1) * self.num_steps
    }

    /// Input columns shifted right by one (next-step targets)
    pub fn target_columns(&self, window: usize) -> Range<usize> {
        window * self.num_steps + 1..(window + 1) * self.num_steps + 1
    }

    /// Reshape `flat[..valid_len]` into `[batch_size, batch_length]` lanes.
    pub fn lanes<T: Copy>(&self, flat: &[T]) -> FeedResult<Array2<T>> {
        let valid = self.take_valid(flat)?;
        Ok(Array2::from_shape_vec((self.batch_size, self.batch_length), valid.to_vec())?)
    }

    /// Letter encodings as `[batch_size, batch_length, max_word_length]`
    /// and their lengths as `[batch_size, batch_length]`.
    pub fn letter_lanes(
        &self,
        letters:         &[LetterEncoding],
        max_word_length: usize,
    ) -> FeedResult<(Array3<u32>, Array2<u32>)> {
        let valid = self.take_valid(letters)?;

        let mut ids     = Vec::with_capacity(valid.len() * max_word_length);
        let mut lengths = Vec::with_capacity(valid.len());
        for enc in valid {
            ids.extend_from_slice(&enc.ids);
            lengths.push(enc.length as u32);
        }

        let ids = Array3::from_shape_vec(
            (self.batch_size, self.batch_length, max_word_length),
            ids,
        )?;
        let lengths = Array2::from_shape_vec((self.batch_size, self.batch_length), lengths)?;
        Ok((ids, lengths))
    }

    fn take_valid<'a, T>(&self, flat: &'a [T]) -> FeedResult<&'a [T]> {
        flat.get(..self.valid_len()).ok_or(FeedError::ShapeUnderflow {
            words:        flat.len(),
            batch_size:   self.batch_size,
            num_steps:    self.num_steps,
            batch_length: self.batch_length,
        })
    }
}

/// Copy the `columns` of every lane into a `[rows, columns.len()]` matrix.
pub fn window<T: Copy>(lanes: &Array2<T>, columns: Range<usize>) -> Array2<T> {
    lanes.slice(s![.., columns]).to_owned()
}

/// Window the letter lanes and flatten lane × step into rows:
/// `[batch_size * num_steps, max_word_length]`.
pub fn letter_window(letters: &Array3<u32>, columns: Range<usize>) -> FeedResult<Array2<u32>> {
    let (batch_size, _, width) = letters.dim();
    let steps = columns.len();
    let view  = letters.slice(s![.., columns, ..]);
    Ok(Array2::from_shape_vec((batch_size * steps, width), view.iter().copied().collect())?)
}

/// Window a `[batch_size, batch_length]` matrix and flatten it row-major.
pub fn flat_window<T: Copy>(lanes: &Array2<T>, columns: Range<usize>) -> Array1<T> {
    lanes.slice(s![.., columns]).iter().copied().collect()
}
