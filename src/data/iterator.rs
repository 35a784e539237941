// ============================================================
// Layer 4 — Batch Iterator
// ============================================================
// An endless, pull-based provider of multi-task batches.
//
// State machine (no terminal state):
//
//      ┌──────────────┐  flatten + window   ┌───────────┐
//      │  EpochStart  │ ──────────────────▶ │ Window(0) │
//      └──────────────┘                     └───────────┘
//              ▲                                  │ emit, i += 1
//              │        i == epoch_size           ▼
//              └────────────────────────────  Window(i)
//
// Every epoch is re-derived from the same immutable corpora,
// in the same sentence order. Nothing is shuffled, so epoch 2
// yields exactly the batches epoch 1 did and consecutive
// windows stay contiguous across the epoch boundary.
//
// `next_batch` takes &mut self: one consumer per iterator.
//
// Reference: Rust Book §13 (Iterators)
//            Rust Book §17 (State pattern)

use ndarray::{Array1, Array2, Array3};

use crate::data::batch::{
    phrase_boundaries, EmojiPayload, LetterPayload, LmPayload, MultiTaskBatch,
    PhraseBoundaryPayload, PhrasePayload,
};
use crate::data::flattener::flatten;
use crate::data::masks::MaskBuilder;
use crate::data::windower::{flat_window, letter_window, window, WindowGeometry};
use crate::domain::corpus::TaskCorpora;
use crate::domain::error::FeedResult;
use crate::domain::feed_config::FeedConfig;
use crate::domain::lookup::{HeadMaskTable, Vocabularies};

/// Per-epoch lane matrices, rebuilt at every EpochStart.
struct EpochLanes {
    geometry:       WindowGeometry,
    lm_in:          Array2<u32>,
    lm_out:         Array2<u32>,
    letters:        Array3<u32>,
    letter_lengths: Array2<u32>,
    phrase:         Array2<u32>,
    phrase_p:       Array2<u32>,
    emoji:          Array2<u32>,
}

impl EpochLanes {
    fn build(corpora: &TaskCorpora, config: &FeedConfig) -> FeedResult<Self> {
        let lm_in  = flatten(&corpora.lm_in);
        let lm_out = flatten(&corpora.lm_out);
        let phrase = flatten(&corpora.phrase);
        let emoji  = flatten(&corpora.emoji);
        let letters = flatten(&corpora.letters);

        let geometry = WindowGeometry::new(lm_in.len(), config.batch_size, config.num_steps)?;
        let (letters, letter_lengths) =
            geometry.letter_lanes(&letters, config.max_word_length)?;
        let phrase = geometry.lanes(&phrase)?;

        Ok(Self {
            geometry,
            lm_in:    geometry.lanes(&lm_in)?,
            lm_out:   geometry.lanes(&lm_out)?,
            letters,
            letter_lengths,
            phrase_p: phrase_boundaries(&phrase),
            phrase,
            emoji:    geometry.lanes(&emoji)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedState {
    EpochStart,
    Window(usize),
}

pub struct BatchIterator {
    corpora:    TaskCorpora,
    vocab:      Vocabularies,
    head_mask:  HeadMaskTable,
    config:     FeedConfig,
    epoch_size: usize,
    lanes:      Option<EpochLanes>,
    state:      FeedState,
    /// Epochs started so far
    epochs:     usize,
}

impl BatchIterator {
    /// Validate everything up front so iteration can only fail on lookups.
    pub fn new(
        corpora:   TaskCorpora,
        vocab:     Vocabularies,
        head_mask: HeadMaskTable,
        config:    FeedConfig,
    ) -> FeedResult<Self> {
        config.validate()?;
        corpora.validate(config.max_word_length)?;
        let geometry =
            WindowGeometry::new(corpora.word_count(), config.batch_size, config.num_steps)?;

        tracing::info!(
            "Batch feeder ready: {} sentences, {} words, batch_length={}, epoch_size={}",
            corpora.sentence_count(),
            corpora.word_count(),
            geometry.batch_length,
            geometry.epoch_size,
        );

        Ok(Self {
            corpora,
            vocab,
            head_mask,
            config,
            epoch_size: geometry.epoch_size,
            lanes:      None,
            state:      FeedState::EpochStart,
            epochs:     0,
        })
    }

    /// Windows per epoch
    pub fn epoch_size(&self) -> usize {
        self.epoch_size
    }

    /// Number of epochs started so far (0 before the first batch)
    pub fn epochs_started(&self) -> usize {
        self.epochs
    }

    /// Produce the next window, rolling over into a new epoch when needed.
    pub fn next_batch(&mut self) -> FeedResult<MultiTaskBatch> {
        let (index, lanes) = match (self.state, self.lanes.take()) {
            (FeedState::Window(i), Some(lanes)) => (i, lanes),
            _ => {
                let lanes = EpochLanes::build(&self.corpora, &self.config)?;
                tracing::debug!(
                    "Epoch {} rebuilt: batch_length={}, epoch_size={}",
                    self.epochs,
                    lanes.geometry.batch_length,
                    lanes.geometry.epoch_size,
                );
                self.epoch_size = lanes.geometry.epoch_size;
                self.epochs    += 1;
                self.state      = FeedState::Window(0);
                (0, lanes)
            }
        };

        let batch = self.build_window(&lanes, index);
        self.lanes = Some(lanes);
        let batch = batch?;

        self.state = if index + 1 == self.epoch_size {
            FeedState::EpochStart
        } else {
            FeedState::Window(index + 1)
        };
        Ok(batch)
    }

    fn build_window(&self, lanes: &EpochLanes, index: usize) -> FeedResult<MultiTaskBatch> {
        let g      = lanes.geometry;
        let x_cols = g.input_columns(index);
        let y_cols = g.target_columns(index);

        let masks = MaskBuilder::new(
            self.config.mask_thresholds(),
            self.config.max_word_length,
            &self.vocab,
            &self.head_mask,
        );

        // ── Language model ────────────────────────────────────────────────────
        let lm_x = window(&lanes.lm_in, x_cols);
        let lm_y = window(&lanes.lm_out, y_cols.clone());
        let lm_y_flat: Vec<u32> = lm_y.iter().copied().collect();

        // ── Letters ───────────────────────────────────────────────────────────
        let letter_x       = letter_window(&lanes.letters, y_cols.clone())?;
        let letter_lengths = flat_window(&lanes.letter_lengths, y_cols.clone());
        let width          = self.config.max_word_length;
        let letter_y = Array2::from_shape_fn((lm_y_flat.len(), width), |(r, _)| lm_y_flat[r]);
        let letter_mask = masks.letter_mask(&letter_x, &letter_lengths, &lm_y_flat)?;

        // ── Phrase and emoji ──────────────────────────────────────────────────
        let phrase_p_y = window(&lanes.phrase_p, y_cols.clone());
        let phrase_y   = window(&lanes.phrase, y_cols.clone());
        let emoji_y    = window(&lanes.emoji, y_cols);

        Ok(MultiTaskBatch {
            epoch:      self.epochs.saturating_sub(1),
            window:     index,
            epoch_size: g.epoch_size,
            lm: LmPayload {
                mask:             masks.lm_mask(&lm_y),
                sequence_lengths: Array1::from_elem(g.batch_size, g.num_steps as u32),
                inputs:           lm_x,
                targets:          lm_y,
            },
            letter: LetterPayload {
                inputs:  letter_x,
                targets: letter_y,
                mask:    letter_mask,
                lengths: letter_lengths,
            },
            phrase_p: PhraseBoundaryPayload {
                mask:    masks.phrase_p_mask(&phrase_y),
                targets: phrase_p_y,
            },
            phrase: PhrasePayload {
                mask:        masks.phrase_mask(&phrase_y),
                logits_mask: masks.phrase_logits_mask(&lm_y_flat)?,
                targets:     phrase_y,
            },
            emoji: EmojiPayload {
                mask:    masks.emoji_mask(&emoji_y),
                targets: emoji_y,
            },
        })
    }
}

/// Never returns `None`; bound it with `take` for a fixed number of steps.
impl Iterator for BatchIterator {
    type Item = FeedResult<MultiTaskBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_batch())
    }
}
