// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Pulls a bounded number of batches from the endless iterator
// and reports what the masks look like:
//
//   Step 1: Open the feed session          (load everything once)
//   Step 2: Take `batches` windows         (wraps epochs as needed)
//   Step 3: Summarise each batch's masks   (Layer 6 - infra)
//   Step 4: Optionally append to a CSV
//   Step 5: Optionally convert to Burn tensors (Layer 5 - ml)

use anyhow::{Context, Result};
use burn::backend::NdArray;
use std::path::PathBuf;

use crate::application::session::{FeedSession, FeedSettings};
use crate::infra::batch_stats::{BatchStats, BatchStatsLogger};
use crate::ml::tensors::TensorBatch;

type InspectBackend = NdArray;

#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub settings:  FeedSettings,
    /// How many batches to pull
    pub batches:   usize,
    /// Append per-batch statistics to this CSV
    pub stats_csv: Option<PathBuf>,
    /// Also convert every batch into CPU tensors
    pub tensors:   bool,
}

pub struct InspectUseCase {
    config: InspectConfig,
}

impl InspectUseCase {
    pub fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<Vec<BatchStats>> {
        let cfg         = &self.config;
        let mut session = FeedSession::open(&cfg.settings)?;

        let logger = cfg
            .stats_csv
            .as_ref()
            .map(BatchStatsLogger::new)
            .transpose()?;
        let device = Default::default();

        let mut all = Vec::with_capacity(cfg.batches);
        for step in 0..cfg.batches {
            let batch = session
                .iterator
                .next_batch()
                .with_context(|| format!("Batch {step} failed"))?;

            let stats = BatchStats::from_batch(&batch);
            tracing::info!(
                "epoch {} window {}/{}: lm_active={} letter 15/10/5={}/{}/{} \
                 phrase_active={} emoji_active={}",
                stats.epoch,
                stats.window + 1,
                batch.epoch_size,
                stats.lm_active,
                stats.letter_reconstructed,
                stats.letter_emoji,
                stats.letter_mismatch,
                stats.phrase_active,
                stats.emoji_active,
            );

            if let Some(logger) = &logger {
                logger.log(&stats)?;
            }

            if cfg.tensors {
                let t = TensorBatch::<InspectBackend>::from_batch(&batch, &device);
                tracing::debug!(
                    "tensors: lm {:?}, letter {:?}, phrase logits mask {:?}",
                    t.lm_inputs.dims(),
                    t.letter_inputs.dims(),
                    t.phrase_logits_mask.dims(),
                );
            }

            all.push(stats);
        }

        if let Some(logger) = &logger {
            tracing::info!("Batch statistics written to '{}'", logger.csv_path().display());
        }
        Ok(all)
    }
}
