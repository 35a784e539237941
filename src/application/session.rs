// ============================================================
// Layer 2 — Feed Session
// ============================================================
// Wires the loaders and the config together into a ready
// BatchIterator. Shared by every use case:
//
//   Step 1: Load FeedConfig             (Layer 6 - infra)
//   Step 2: Apply command-line overrides
//   Step 3: Load lookup tables          (Layer 6 - infra)
//   Step 4: Load + align the corpora    (Layer 4 - data)
//   Step 5: Build the BatchIterator     (Layer 4 - data)
//
// All I/O happens here, once, before the first batch.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::iterator::BatchIterator;
use crate::data::loader::TextCorpusLoader;
use crate::domain::corpus::{Mode, TaskCorpora};
use crate::domain::feed_config::FeedConfig;
use crate::domain::traits::{LookupSource, SequenceCorpusLoader};
use crate::infra::config_store::ConfigStore;
use crate::infra::lookup_store::LookupStore;

/// Where the data lives and which values to override.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub data_dir:    PathBuf,
    pub config_path: PathBuf,
    pub mode:        Mode,
    pub batch_size:  Option<usize>,
    pub num_steps:   Option<usize>,
}

impl FeedSettings {
    /// The stored config with command-line overrides applied
    pub fn resolve_config(&self) -> Result<FeedConfig> {
        let mut cfg = ConfigStore::new(&self.config_path).load()?;
        if let Some(b) = self.batch_size {
            cfg.batch_size = b;
        }
        if let Some(n) = self.num_steps {
            cfg.num_steps = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

/// A loaded corpus together with the iterator over it.
pub struct FeedSession {
    pub config:    FeedConfig,
    pub sentences: usize,
    pub words:     usize,
    pub iterator:  BatchIterator,
}

impl FeedSession {
    pub fn open(settings: &FeedSettings) -> Result<Self> {
        let config = settings.resolve_config()?;
        tracing::info!(
            "Opening {} split in '{}' (batch_size={}, num_steps={})",
            settings.mode,
            settings.data_dir.display(),
            config.batch_size,
            config.num_steps,
        );

        let lookups   = LookupStore::new(&settings.data_dir);
        let vocab     = lookups.load_vocabularies()?;
        let head_mask = lookups.load_head_mask()?;

        let loader = TextCorpusLoader::new(
            &settings.data_dir,
            config.num_steps,
            config.max_word_length,
        );
        let corpora: TaskCorpora = loader.load_corpora(settings.mode)?;
        let sentences = corpora.sentence_count();
        let words     = corpora.word_count();

        let iterator = BatchIterator::new(corpora, vocab, head_mask, config.clone())
            .with_context(|| format!("Cannot batch the {} split", settings.mode))?;

        Ok(Self { config, sentences, words, iterator })
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::*;
    use std::{fs, path::Path};

    // letters: 0 pad, 1 <s>, 2 a, 3 t, 4 i
    // words:   0 <eos>, 1 at, 2 it, 3 <emoji>, 4 🙂
    //
    // Eight sentences of three words → 24 words; batch_size 2,
    // num_steps 3 → batch_length 12, epoch_size 3.
    pub(crate) fn write_corpus(dir: &Path) -> FeedSettings {
        let put = |name: &str, body: String| fs::write(dir.join(name), body).unwrap();

        put("vocab_in_letters", "\n<s>\na\nt\ni\n".to_string());
        put("vocab_out", "<eos>\nat\nit\n<emoji>\n🙂\n".to_string());
        put("head_mask", "0 0\n1 0\n1 0\n0 1\n0 1\n".to_string());

        put("train_in_ids_lm", "0 1 2#1 2 4\n".repeat(8));
        put("train_in_ids_letters", "1 2 3#1 4 3#1\n".repeat(8));
        put("train_ids_phrase", "0 2 2\n".repeat(8));
        put("train_ids_emoji", "0 0 5\n".repeat(8));

        let cfg = FeedConfig {
            num_steps:                    3,
            max_word_length:              4,
            batch_size:                   2,
            out_emoji_tag_id:             3,
            out_emoji_min_id:             4,
            emoji_out_combination_min_id: 5,
            ..FeedConfig::default()
        };
        let config_path = dir.join("feed_config.json");
        ConfigStore::new(&config_path).save(&cfg).unwrap();

        FeedSettings {
            data_dir: dir.to_path_buf(),
            config_path,
            mode: Mode::Train,
            batch_size: None,
            num_steps: None,
        }
    }
}
