// ============================================================
// Layer 6 — Config Store
// ============================================================
// Saves and restores the FeedConfig as pretty-printed JSON.
//
// Why a file next to the corpus?
//   The thresholds (emoji tag id, emoji min id, combination
//   min id) come from the vocabulary build that produced the
//   id files. Keeping them in one JSON file means every
//   command reads the same values.
//
// Example feed_config.json:
//   {
//     "num_steps": 20,
//     "max_word_length": 30,
//     "batch_size": 64,
//     "out_emoji_tag_id": 3,
//     "out_emoji_min_id": 20000,
//     "emoji_out_combination_min_id": 1000,
//     "lm_unused_num": 1,
//     "phrase_unused_num": 2,
//     "emoji_unused_num": 1
//   }
//
// Reference: Rust Book §9 (Error Handling), serde_json docs

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::feed_config::FeedConfig;

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, cfg: &FeedConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;

        tracing::debug!("Saved feed config to '{}'", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<FeedConfig> {
        let json = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Cannot read config from '{}'. \
                 Run 'init-config' to write a default one.",
                self.path.display()
            )
        })?;

        let cfg: FeedConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", self.path.display()))?;
        Ok(cfg)
    }
}
