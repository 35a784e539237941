// ============================================================
// Layer 3 — Feed Configuration
// ============================================================
// The values the batch feeder consumes. They are opaque to the
// core: nothing here decides how ids are assigned, the config
// only names the thresholds the vocabulary builder chose.
//
// Serialisable so the same config can be saved next to the
// corpus and reloaded by every command.
//
// Reference: Rust Book §5 (Structs), serde documentation

use serde::{Deserialize, Serialize};

use crate::domain::error::{FeedError, FeedResult};

fn default_lm_unused_num() -> u32 { 1 }
fn default_phrase_unused_num() -> u32 { 2 }
fn default_emoji_unused_num() -> u32 { 1 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Width of one truncated-backprop window (and sentence truncation length)
    pub num_steps: usize,

    /// Fixed width of every letter encoding
    pub max_word_length: usize,

    /// Number of independent batch lanes
    pub batch_size: usize,

    /// Output word id of the emoji tag flag
    pub out_emoji_tag_id: u32,

    /// Smallest output word id that is an emoji
    pub out_emoji_min_id: u32,

    /// Smallest emoji id that is an emoji combination
    pub emoji_out_combination_min_id: u32,

    /// Word targets below this id carry no loss (pad / eos)
    #[serde(default = "default_lm_unused_num")]
    pub lm_unused_num: u32,

    /// Phrase targets below this id carry no phrase-id loss
    #[serde(default = "default_phrase_unused_num")]
    pub phrase_unused_num: u32,

    /// Emoji targets below this id carry no loss
    #[serde(default = "default_emoji_unused_num")]
    pub emoji_unused_num: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            num_steps:                    20,
            max_word_length:              30,
            batch_size:                   64,
            out_emoji_tag_id:             3,
            out_emoji_min_id:             20_000,
            emoji_out_combination_min_id: 1_000,
            lm_unused_num:                default_lm_unused_num(),
            phrase_unused_num:            default_phrase_unused_num(),
            emoji_unused_num:             default_emoji_unused_num(),
        }
    }
}

impl FeedConfig {
    /// Reject configurations that can never produce a batch.
    pub fn validate(&self) -> FeedResult<()> {
        if self.batch_size == 0 {
            return Err(FeedError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.num_steps == 0 {
            return Err(FeedError::InvalidConfig("num_steps must be at least 1".into()));
        }
        if self.max_word_length == 0 {
            return Err(FeedError::InvalidConfig(
                "max_word_length must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The subset of values the mask builder needs
    pub fn mask_thresholds(&self) -> MaskThresholds {
        MaskThresholds {
            lm_unused_num:                self.lm_unused_num,
            phrase_unused_num:            self.phrase_unused_num,
            emoji_unused_num:             self.emoji_unused_num,
            out_emoji_tag_id:             self.out_emoji_tag_id,
            out_emoji_min_id:             self.out_emoji_min_id,
            emoji_out_combination_min_id: self.emoji_out_combination_min_id,
        }
    }
}

/// Id thresholds driving every loss mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskThresholds {
    pub lm_unused_num:                u32,
    pub phrase_unused_num:            u32,
    pub emoji_unused_num:             u32,
    pub out_emoji_tag_id:             u32,
    pub out_emoji_min_id:             u32,
    pub emoji_out_combination_min_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FeedConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let cfg = FeedConfig { batch_size: 0, ..FeedConfig::default() };
        assert!(matches!(cfg.validate(), Err(FeedError::InvalidConfig(_))));
    }

    #[test]
    fn test_unused_numbers_default_when_missing_from_json() {
        let json = r#"{
            "num_steps": 4,
            "max_word_length": 6,
            "batch_size": 2,
            "out_emoji_tag_id": 3,
            "out_emoji_min_id": 50,
            "emoji_out_combination_min_id": 10
        }"#;
        let cfg: FeedConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.lm_unused_num, 1);
        assert_eq!(cfg.phrase_unused_num, 2);
        assert_eq!(cfg.emoji_unused_num, 1);
    }
}
