// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `validate`, `inspect` and
// `init-config`, and all their flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, enum, path)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::inspect_use_case::InspectConfig;
use crate::application::session::FeedSettings;
use crate::domain::corpus::Mode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a split, check alignment and report the epoch geometry
    Validate(FeedArgs),

    /// Pull batches from a split and summarise their masks
    Inspect(InspectArgs),

    /// Write a default feed config JSON
    InitConfig(InitConfigArgs),
}

/// Which corpus split to read
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModeArg {
    Train,
    Dev,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Train => Mode::Train,
            ModeArg::Dev   => Mode::Dev,
        }
    }
}

/// Arguments shared by every command that opens a split.
#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Directory with the id files, vocabularies and head mask
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Feed config JSON
    #[arg(long, default_value = "data/feed_config.json")]
    pub config: PathBuf,

    /// Corpus split
    #[arg(long, value_enum, default_value_t = ModeArg::Train)]
    pub mode: ModeArg,

    /// Override the configured number of batch lanes
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Override the configured window width
    #[arg(long)]
    pub num_steps: Option<usize>,
}

/// Convert CLI FeedArgs into the application-layer FeedSettings.
/// The application layer never sees clap types.
impl From<FeedArgs> for FeedSettings {
    fn from(a: FeedArgs) -> Self {
        FeedSettings {
            data_dir:    a.data_dir,
            config_path: a.config,
            mode:        a.mode.into(),
            batch_size:  a.batch_size,
            num_steps:   a.num_steps,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Number of batches to pull (wraps into later epochs)
    #[arg(long, default_value_t = 10)]
    pub batches: usize,

    /// Append per-batch mask statistics to this CSV
    #[arg(long)]
    pub stats_csv: Option<PathBuf>,

    /// Also convert each batch into CPU tensors
    #[arg(long)]
    pub tensors: bool,
}

impl From<InspectArgs> for InspectConfig {
    fn from(a: InspectArgs) -> Self {
        InspectConfig {
            settings:  a.feed.into(),
            batches:   a.batches,
            stats_csv: a.stats_csv,
            tensors:   a.tensors,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the config
    #[arg(long, default_value = "data/feed_config.json")]
    pub out: PathBuf,

    #[arg(long, default_value_t = 20)]
    pub num_steps: usize,

    #[arg(long, default_value_t = 30)]
    pub max_word_length: usize,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Output word id of the emoji tag flag
    #[arg(long)]
    pub out_emoji_tag_id: u32,

    /// Smallest output word id that is an emoji
    #[arg(long)]
    pub out_emoji_min_id: u32,

    /// Smallest emoji id that is an emoji combination
    #[arg(long)]
    pub emoji_out_combination_min_id: u32,
}
