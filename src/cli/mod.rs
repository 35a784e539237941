// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates the work to Layer 2 (application).
//
// Three commands are supported:
//   1. `validate`    — check a split and report epoch geometry
//   2. `inspect`     — pull batches and summarise their masks
//   3. `init-config` — write a feed config JSON
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, FeedArgs, InitConfigArgs, InspectArgs};

use crate::domain::feed_config::FeedConfig;

#[derive(Parser, Debug)]
#[command(
    name = "multitask-batcher",
    version,
    about = "Build windowed, masked multi-task batches from aligned id corpora."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Validate(args)   => run_validate(args),
            Commands::Inspect(args)    => run_inspect(args),
            Commands::InitConfig(args) => run_init_config(args),
        }
    }
}

fn run_validate(args: FeedArgs) -> Result<()> {
    use crate::application::validate_use_case::ValidateUseCase;

    let report = ValidateUseCase::new(args.into()).execute()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let stats = InspectUseCase::new(args.into()).execute()?;
    println!("Inspected {} batches.", stats.len());
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    use crate::infra::config_store::ConfigStore;

    let cfg = FeedConfig {
        num_steps:                    args.num_steps,
        max_word_length:              args.max_word_length,
        batch_size:                   args.batch_size,
        out_emoji_tag_id:             args.out_emoji_tag_id,
        out_emoji_min_id:             args.out_emoji_min_id,
        emoji_out_combination_min_id: args.emoji_out_combination_min_id,
        ..FeedConfig::default()
    };
    cfg.validate()?;

    let store = ConfigStore::new(args.out);
    store.save(&cfg)?;
    println!("Config written to {}", store.path().display());
    Ok(())
}
