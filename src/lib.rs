// ============================================================
// multitask-batcher — library root
// ============================================================
// Windowed, masked multi-task batches for a word / letter /
// phrase / emoji sequence model. Training code drives
// `data::iterator::BatchIterator` directly; the binary in
// main.rs wraps the same layers in a CLI.
//
// Layers:
//   1. cli          — argument parsing and dispatch
//   2. application  — use cases
//   3. domain       — plain types, traits, errors
//   4. data         — loading, windowing, masks, iterator
//   5. ml           — Burn tensor boundary
//   6. infra        — config, lookup tables, batch statistics
//
// Reference: Rust Book §7 (Packages, Crates and Modules)

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
