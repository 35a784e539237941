// ============================================================
// Layer 2 — ValidateUseCase
// ============================================================
// Loads a split, checks the alignment contract and the window
// arithmetic, and reports the resulting epoch geometry without
// producing any batch.

use anyhow::Result;
use serde::Serialize;

use crate::application::session::{FeedSession, FeedSettings};

/// What a successful validation found.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusReport {
    pub mode:         String,
    pub sentences:    usize,
    pub words:        usize,
    pub batch_size:   usize,
    pub num_steps:    usize,
    pub batch_length: usize,
    pub epoch_size:   usize,
}

pub struct ValidateUseCase {
    settings: FeedSettings,
}

impl ValidateUseCase {
    pub fn new(settings: FeedSettings) -> Self {
        Self { settings }
    }

    pub fn execute(&self) -> Result<CorpusReport> {
        let session = FeedSession::open(&self.settings)?;
        let cfg     = &session.config;

        let report = CorpusReport {
            mode:         self.settings.mode.to_string(),
            sentences:    session.sentences,
            words:        session.words,
            batch_size:   cfg.batch_size,
            num_steps:    cfg.num_steps,
            batch_length: session.words / cfg.batch_size,
            epoch_size:   session.iterator.epoch_size(),
        };

        tracing::info!(
            "{} split valid: {} sentences, {} windows per epoch",
            report.mode,
            report.sentences,
            report.epoch_size,
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session::fixture;
    use tempfile::tempdir;

    #[test]
    fn test_report_geometry() {
        let tmp    = tempdir().unwrap();
        let report = ValidateUseCase::new(fixture::write_corpus(tmp.path()))
            .execute()
            .unwrap();

        assert_eq!(report.mode, "train");
        assert_eq!(report.sentences, 8);
        assert_eq!(report.words, 24);
        assert_eq!(report.batch_length, 12);
        assert_eq!(report.epoch_size, 3);
    }

    #[test]
    fn test_underflow_reported_as_error() {
        let tmp = tempdir().unwrap();
        let settings = FeedSettings {
            batch_size: Some(24),
            ..fixture::write_corpus(tmp.path())
        };
        assert!(ValidateUseCase::new(settings).execute().is_err());
    }
}
