// ============================================================
// Layer 4 — Text Corpus Loader
// ============================================================
// Reads the four sentence-aligned id files of one split.
//
// Files inside the data directory (<mode> = train | dev):
//
//   <mode>_in_ids_lm        in ids#out ids          e.g. 0 1 2 3#0 1 2 3
//   <mode>_in_ids_letters   letter ids, words by #  e.g. 1 2 3#1 3 2 4
//   <mode>_ids_phrase       phrase ids              e.g. 0 5 5 0
//   <mode>_ids_emoji        emoji ids               e.g. 0 0 0 12
//
// One sentence per line. Every word-level sequence is cut to
// num_steps; every word's letters are cut to max_word_length
// and zero-padded, giving one encoding per lm_out word in
// every sentence.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::data::flattener::parse_ids;
use crate::domain::corpus::{LetterEncoding, Mode, TaskCorpora};
use crate::domain::traits::SequenceCorpusLoader;

/// Loads one split of the corpus from plain-text id files.
/// Implements the SequenceCorpusLoader trait from Layer 3.
pub struct TextCorpusLoader {
    dir:             PathBuf,
    num_steps:       usize,
    max_word_length: usize,
}

impl TextCorpusLoader {
    pub fn new(dir: impl Into<PathBuf>, num_steps: usize, max_word_length: usize) -> Self {
        Self { dir: dir.into(), num_steps, max_word_length }
    }

    fn path(&self, mode: Mode, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}_{}", mode.file_prefix(), suffix))
    }
}

impl SequenceCorpusLoader for TextCorpusLoader {
    fn load_corpora(&self, mode: Mode) -> Result<TaskCorpora> {
        let (lm_in, lm_out) = read_lm_data(&self.path(mode, "in_ids_lm"), self.num_steps)?;
        let letters = read_letter_data(
            &self.path(mode, "in_ids_letters"),
            self.num_steps,
            self.max_word_length,
        )?;
        let phrase = read_id_lines(&self.path(mode, "ids_phrase"), self.num_steps)?;
        let emoji  = read_id_lines(&self.path(mode, "ids_emoji"), self.num_steps)?;

        let corpora = TaskCorpora { lm_in, lm_out, letters, phrase, emoji };
        corpora
            .validate(self.max_word_length)
            .with_context(|| format!("{} corpus in '{}' is not aligned", mode, self.dir.display()))?;

        tracing::info!("{} data size: {}", mode, corpora.sentence_count());
        Ok(corpora)
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    Ok(text.lines().map(|l| l.trim().to_string()).collect())
}

/// Parse the first `limit` whitespace-separated ids of `field`.
fn parse_field(field: &str, limit: usize, path: &Path, line: usize) -> Result<Vec<u32>> {
    let tokens: Vec<&str> = field.split_whitespace().take(limit).collect();
    parse_ids(&tokens).with_context(|| format!("{}:{}", path.display(), line + 1))
}

/// `in ids#out ids` per line → (lm_in, lm_out)
fn read_lm_data(path: &Path, num_steps: usize) -> Result<(Vec<Vec<u32>>, Vec<Vec<u32>>)> {
    let mut lm_in  = Vec::new();
    let mut lm_out = Vec::new();

    for (n, line) in read_lines(path)?.iter().enumerate() {
        let (input, output) = line.split_once('#').with_context(|| {
            format!("{}:{}: expected 'in ids#out ids'", path.display(), n + 1)
        })?;
        lm_in.push(parse_field(input, num_steps, path, n)?);
        lm_out.push(parse_field(output, num_steps, path, n)?);
    }

    tracing::debug!("Read {} lm sentences from '{}'", lm_in.len(), path.display());
    Ok((lm_in, lm_out))
}

/// One sentence of whitespace-separated ids per line.
fn read_id_lines(path: &Path, num_steps: usize) -> Result<Vec<Vec<u32>>> {
    read_lines(path)?
        .iter()
        .enumerate()
        .map(|(n, line)| parse_field(line, num_steps, path, n))
        .collect()
}

/// Words separated by `#`, letters by whitespace; one sentence per line.
fn read_letter_data(
    path:            &Path,
    num_steps:       usize,
    max_word_length: usize,
) -> Result<Vec<Vec<LetterEncoding>>> {
    let mut letters = Vec::new();

    for (n, line) in read_lines(path)?.iter().enumerate() {
        let mut sentence = Vec::new();
        // An empty line is a sentence with no words
        if !line.is_empty() {
            for word in line.split('#').take(num_steps) {
                let ids = parse_field(word, max_word_length, path, n)?;
                sentence.push(LetterEncoding::padded(&ids, max_word_length));
            }
        }
        letters.push(sentence);
    }

    tracing::debug!("Read {} letter sentences from '{}'", letters.len(), path.display());
    Ok(letters)
}
