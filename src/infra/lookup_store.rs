// ============================================================
// Layer 6 — Lookup Store
// ============================================================
// Loads the static lookup tables the vocabulary builder wrote
// next to the corpus:
//
//   vocab_in_letters   one letter per line, id = line index
//   vocab_out          one word per line,   id = line index
//   head_mask          one row of floats per line, row = out word id
//
// The tables are read once, before iteration starts.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::lookup::{HeadMaskTable, IdTable, Vocabularies};
use crate::domain::traits::LookupSource;

pub struct LookupStore {
    dir: PathBuf,
}

impl LookupStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_table(&self, file: &str, name: &'static str) -> Result<IdTable> {
        let path = self.dir.join(file);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read vocabulary '{}'", path.display()))?;

        // Tokens may legitimately contain spaces; only strip line endings
        let tokens: Vec<String> = text
            .lines()
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect();

        let table = IdTable::new(name, tokens);
        if table.is_empty() {
            bail!("Vocabulary '{}' is empty", path.display());
        }
        tracing::debug!("Loaded {} tokens into {}", table.len(), table.name());
        Ok(table)
    }
}

impl LookupSource for LookupStore {
    fn load_vocabularies(&self) -> Result<Vocabularies> {
        Ok(Vocabularies {
            in_letters: self.read_table("vocab_in_letters", "in_letters")?,
            out_words:  self.read_table("vocab_out", "out_words")?,
        })
    }

    fn load_head_mask(&self) -> Result<HeadMaskTable> {
        let path = self.dir.join("head_mask");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read head mask '{}'", path.display()))?;

        let mut rows = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let row = line
                .split_whitespace()
                .map(str::parse::<f32>)
                .collect::<std::result::Result<Vec<f32>, _>>()
                .with_context(|| format!("{}:{}: bad float", path.display(), n + 1))?;
            rows.push(row);
        }

        let table = HeadMaskTable::from_rows(rows)
            .with_context(|| format!("Head mask '{}' is ragged", path.display()))?;
        if table.is_empty() || table.width() == 0 {
            bail!("Head mask '{}' has no rows", path.display());
        }
        tracing::info!("Head mask: {} rows × {} columns", table.len(), table.width());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_loads_tables() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("vocab_in_letters"), "<pad>\n<s>\na\nt\n").unwrap();
        fs::write(tmp.path().join("vocab_out"), "<eos>\nat\n").unwrap();
        fs::write(tmp.path().join("head_mask"), "0 0 1\n1 1 0\n").unwrap();

        let store = LookupStore::new(tmp.path());
        let vocab = store.load_vocabularies().unwrap();
        assert_eq!(vocab.in_letters.len(), 4);
        assert_eq!(vocab.in_letters.token(2).unwrap(), "a");
        assert_eq!(vocab.out_words.token(1).unwrap(), "at");

        let hm = store.load_head_mask().unwrap();
        assert_eq!((hm.len(), hm.width()), (2, 3));
        assert_eq!(hm.row(1).unwrap().to_vec(), vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_ragged_head_mask_is_an_error() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("head_mask"), "0 0 1\n1 1\n").unwrap();
        assert!(LookupStore::new(tmp.path()).load_head_mask().is_err());
    }

    #[test]
    fn test_empty_tables_are_errors() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("vocab_in_letters"), "").unwrap();
        fs::write(tmp.path().join("vocab_out"), "<eos>\n").unwrap();
        fs::write(tmp.path().join("head_mask"), "\n").unwrap();

        let store = LookupStore::new(tmp.path());
        let err = store.load_vocabularies().unwrap_err();
        assert!(err.to_string().contains("is empty"));
        assert!(store.load_head_mask().is_err());
    }
}
