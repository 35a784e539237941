// ============================================================
// Layer 3 — Lookup Tables
// ============================================================
// Static tables supplied by the vocabulary builder:
//
//   IdTable        → id → token (input letters, output words)
//   HeadMaskTable  → output word id → fixed-width float row
//
// Both are read-only for the lifetime of the feeder. A lookup
// outside a table's domain is an error, never a fallback,
// because it means the vocabulary and the data disagree.
//
// Reference: Rust Book §8 (Vectors), ndarray documentation

use ndarray::{Array2, ArrayView1};

use crate::domain::error::{FeedError, FeedResult};

/// Dense id → token table where the id is the index.
#[derive(Debug, Clone)]
pub struct IdTable {
    name:   &'static str,
    tokens: Vec<String>,
}

impl IdTable {
    pub fn new(name: &'static str, tokens: Vec<String>) -> Self {
        Self { name, tokens }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token for `id`, or `UnknownId` when the id is out of range
    pub fn token(&self, id: u32) -> FeedResult<&str> {
        self.tokens
            .get(id as usize)
            .map(String::as_str)
            .ok_or(FeedError::UnknownId { table: self.name, id })
    }
}

/// The two token tables the letter mask decodes through.
#[derive(Debug, Clone)]
pub struct Vocabularies {
    /// Input letter id → letter
    pub in_letters: IdTable,
    /// Output word id → word
    pub out_words: IdTable,
}

/// Output word id → mask over phrase logits.
#[derive(Debug, Clone)]
pub struct HeadMaskTable {
    rows: Array2<f32>,
}

impl HeadMaskTable {
    /// Build from one row per output word id. All rows must share a width.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> FeedResult<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(FeedError::HeadMaskWidth { row, width: bad.len(), expected: width });
        }
        let count = rows.len();
        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        Ok(Self { rows: Array2::from_shape_vec((count, width), flat)? })
    }

    pub fn len(&self) -> usize {
        self.rows.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }

    /// Width of every head-mask row
    pub fn width(&self) -> usize {
        self.rows.ncols()
    }

    pub fn row(&self, id: u32) -> FeedResult<ArrayView1<'_, f32>> {
        if (id as usize) < self.rows.nrows() {
            Ok(self.rows.row(id as usize))
        } else {
            Err(FeedError::UnknownId { table: "head_mask", id })
        }
    }

    /// Stack the rows for `ids` into a `[ids.len(), width]` matrix.
    pub fn gather(&self, ids: &[u32]) -> FeedResult<Array2<f32>> {
        let mut out = Array2::<f32>::zeros((ids.len(), self.width()));
        for (mut dst, &id) in out.rows_mut().into_iter().zip(ids) {
            dst.assign(&self.row(id)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_table_lookup() {
        let t = IdTable::new("out_words", vec!["<eos>".into(), "at".into()]);
        assert_eq!(t.token(1).unwrap(), "at");
        assert!(matches!(
            t.token(2),
            Err(FeedError::UnknownId { table: "out_words", id: 2 })
        ));
    }

    #[test]
    fn test_head_mask_gather() {
        let hm = HeadMaskTable::from_rows(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])
        .unwrap();
        assert_eq!(hm.width(), 2);

        let g = hm.gather(&[2, 1, 2]).unwrap();
        assert_eq!(g.dim(), (3, 2));
        assert_eq!(g.row(1).to_vec(), vec![1.0, 0.0]);
        assert_eq!(g.row(2).to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_head_mask_unknown_id() {
        let hm = HeadMaskTable::from_rows(vec![vec![1.0]]).unwrap();
        assert!(matches!(
            hm.gather(&[0, 7]),
            Err(FeedError::UnknownId { table: "head_mask", id: 7 })
        ));
    }

    #[test]
    fn test_ragged_head_mask_rejected() {
        let err = HeadMaskTable::from_rows(vec![vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(
            err,
            Err(FeedError::HeadMaskWidth { row: 1, width: 1, expected: 2 })
        ));
    }
}
