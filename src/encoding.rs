// Padded tokenizer batches for the ONNX models.
//
// Both local models take row-major [batch, seq_len] i64 inputs. Rows are
// right-padded to the longest encoding; padding positions get mask 0.

use anyhow::{Context, Result};
use ort::value::Tensor;
use tokenizers::Encoding;

/// Flattened, right-padded model inputs for one batch of encodings.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedBatch {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub type_ids: Vec<i64>,
    pub rows: usize,
    pub seq_len: usize,
}

impl PaddedBatch {
    pub fn from_encodings(encodings: &[Encoding], pad_id: i64) -> Self {
        let rows = encodings.len();
        let seq_len = encodings.iter().map(|e| e.len()).max().unwrap_or(0);
        let mut batch = Self {
            input_ids: Vec::with_capacity(rows * seq_len),
            attention_mask: Vec::with_capacity(rows * seq_len),
            type_ids: Vec::with_capacity(rows * seq_len),
            rows,
            seq_len,
        };
        for enc in encodings {
            batch.push_row(enc.get_ids(), enc.get_attention_mask(), enc.get_type_ids(), pad_id);
        }
        batch
    }

    fn push_row(&mut self, ids: &[u32], mask: &[u32], types: &[u32], pad_id: i64) {
        let pad = self.seq_len - ids.len();
        self.input_ids.extend(ids.iter().map(|&v| i64::from(v)));
        self.input_ids.extend(std::iter::repeat_n(pad_id, pad));
        self.attention_mask.extend(mask.iter().map(|&v| i64::from(v)));
        self.attention_mask.extend(std::iter::repeat_n(0, pad));
        self.type_ids.extend(types.iter().map(|&v| i64::from(v)));
        self.type_ids.extend(std::iter::repeat_n(0, pad));
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.seq_len == 0
    }

    fn tensor(&self, data: Vec<i64>, name: &str) -> Result<Tensor<i64>> {
        let shape = [self.rows as i64, self.seq_len as i64];
        Tensor::from_array((shape, data)).with_context(|| format!("Failed to create {name} tensor"))
    }

    pub fn ids_tensor(&self) -> Result<Tensor<i64>> {
        self.tensor(self.input_ids.clone(), "input_ids")
    }

    pub fn mask_tensor(&self) -> Result<Tensor<i64>> {
        self.tensor(self.attention_mask.clone(), "attention_mask")
    }

    pub fn type_tensor(&self) -> Result<Tensor<i64>> {
        self.tensor(self.type_ids.clone(), "token_type_ids")
    }
}
