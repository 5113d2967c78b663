//! JSON slice-batch adapter.
//!
//! Reads analysis payloads the backend service dumped to disk, one JSON
//! file per pair, named `slices_<pair>.json` under a base directory.

use std::fs;
use std::path::PathBuf;

use crate::domain::error::StraddleError;
use crate::ports::slice_port::{SliceBatch, SliceDataPort};

pub struct JsonSliceAdapter {
    base_path: PathBuf,
}

impl JsonSliceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn batch_path(&self, pair: &str) -> PathBuf {
        self.base_path
            .join(format!("slices_{}.json", pair.to_lowercase()))
    }
}

impl SliceDataPort for JsonSliceAdapter {
    fn fetch_slice_batch(&self, pair: &str) -> Result<SliceBatch, StraddleError> {
        let path = self.batch_path(pair);
        let content = fs::read_to_string(&path).map_err(|e| StraddleError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let batch: SliceBatch =
            serde_json::from_str(&content).map_err(|e| StraddleError::Data {
                reason: format!("invalid slice batch {}: {}", path.display(), e),
            })?;

        if batch.slices.is_empty() {
            return Err(StraddleError::NoSlices {
                pair: pair.to_string(),
            });
        }
        Ok(batch)
    }
}
