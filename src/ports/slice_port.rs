//! Slice-analysis data port.

use serde::{Deserialize, Serialize};

use crate::domain::error::StraddleError;
use crate::domain::plan::AuthoritativeParams;
use crate::domain::slice::SliceStatistics;

/// One analysis payload from the slice-analysis service: every (hour,
/// quarter) window of one pair over one period, plus the backend's trade
/// parameters when it computed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceBatch {
    pub pair: String,
    pub period_days: u32,
    pub slices: Vec<SliceStatistics>,
    #[serde(default)]
    pub authoritative: Option<AuthoritativeParams>,
}

pub trait SliceDataPort {
    fn fetch_slice_batch(&self, pair: &str) -> Result<SliceBatch, StraddleError>;
}
