//! CSV trade-list adapter.
//!
//! Reads backtest trade exports: one row per trade, log lines
//! pipe-separated in the last column. A malformed row is skipped, never
//! fatal: one bad record must not cost the whole report. Unparsable event
//! dates are kept verbatim; the statistics engine excludes them from
//! calendar buckets itself.

use std::fs;
use std::path::PathBuf;

use crate::domain::error::StraddleError;
use crate::domain::trade::{TradeOutcome, TradeResult};
use crate::ports::trade_port::TradeDataPort;

pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse_row(record: &csv::StringRecord) -> Option<TradeResult> {
        let field = |i: usize| record.get(i);

        let outcome = TradeOutcome::parse(field(5)?)?;
        let logs = match field(8) {
            Some("") | None => Vec::new(),
            Some(raw) => raw.split('|').map(str::to_string).collect(),
        };

        Some(TradeResult {
            event_date: field(0)?.to_string(),
            entry_time: field(1)?.to_string(),
            exit_time: field(2)?.to_string(),
            duration_minutes: field(3)?.parse().ok()?,
            pips_net: field(4)?.parse().ok()?,
            outcome,
            max_favorable_excursion: field(6)?.parse().ok()?,
            max_adverse_excursion: field(7)?.parse().ok()?,
            logs,
        })
    }
}

impl TradeDataPort for CsvTradeAdapter {
    fn fetch_trades(&self) -> Result<Vec<TradeResult>, StraddleError> {
        let content = fs::read_to_string(&self.path).map_err(|e| StraddleError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut trades = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| StraddleError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            if let Some(trade) = Self::parse_row(&record) {
                trades.push(trade);
            }
        }
        Ok(trades)
    }
}
