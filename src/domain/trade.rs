//! Backtest trade records and cost configuration.
//!
//! `TradeResult` mirrors the simulation service's payload: field names,
//! outcome spellings and the "BE Long"/"BE Short"/"TS Long"/"TS Short" log
//! markers are contract, not style, and must not be renamed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed outcome vocabulary from the simulation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    NoEntry,
    TakeProfit,
    StopLoss,
    Timeout,
    TrailingStop,
    BreakEven,
}

impl TradeOutcome {
    /// Outcome spelling as the upstream service writes it.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeOutcome::NoEntry => "NoEntry",
            TradeOutcome::TakeProfit => "TakeProfit",
            TradeOutcome::StopLoss => "StopLoss",
            TradeOutcome::Timeout => "Timeout",
            TradeOutcome::TrailingStop => "TrailingStop",
            TradeOutcome::BreakEven => "BreakEven",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NoEntry" => Some(TradeOutcome::NoEntry),
            "TakeProfit" => Some(TradeOutcome::TakeProfit),
            "StopLoss" => Some(TradeOutcome::StopLoss),
            "Timeout" => Some(TradeOutcome::Timeout),
            "TrailingStop" => Some(TradeOutcome::TrailingStop),
            "BreakEven" => Some(TradeOutcome::BreakEven),
            _ => None,
        }
    }
}

/// One executed-or-skipped trade from a backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    /// Calendar date of the triggering event, "YYYY-MM-DD". Kept as text
    /// because unparsable dates are data, not errors: such trades are
    /// excluded from calendar buckets but still count everywhere else.
    pub event_date: String,
    pub entry_time: String,
    pub exit_time: String,
    pub duration_minutes: f64,
    pub pips_net: f64,
    pub outcome: TradeOutcome,
    pub max_favorable_excursion: f64,
    pub max_adverse_excursion: f64,
    /// Free-text simulator log lines, scanned for the BE/TS markers.
    #[serde(default)]
    pub logs: Vec<String>,
}

impl TradeResult {
    pub fn is_executed(&self) -> bool {
        self.outcome != TradeOutcome::NoEntry
    }

    pub fn parsed_event_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.event_date, "%Y-%m-%d").ok()
    }

    pub fn logs_contain(&self, marker: &str) -> bool {
        self.logs.iter().any(|l| l.contains(marker))
    }
}

/// Cost assumptions for a backtest report.
#[derive(Debug, Clone, PartialEq)]
pub struct CostConfig {
    pub spread_pips: f64,
    pub slippage_pips: f64,
    pub stop_loss_pips: f64,
    /// Take-profit distance as a multiple of the stop.
    pub tp_rr: f64,
}
