#![allow(dead_code)]

use std::collections::HashMap;
use straddlelab::domain::error::StraddleError;
use straddlelab::domain::plan::AuthoritativeParams;
use straddlelab::domain::slice::SliceStatistics;
use straddlelab::domain::trade::{CostConfig, TradeOutcome, TradeResult};
use straddlelab::ports::slice_port::{SliceBatch, SliceDataPort};
use straddlelab::ports::trade_port::TradeDataPort;

pub struct MockSlicePort {
    pub batches: HashMap<String, SliceBatch>,
}

impl MockSlicePort {
    pub fn new() -> Self {
        Self {
            batches: HashMap::new(),
        }
    }

    pub fn with_batch(mut self, batch: SliceBatch) -> Self {
        self.batches.insert(batch.pair.clone(), batch);
        self
    }
}

impl SliceDataPort for MockSlicePort {
    fn fetch_slice_batch(&self, pair: &str) -> Result<SliceBatch, StraddleError> {
        self.batches
            .get(pair)
            .cloned()
            .ok_or_else(|| StraddleError::NoSlices {
                pair: pair.to_string(),
            })
    }
}

pub struct MockTradePort {
    pub trades: Vec<TradeResult>,
}

impl TradeDataPort for MockTradePort {
    fn fetch_trades(&self) -> Result<Vec<TradeResult>, StraddleError> {
        Ok(self.trades.clone())
    }
}

pub fn make_slice(hour: u8, quarter: u8, atr: f64, range: f64, body: f64) -> SliceStatistics {
    SliceStatistics {
        hour,
        quarter,
        candle_count: 100,
        atr_mean: atr,
        range_mean: range,
        body_range_mean: body,
        noise_ratio_mean: 1.4,
        volume_imbalance_mean: 0.35,
        breakout_percentage: 58.0,
        tick_quality_mean: 75.0,
        events: vec![],
    }
}

pub fn make_batch(pair: &str, slices: Vec<SliceStatistics>) -> SliceBatch {
    SliceBatch {
        pair: pair.to_string(),
        period_days: 90,
        slices,
        authoritative: None,
    }
}

pub fn sample_authoritative(confidence: f64) -> AuthoritativeParams {
    AuthoritativeParams {
        offset_pips: 5.0,
        stop_loss_pips: 30.0,
        take_profit_pips: 75.0,
        trailing_stop_pips: 22.0,
        timeout_minutes: 180,
        risk_reward: "1:2.5".to_string(),
        confidence,
    }
}

pub fn make_trade(date: &str, pips: f64, outcome: TradeOutcome) -> TradeResult {
    TradeResult {
        event_date: date.to_string(),
        entry_time: "14:30:00".to_string(),
        exit_time: "15:15:00".to_string(),
        duration_minutes: 45.0,
        pips_net: pips,
        outcome,
        max_favorable_excursion: pips.max(0.0) + 5.0,
        max_adverse_excursion: 10.0,
        logs: Vec::new(),
    }
}

pub fn sample_costs() -> CostConfig {
    CostConfig {
        spread_pips: 2.5,
        slippage_pips: 1.0,
        stop_loss_pips: 30.0,
        tp_rr: 2.5,
    }
}
