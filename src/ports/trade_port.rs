//! Backtest trade-list data port.

use crate::domain::error::StraddleError;
use crate::domain::trade::TradeResult;

pub trait TradeDataPort {
    /// Trades in chronological order, as the simulation service emits them.
    fn fetch_trades(&self) -> Result<Vec<TradeResult>, StraddleError>;
}
