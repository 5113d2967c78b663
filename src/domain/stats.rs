//! Backtest statistics engine.
//!
//! Every output is a pure function of the trade list and cost config passed
//! in; nothing is cached between calls, so a report can never drift from
//! its trades. "Executed" means outcome != NoEntry, and all rates and
//! averages below operate on that subset.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::trade::{CostConfig, TradeOutcome, TradeResult};

/// Sentinel profit factor for a bucket with profit but zero loss.
pub const PROFIT_FACTOR_CAP: f64 = 999.0;

/// Ratio as a percentage with one decimal; the literal "0.0" whenever the
/// denominator is not positive, never NaN or infinity.
pub fn pct(numer: f64, denom: f64) -> String {
    if denom <= 0.0 {
        "0.0".to_string()
    } else {
        format!("{:.1}", numer / denom * 100.0)
    }
}

fn fmt1(value: f64) -> String {
    format!("{:.1}", value)
}

fn profit_factor(profit: f64, loss: f64) -> f64 {
    if loss > 0.0 {
        profit / loss
    } else if profit > 0.0 {
        PROFIT_FACTOR_CAP
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestSummary {
    pub total_trades: usize,
    pub executed_trades: usize,
    pub no_entry_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_percent: String,
    pub total_pips: f64,
    pub max_drawdown_pips: f64,
    pub profit_factor: f64,
    pub average_pips_per_trade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcursionStats {
    pub mean_mfe: f64,
    pub mean_mae: f64,
    /// 0 when mean MAE is not positive.
    pub mfe_mae_ratio: f64,
    /// Executed trades whose favorable excursion reached the theoretical TP
    /// distance (stop_loss_pips × tp_rr).
    pub tp_potential_count: usize,
    /// Subset of those that nevertheless did not close TakeProfit.
    pub tp_missed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitDiagnostics {
    pub max_consecutive_losses: usize,
    pub break_even_hits: usize,
    pub trailing_exits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub cost_per_trade: String,
    pub cost_total: String,
    pub cost_ratio_percent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    /// "YYYY-MM".
    pub label: String,
    pub trades: usize,
    pub net_pips: f64,
    pub profit_pips: f64,
    pub loss_pips: f64,
    pub profit_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayBucket {
    /// 0 = Monday.
    pub weekday: u32,
    pub weekday_name: &'static str,
    pub trades: usize,
    pub net_pips: f64,
    pub profit_pips: f64,
    pub loss_pips: f64,
    pub profit_factor: f64,
    pub average_pips_per_trade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarReport {
    pub months: Vec<MonthBucket>,
    pub weekdays: Vec<WeekdayBucket>,
    pub best_month: Option<String>,
    pub worst_month: Option<String>,
    pub best_weekday: Option<&'static str>,
    pub worst_weekday: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub summary: BacktestSummary,
    pub excursions: ExcursionStats,
    pub diagnostics: ExitDiagnostics,
    pub costs: CostReport,
    pub calendar: CalendarReport,
}

/// Compute the full report. Trades are expected in chronological order, as
/// the simulation service emits them.
pub fn compute_report(trades: &[TradeResult], costs: &CostConfig) -> BacktestReport {
    let executed: Vec<&TradeResult> = trades.iter().filter(|t| t.is_executed()).collect();

    BacktestReport {
        summary: compute_summary(trades, &executed),
        excursions: compute_excursions(&executed, costs),
        diagnostics: compute_diagnostics(&executed),
        costs: compute_costs(&executed, costs),
        calendar: compute_calendar(&executed),
    }
}

fn compute_summary(trades: &[TradeResult], executed: &[&TradeResult]) -> BacktestSummary {
    let winners = executed.iter().filter(|t| t.pips_net > 0.0).count();
    let losers = executed.iter().filter(|t| t.pips_net < 0.0).count();

    let total_pips: f64 = executed.iter().map(|t| t.pips_net).sum();
    let gross_profit: f64 = executed
        .iter()
        .filter(|t| t.pips_net > 0.0)
        .map(|t| t.pips_net)
        .sum();
    let gross_loss: f64 = executed
        .iter()
        .filter(|t| t.pips_net < 0.0)
        .map(|t| t.pips_net.abs())
        .sum();

    let average = if executed.is_empty() {
        0.0
    } else {
        total_pips / executed.len() as f64
    };

    BacktestSummary {
        total_trades: trades.len(),
        executed_trades: executed.len(),
        no_entry_trades: trades.len() - executed.len(),
        winning_trades: winners,
        losing_trades: losers,
        win_rate_percent: pct(winners as f64, executed.len() as f64),
        total_pips,
        max_drawdown_pips: max_drawdown(executed),
        profit_factor: profit_factor(gross_profit, gross_loss),
        average_pips_per_trade: average,
    }
}

/// Largest peak-to-trough fall of the running cumulative pips curve.
fn max_drawdown(executed: &[&TradeResult]) -> f64 {
    let mut cumulative = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;

    for trade in executed {
        cumulative += trade.pips_net;
        if cumulative > peak {
            peak = cumulative;
        }
        let dd = peak - cumulative;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

fn compute_excursions(executed: &[&TradeResult], costs: &CostConfig) -> ExcursionStats {
    let n = executed.len() as f64;
    let (mean_mfe, mean_mae) = if executed.is_empty() {
        (0.0, 0.0)
    } else {
        (
            executed.iter().map(|t| t.max_favorable_excursion).sum::<f64>() / n,
            executed.iter().map(|t| t.max_adverse_excursion).sum::<f64>() / n,
        )
    };

    let tp_distance = costs.stop_loss_pips * costs.tp_rr;
    let reached: Vec<&&TradeResult> = executed
        .iter()
        .filter(|t| t.max_favorable_excursion >= tp_distance)
        .collect();
    let missed = reached
        .iter()
        .filter(|t| t.outcome != TradeOutcome::TakeProfit)
        .count();

    ExcursionStats {
        mean_mfe,
        mean_mae,
        mfe_mae_ratio: if mean_mae <= 0.0 { 0.0 } else { mean_mfe / mean_mae },
        tp_potential_count: reached.len(),
        tp_missed_count: missed,
    }
}

fn compute_diagnostics(executed: &[&TradeResult]) -> ExitDiagnostics {
    // single forward scan; a trailing unterminated streak still counts
    let mut streak = 0usize;
    let mut max_streak = 0usize;
    for trade in executed {
        if trade.pips_net < 0.0 {
            streak += 1;
            if streak > max_streak {
                max_streak = streak;
            }
        } else {
            streak = 0;
        }
    }

    let count_markers = |a: &str, b: &str| {
        executed
            .iter()
            .filter(|t| t.logs_contain(a) || t.logs_contain(b))
            .count()
    };

    ExitDiagnostics {
        max_consecutive_losses: max_streak,
        break_even_hits: count_markers("BE Long", "BE Short"),
        trailing_exits: count_markers("TS Long", "TS Short"),
    }
}

fn compute_costs(executed: &[&TradeResult], costs: &CostConfig) -> CostReport {
    let per_trade = 2.0 * costs.spread_pips + 2.0 * costs.slippage_pips;
    let total = per_trade * executed.len() as f64;
    let total_pips: f64 = executed.iter().map(|t| t.pips_net).sum();

    let ratio = if total_pips == 0.0 {
        "0.0".to_string()
    } else {
        fmt1(total / total_pips.abs() * 100.0)
    };

    CostReport {
        cost_per_trade: fmt1(per_trade),
        cost_total: fmt1(total),
        cost_ratio_percent: ratio,
    }
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

#[derive(Default, Clone, Copy)]
struct Acc {
    trades: usize,
    net: f64,
    profit: f64,
    loss: f64,
}

impl Acc {
    fn add(&mut self, pips: f64) {
        self.trades += 1;
        self.net += pips;
        if pips > 0.0 {
            self.profit += pips;
        } else if pips < 0.0 {
            self.loss += pips.abs();
        }
    }
}

fn compute_calendar(executed: &[&TradeResult]) -> CalendarReport {
    let mut by_month: BTreeMap<(i32, u32), Acc> = BTreeMap::new();
    let mut by_weekday = [Acc::default(); 7];

    for trade in executed {
        // unparsable event dates are data, not errors: skip silently
        let Some(date) = trade.parsed_event_date() else {
            continue;
        };
        use chrono::Datelike;
        by_month
            .entry((date.year(), date.month()))
            .or_default()
            .add(trade.pips_net);
        by_weekday[date.weekday().num_days_from_monday() as usize].add(trade.pips_net);
    }

    let months: Vec<MonthBucket> = by_month
        .iter()
        .map(|(&(year, month), acc)| MonthBucket {
            label: format!("{:04}-{:02}", year, month),
            trades: acc.trades,
            net_pips: acc.net,
            profit_pips: acc.profit,
            loss_pips: acc.loss,
            profit_factor: profit_factor(acc.profit, acc.loss),
        })
        .collect();

    let weekdays: Vec<WeekdayBucket> = by_weekday
        .iter()
        .enumerate()
        .filter(|(_, acc)| acc.trades > 0)
        .map(|(i, acc)| WeekdayBucket {
            weekday: i as u32,
            weekday_name: WEEKDAY_NAMES[i],
            trades: acc.trades,
            net_pips: acc.net,
            profit_pips: acc.profit,
            loss_pips: acc.loss,
            profit_factor: profit_factor(acc.profit, acc.loss),
            average_pips_per_trade: acc.net / acc.trades as f64,
        })
        .collect();

    let best_month = extreme_by(&months, |a, b| a.net_pips > b.net_pips).map(|m| m.label.clone());
    let worst_month = extreme_by(&months, |a, b| a.net_pips < b.net_pips).map(|m| m.label.clone());
    let best_weekday = extreme_by(&weekdays, |a, b| {
        a.average_pips_per_trade > b.average_pips_per_trade
    })
    .map(|w| w.weekday_name);
    let worst_weekday = extreme_by(&weekdays, |a, b| {
        a.average_pips_per_trade < b.average_pips_per_trade
    })
    .map(|w| w.weekday_name);

    CalendarReport {
        months,
        weekdays,
        best_month,
        worst_month,
        best_weekday,
        worst_weekday,
    }
}

fn extreme_by<T>(items: &[T], better: impl Fn(&T, &T) -> bool) -> Option<&T> {
    let mut iter = items.iter();
    let mut best = iter.next()?;
    for item in iter {
        if better(item, best) {
            best = item;
        }
    }
    Some(best)
}
