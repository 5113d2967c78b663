//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_trade_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_slice_adapter::JsonSliceAdapter;
use crate::domain::advisory::{advise, Advisory};
use crate::domain::config_validation::{validate_analysis_config, validate_costs_config};
use crate::domain::error::StraddleError;
use crate::domain::events::{pair_rating, rank_events, EventStats};
use crate::domain::patterns::{detect_golden_combos, detect_traps, DetectedTrap, GoldenCombo};
use crate::domain::plan::{synthesize, TradingPlan};
use crate::domain::scoring::{rank_slices, top_n};
use crate::domain::stats::{compute_report, BacktestReport};
use crate::domain::trade::CostConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::slice_port::SliceDataPort;
use crate::ports::trade_port::TradeDataPort;

#[derive(Parser, Debug)]
#[command(name = "straddlelab", about = "News-straddle viability analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score slices and synthesize trading plans for the best windows
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        pair: Option<String>,
        #[arg(long)]
        top: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute backtest statistics and verdicts from a trade list
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rank economic events by tradability
    Events {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            pair,
            top,
            output,
        } => run_analyze(&config, pair.as_deref(), top, output.as_ref()),
        Command::Report {
            config,
            trades,
            output,
        } => run_report(&config, &trades, output.as_ref()),
        Command::Events { input } => run_events(&input),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_cost_config(adapter: &dyn ConfigPort) -> CostConfig {
    CostConfig {
        spread_pips: adapter.get_f64("costs", "spread_pips", 2.5),
        slippage_pips: adapter.get_f64("costs", "slippage_pips", 1.0),
        stop_loss_pips: adapter.get_f64("costs", "stop_loss_pips", 30.0),
        tp_rr: adapter.get_f64("costs", "tp_rr", 2.5),
    }
}

#[derive(Debug, Serialize)]
pub struct PlanEntry {
    pub rank: usize,
    pub window: String,
    pub straddle_score: f64,
    pub combos: Vec<GoldenCombo>,
    pub traps: Vec<DetectedTrap>,
    pub plan: TradingPlan,
}

#[derive(Debug, Serialize)]
pub struct AnalysisOutput {
    pub pair: String,
    pub period_days: u32,
    pub plans: Vec<PlanEntry>,
}

fn run_analyze(
    config_path: &PathBuf,
    pair_override: Option<&str>,
    top_override: Option<usize>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    // --pair supersedes the config; only require the config key without it
    if pair_override.is_none() {
        if let Err(e) = validate_analysis_config(&adapter) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let pair = match pair_override {
        Some(p) => p.to_uppercase(),
        None => match adapter.get_str("analysis", "pair") {
            Some(p) => p.to_uppercase(),
            None => {
                eprintln!("error: pair is required");
                return ExitCode::from(2);
            }
        },
    };
    let top = top_override.unwrap_or(adapter.get_i64("analysis", "top_n", 5) as usize);
    if top == 0 {
        eprintln!("error: top must be at least 1");
        return ExitCode::from(2);
    }
    let data_dir = PathBuf::from(
        adapter
            .get_str("analysis", "data_dir")
            .unwrap_or_else(|| "data".to_string()),
    );

    // Stage 2: fetch the slice batch
    eprintln!("Loading slices for {} from {}", pair, data_dir.display());
    let port = JsonSliceAdapter::new(data_dir);
    let batch = match port.fetch_slice_batch(&pair) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "  {} slices over {} days{}",
        batch.slices.len(),
        batch.period_days,
        if batch.authoritative.is_some() {
            ", authoritative parameters present"
        } else {
            ""
        }
    );

    // Stage 3: score, rank, detect, synthesize
    let ranked = rank_slices(&batch.slices);
    let mut plans = Vec::new();
    for scored in top_n(&ranked, top) {
        let combos = detect_golden_combos(&scored.stats);
        let traps = detect_traps(&scored.stats);
        let plan = synthesize(
            &scored.stats,
            scored.straddle_score,
            &combos,
            &traps,
            batch.authoritative.clone(),
        );
        plans.push(PlanEntry {
            rank: scored.rank,
            window: scored.stats.window_label(),
            straddle_score: scored.straddle_score,
            combos,
            traps,
            plan,
        });
    }

    // Stage 4: print summary
    eprintln!("\n=== Top Windows ({}) ===", pair);
    for entry in &plans {
        eprintln!(
            "  #{} {}  score {:.0}  {:?}/{:?}  combos: {}  traps: {}",
            entry.rank,
            entry.window,
            entry.straddle_score,
            entry.plan.recommendation,
            entry.plan.risk_level,
            entry.combos.len(),
            entry.traps.len(),
        );
        if entry.plan.divergence.is_some() {
            eprintln!("     divergence between backend and local estimate");
        }
    }

    let output = AnalysisOutput {
        pair: batch.pair,
        period_days: batch.period_days,
        plans,
    };
    write_json_output(&output, output_path)
}

#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub report: BacktestReport,
    pub advisory: Advisory,
}

fn run_report(
    config_path: &PathBuf,
    trades_path: &PathBuf,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_costs_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let costs = build_cost_config(&adapter);

    eprintln!("Loading trades from {}", trades_path.display());
    let port = CsvTradeAdapter::new(trades_path.clone());
    let trades = match port.fetch_trades() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} trades loaded", trades.len());

    let report = compute_report(&trades, &costs);
    let advisory = advise(&report, &costs);

    eprintln!("\n=== Résultats ===");
    eprintln!(
        "Trades:          {} ({} exécutés)",
        report.summary.total_trades, report.summary.executed_trades
    );
    eprintln!("Win Rate:        {}%", report.summary.win_rate_percent);
    eprintln!("Total Pips:      {:.1}", report.summary.total_pips);
    eprintln!("Max Drawdown:    {:.1} pips", report.summary.max_drawdown_pips);
    eprintln!("Profit Factor:   {:.2}", report.summary.profit_factor);
    eprintln!(
        "Coûts:           {} pips/trade, ratio {}%",
        report.costs.cost_per_trade, report.costs.cost_ratio_percent
    );

    eprintln!("\n=== Verdicts ===");
    for verdict in [
        &advisory.overall,
        &advisory.activity,
        &advisory.risk,
        &advisory.exits,
        &advisory.final_recommendation,
    ] {
        eprintln!("{} {} — {}", verdict.icon, verdict.title, verdict.text);
    }

    let output = ReportOutput { report, advisory };
    write_json_output(&output, output_path)
}

fn run_events(input_path: &PathBuf) -> ExitCode {
    eprintln!("Loading event statistics from {}", input_path.display());
    let content = match fs::read_to_string(input_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: failed to read {}: {}", input_path.display(), e);
            return ExitCode::from(1);
        }
    };
    let events: Vec<EventStats> = match serde_json::from_str(&content) {
        Ok(e) => e,
        Err(e) => {
            let err = StraddleError::Data {
                reason: format!("invalid event statistics: {e}"),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let ranked = rank_events(&events);
    eprintln!("\n=== Tradabilité par Événement ===");
    for (i, entry) in ranked.iter().enumerate() {
        println!(
            "{:2}. {:<24} {:5.1}  {}",
            i + 1,
            entry.stats.name,
            entry.tradability,
            pair_rating(entry.stats.avg_confidence).label(),
        );
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_costs_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}

fn write_json_output<T: Serialize>(value: &T, output_path: Option<&PathBuf>) -> ExitCode {
    let Some(path) = output_path else {
        return ExitCode::SUCCESS;
    };
    let json = match serde_json::to_string_pretty(value) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            return ExitCode::from(1);
        }
    };
    match fs::write(path, json) {
        Ok(()) => {
            eprintln!("\nOutput written to: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write {}: {}", path.display(), e);
            ExitCode::from(1)
        }
    }
}
