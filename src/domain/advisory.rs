//! Verdict mapping from backtest metrics to advisory text.
//!
//! Five independent axes, each a total function of the report: whatever the
//! numbers, every axis resolves to exactly one message. Texts are fixed so
//! reports stay reproducible.

use serde::Serialize;

use crate::domain::stats::BacktestReport;
use crate::domain::trade::CostConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub icon: &'static str,
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub overall: Verdict,
    pub activity: Verdict,
    pub risk: Verdict,
    pub exits: Verdict,
    pub final_recommendation: Verdict,
}

/// Map a full report to its five verdicts.
pub fn advise(report: &BacktestReport, costs: &CostConfig) -> Advisory {
    Advisory {
        overall: overall_verdict(report),
        activity: activity_verdict(report),
        risk: risk_verdict(report),
        exits: exit_verdict(report, costs),
        final_recommendation: final_verdict(report, costs),
    }
}

fn no_entry_rate(report: &BacktestReport) -> f64 {
    let total = report.summary.total_trades;
    if total == 0 {
        0.0
    } else {
        report.summary.no_entry_trades as f64 / total as f64 * 100.0
    }
}

fn overall_verdict(report: &BacktestReport) -> Verdict {
    let pf = report.summary.profit_factor;
    if pf < 1.0 {
        Verdict {
            icon: "📉",
            title: "Non Rentable",
            text: "La stratégie perd sur la période: chaque pip gagné en coûte davantage.",
        }
    } else if pf < 1.5 {
        Verdict {
            icon: "⚖️",
            title: "Rentabilité Fragile",
            text: "Profit factor entre 1.0 et 1.5: rentable mais sans marge de sécurité.",
        }
    } else {
        Verdict {
            icon: "📈",
            title: "Rentable",
            text: "Profit factor au-dessus de 1.5: l'avantage statistique est net.",
        }
    }
}

fn activity_verdict(report: &BacktestReport) -> Verdict {
    let rate = no_entry_rate(report);
    if rate > 60.0 {
        Verdict {
            icon: "🚫",
            title: "Trop de Non-Entrées",
            text: "Plus de 60% des événements ne déclenchent pas: vérifier la fenêtre de données et l'offset.",
        }
    } else if rate < 10.0 {
        Verdict {
            icon: "⚡",
            title: "Déclenchement Systématique",
            text: "Le straddle se déclenche presque toujours: le filtre d'entrée ne filtre rien.",
        }
    } else {
        Verdict {
            icon: "✅",
            title: "Activité Stable",
            text: "Taux de déclenchement dans la plage attendue.",
        }
    }
}

fn risk_verdict(report: &BacktestReport) -> Verdict {
    let total_gain = report.summary.total_pips;
    let drawdown = report.summary.max_drawdown_pips;

    if total_gain > 0.0 && drawdown > 0.5 * total_gain {
        Verdict {
            icon: "⚠️",
            title: "Calmar Faible",
            text: "Le drawdown dépasse la moitié du gain total: le chemin est trop accidenté pour le résultat.",
        }
    } else if report.diagnostics.max_consecutive_losses > 4 {
        Verdict {
            icon: "🔻",
            title: "Série Perdante Longue",
            text: "Plus de 4 pertes consécutives: prévoir la taille de position en conséquence.",
        }
    } else {
        Verdict {
            icon: "🛡️",
            title: "Risque Acceptable",
            text: "Drawdown et séries perdantes dans les limites raisonnables.",
        }
    }
}

fn exit_verdict(report: &BacktestReport, costs: &CostConfig) -> Verdict {
    let mfe = report.excursions.mean_mfe;
    let mae = report.excursions.mean_mae;
    let avg = report.summary.average_pips_per_trade;

    if mfe > 2.0 * avg {
        Verdict {
            icon: "🎯",
            title: "TP Trop Proche",
            text: "L'excursion favorable moyenne dépasse largement le gain moyen: étendre le take-profit.",
        }
    } else if mae < 0.5 * costs.stop_loss_pips && report.summary.losing_trades > 0 {
        Verdict {
            icon: "↩️",
            title: "Direction Invalidée Tôt",
            text: "Les pertes se dessinent bien avant le stop: une sortie anticipée économiserait des pips.",
        }
    } else {
        Verdict {
            icon: "✅",
            title: "Sorties Cohérentes",
            text: "Les niveaux de sortie correspondent aux excursions observées.",
        }
    }
}

fn final_verdict(report: &BacktestReport, costs: &CostConfig) -> Verdict {
    // fixed priority order
    if report.summary.profit_factor < 1.0 {
        Verdict {
            icon: "🔧",
            title: "Resserrer la Stratégie",
            text: "Réduire le stop-loss ou filtrer les événements les moins tradables avant toute autre optimisation.",
        }
    } else if no_entry_rate(report) > 50.0 {
        Verdict {
            icon: "🔍",
            title: "Vérifier les Données",
            text: "Trop de non-entrées pour conclure: contrôler la qualité et la couverture des données.",
        }
    } else if report.excursions.mean_mfe > 50.0 && costs.tp_rr < 5.0 {
        Verdict {
            icon: "📏",
            title: "Augmenter le TP",
            text: "Le marché va plus loin que l'objectif: relever le ratio take-profit.",
        }
    } else {
        Verdict {
            icon: "👍",
            title: "Paramètres Équilibrés",
            text: "Configuration cohérente: affiner le slippage estimé pour coller au réel.",
        }
    }
}
