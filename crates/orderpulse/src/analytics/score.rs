use super::derive::DerivedMetrics;
use super::domain::InsightSeverity;
use super::insights::Insight;
use super::thresholds::{
    COD_CANCELLATION_CRITICAL_PCT, COD_CANCELLATION_WARNING_PCT, HEALTHY_MARGIN_PCT,
    LOW_REPEAT_RATE_PCT, MARGIN_FLOOR_PCT, POOR_REPEAT_RATE_PCT,
};
use serde::Serialize;

pub const NO_OPPORTUNITY_FALLBACK: &str = "No immediate opportunities identified";
pub const NO_RISK_FALLBACK: &str = "No critical risks detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    Excellent,
    Good,
    NeedsAttention,
    Critical,
}

impl HealthBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsAttention => "Needs Attention",
            Self::Critical => "Critical",
        }
    }

    pub const fn recommended_action(self) -> &'static str {
        match self {
            Self::Excellent => "Maintain current operations and scale acquisition spend",
            Self::Good => "Address the flagged risks to unlock the next growth tier",
            Self::NeedsAttention => "Work through the critical insights before scaling further",
            Self::Critical => "Intervene immediately across payments and retention",
        }
    }

    pub const fn for_score(score: u8) -> Self {
        if score >= 80 {
            Self::Excellent
        } else if score >= 60 {
            Self::Good
        } else if score >= 40 {
            Self::NeedsAttention
        } else {
            Self::Critical
        }
    }
}

/// The composite score plus the headline takeaways for the batch.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSummary {
    pub overall_score: u8,
    pub status: HealthBand,
    pub status_label: &'static str,
    pub top_opportunity: String,
    pub critical_risk: String,
    pub recommended_action: &'static str,
}

struct Deduction {
    points: f64,
    applies: fn(&DerivedMetrics) -> bool,
}

/// Brackets are checked independently, so a rate past the outer threshold
/// collects both deductions.
const DEDUCTIONS: &[Deduction] = &[
    Deduction {
        points: 20.0,
        applies: cod_cancellation_critical,
    },
    Deduction {
        points: 10.0,
        applies: cod_cancellation_elevated,
    },
    Deduction {
        points: 10.0,
        applies: repeat_rate_poor,
    },
    Deduction {
        points: 5.0,
        applies: repeat_rate_low,
    },
    Deduction {
        points: 10.0,
        applies: margin_below_floor,
    },
    Deduction {
        points: 5.0,
        applies: margin_below_healthy,
    },
];

fn cod_cancellation_critical(metrics: &DerivedMetrics) -> bool {
    metrics.cod_cancellation_rate > COD_CANCELLATION_CRITICAL_PCT
}

fn cod_cancellation_elevated(metrics: &DerivedMetrics) -> bool {
    metrics.cod_cancellation_rate > COD_CANCELLATION_WARNING_PCT
}

// A single buyer carries no retention signal, so the repeat brackets need at
// least two unique customers before they dock anything.
fn repeat_rate_poor(metrics: &DerivedMetrics) -> bool {
    metrics.unique_customers > 1 && metrics.repeat_rate < POOR_REPEAT_RATE_PCT
}

fn repeat_rate_low(metrics: &DerivedMetrics) -> bool {
    metrics.unique_customers > 1 && metrics.repeat_rate < LOW_REPEAT_RATE_PCT
}

fn margin_below_floor(metrics: &DerivedMetrics) -> bool {
    metrics.profit_margin < MARGIN_FLOOR_PCT
}

// Inclusive bound: a margin of exactly 20 still reads as thin.
fn margin_below_healthy(metrics: &DerivedMetrics) -> bool {
    metrics.profit_margin <= HEALTHY_MARGIN_PCT
}

pub(crate) fn score_health(metrics: &DerivedMetrics, insights: &[Insight]) -> HealthSummary {
    let deducted: f64 = DEDUCTIONS
        .iter()
        .filter(|deduction| (deduction.applies)(metrics))
        .map(|deduction| deduction.points)
        .sum();

    let overall_score = (100.0 - deducted).clamp(0.0, 100.0).round() as u8;
    let status = HealthBand::for_score(overall_score);

    let first_title = |severity: InsightSeverity| {
        insights
            .iter()
            .find(|insight| insight.severity == severity)
            .map(|insight| insight.title.to_string())
    };

    HealthSummary {
        overall_score,
        status,
        status_label: status.label(),
        top_opportunity: first_title(InsightSeverity::Opportunity)
            .unwrap_or_else(|| NO_OPPORTUNITY_FALLBACK.to_string()),
        critical_risk: first_title(InsightSeverity::Critical)
            .unwrap_or_else(|| NO_RISK_FALLBACK.to_string()),
        recommended_action: status.recommended_action(),
    }
}
