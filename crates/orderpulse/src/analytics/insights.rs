use super::derive::{amount_pct, DerivedMetrics};
use super::domain::InsightSeverity;
use super::rollup::RollupSet;
use super::thresholds::{
    COD_CANCELLATION_CRITICAL_PCT, COD_RECOVERABLE_SHARE, HIGH_VALUE_ORDER_REVENUE,
    LOW_REPEAT_RATE_PCT, REPEAT_UPLIFT_SHARE,
};
use serde::Serialize;
use tracing::debug;

/// A rule-triggered qualitative observation. Produced once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub id: &'static str,
    pub title: &'static str,
    pub description: String,
    pub category: &'static str,
    pub severity: InsightSeverity,
    pub severity_label: &'static str,
    pub impact: String,
    pub recommendation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_savings: Option<f64>,
}

struct InsightRule {
    id: &'static str,
    apply: fn(&RollupSet, &DerivedMetrics) -> Option<Insight>,
}

/// Evaluation order is emission order; each rule is a pure predicate over
/// the already-derived metrics.
const RULES: &[InsightRule] = &[
    InsightRule {
        id: "cod_high_cancellation",
        apply: cod_high_cancellation,
    },
    InsightRule {
        id: "low_repeat_rate",
        apply: low_repeat_rate,
    },
    InsightRule {
        id: "high_value_customers",
        apply: high_value_customers,
    },
];

pub(crate) fn evaluate_rules(rollups: &RollupSet, metrics: &DerivedMetrics) -> Vec<Insight> {
    let mut insights = Vec::new();

    for rule in RULES {
        if let Some(insight) = (rule.apply)(rollups, metrics) {
            debug!(rule = rule.id, "insight emitted");
            insights.push(insight);
        }
    }

    insights
}

fn cod_high_cancellation(rollups: &RollupSet, metrics: &DerivedMetrics) -> Option<Insight> {
    if metrics.cod_cancellation_rate <= COD_CANCELLATION_CRITICAL_PCT {
        return None;
    }

    let lost = rollups.cod_orders.cancelled_revenue;
    Some(Insight {
        id: "cod_high_cancellation",
        title: "High COD cancellation rate",
        description: format!(
            "{:.1}% of cash-on-delivery orders end in cancellation",
            metrics.cod_cancellation_rate
        ),
        category: "payments",
        severity: InsightSeverity::Critical,
        severity_label: InsightSeverity::Critical.label(),
        impact: format!("{lost:.0} in COD revenue lost to cancellations"),
        recommendation: "Confirm COD orders before dispatch and push prepaid checkout incentives",
        estimated_savings: Some(lost * COD_RECOVERABLE_SHARE),
    })
}

fn low_repeat_rate(rollups: &RollupSet, metrics: &DerivedMetrics) -> Option<Insight> {
    if metrics.repeat_rate >= LOW_REPEAT_RATE_PCT {
        return None;
    }

    Some(Insight {
        id: "low_repeat_rate",
        title: "Low repeat purchase rate",
        description: format!(
            "Only {:.1}% of customers come back for a second order",
            metrics.repeat_rate
        ),
        category: "retention",
        severity: InsightSeverity::Opportunity,
        severity_label: InsightSeverity::Opportunity.label(),
        impact: format!(
            "{} of {} customers ordered more than once",
            metrics.repeat_customers, metrics.unique_customers
        ),
        recommendation: "Launch post-delivery win-back campaigns with time-boxed offers",
        estimated_savings: Some(rollups.financials.delivered_revenue * REPEAT_UPLIFT_SHARE),
    })
}

fn high_value_customers(rollups: &RollupSet, _metrics: &DerivedMetrics) -> Option<Insight> {
    let count = rollups.high_value_customers.len();
    if count == 0 {
        return None;
    }

    let combined: f64 = rollups
        .high_value_customers
        .iter()
        .filter_map(|id| rollups.customers.get(id))
        .map(|customer| customer.revenue)
        .sum();
    let share = amount_pct(combined, rollups.financials.total_revenue);

    Some(Insight {
        id: "high_value_customers",
        title: "High-value customers identified",
        description: format!(
            "{count} customer(s) placed single orders of {HIGH_VALUE_ORDER_REVENUE:.0}+ and drive {share:.1}% of batch revenue"
        ),
        category: "customers",
        severity: InsightSeverity::Opportunity,
        severity_label: InsightSeverity::Opportunity.label(),
        impact: format!("{combined:.0} in revenue from {count} account(s)"),
        recommendation: "Route these accounts to dedicated care and early stock access",
        estimated_savings: None,
    })
}
