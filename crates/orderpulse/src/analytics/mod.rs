pub mod domain;
pub mod report;
pub mod thresholds;

mod derive;
mod insights;
mod normalizer;
mod rollup;
mod score;

pub use derive::DerivedMetrics;
pub use insights::Insight;
pub use report::OrderReport;
pub use rollup::{
    CityRollup, CustomerRollup, FinancialTotals, OrderCounts, PaymentBucket, PaymentRollup,
    ProductRollup, RollupSet,
};
pub use score::{HealthBand, HealthSummary, NO_OPPORTUNITY_FALLBACK, NO_RISK_FALLBACK};

use domain::SurrogateIdPolicy;
use serde_json::Value;

/// Single-pass pipeline from a raw order batch to an immutable report:
/// normalize each record inline, fold it into the rollups, derive rates and
/// rankings, evaluate the insight rules, and score batch health.
///
/// Each run owns its rollups exclusively, so independent batches can be
/// processed in parallel without coordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderAnalyticsPipeline {
    policy: SurrogateIdPolicy,
}

impl OrderAnalyticsPipeline {
    pub fn new(policy: SurrogateIdPolicy) -> Self {
        Self { policy }
    }

    pub fn run(&self, records: &[Value]) -> OrderReport {
        let aggregation = rollup::aggregate_batch(records, self.policy);
        let metrics = derive::derive(&aggregation.rollups);
        let insights = insights::evaluate_rules(&aggregation.rollups, &metrics);
        let health = score::score_health(&metrics, &insights);

        OrderReport::new(aggregation, metrics, insights, health)
    }
}
