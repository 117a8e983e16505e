pub mod views;

use super::derive::{count_pct, DerivedMetrics};
use super::domain::SkippedRecord;
use super::insights::Insight;
use super::rollup::{Aggregation, PaymentBucket, RollupSet};
use super::score::HealthSummary;
use super::thresholds::DEFAULT_TOP_CUSTOMERS;
use views::{
    BatchDiagnostics, CustomerEntry, FinancialSummary, OrderBreakdown, PaymentBucketView,
    PaymentMethodEntry, PaymentSplitView, ReportSummary,
};

/// Immutable result of one pipeline run. Constructed once per batch, then
/// only read.
#[derive(Debug)]
pub struct OrderReport {
    rollups: RollupSet,
    metrics: DerivedMetrics,
    insights: Vec<Insight>,
    health: HealthSummary,
    received: usize,
    skipped: Vec<SkippedRecord>,
}

impl OrderReport {
    pub(crate) fn new(
        aggregation: Aggregation,
        metrics: DerivedMetrics,
        insights: Vec<Insight>,
        health: HealthSummary,
    ) -> Self {
        Self {
            rollups: aggregation.rollups,
            metrics,
            insights,
            health,
            received: aggregation.received,
            skipped: aggregation.skipped,
        }
    }

    pub fn rollups(&self) -> &RollupSet {
        &self.rollups
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.metrics
    }

    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    pub fn health(&self) -> &HealthSummary {
        &self.health
    }

    pub fn received(&self) -> usize {
        self.received
    }

    pub fn aggregated(&self) -> usize {
        self.received - self.skipped.len()
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Customers ranked by revenue descending, annotated with order count and
    /// average order value, truncated to `limit`. Computed on demand.
    pub fn top_customers(&self, limit: usize) -> Vec<CustomerEntry> {
        let mut ranked: Vec<_> = self.rollups.customers.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.revenue
                .total_cmp(&a.1.revenue)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });

        ranked
            .into_iter()
            .take(limit)
            .map(|(customer_id, rollup)| CustomerEntry {
                customer_id: customer_id.clone(),
                orders: rollup.orders(),
                revenue: rollup.revenue,
                average_order_value: rollup.average_order_value(),
            })
            .collect()
    }

    pub fn financial_summary(&self) -> FinancialSummary {
        let financials = &self.rollups.financials;
        FinancialSummary {
            total_revenue: financials.total_revenue,
            total_profit: financials.total_profit,
            delivered_revenue: financials.delivered_revenue,
            delivered_profit: financials.delivered_profit,
            cancelled_revenue: financials.cancelled_revenue,
        }
    }

    pub fn order_breakdown(&self) -> OrderBreakdown {
        let orders = &self.rollups.orders;
        OrderBreakdown {
            total: orders.total,
            delivered: orders.delivered,
            cancelled: orders.cancelled,
            other: orders.other,
            low_margin: orders.low_margin,
        }
    }

    pub fn payment_entries(&self) -> Vec<PaymentMethodEntry> {
        let mut ranked: Vec<_> = self.rollups.payment_methods.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.revenue
                .total_cmp(&a.1.revenue)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });

        ranked
            .into_iter()
            .map(|(method, rollup)| PaymentMethodEntry {
                method: method.clone(),
                revenue: rollup.revenue,
                profit: rollup.profit,
                orders: rollup.orders,
                delivered: rollup.delivered,
                cancelled: rollup.cancelled,
            })
            .collect()
    }

    pub fn cod_split(&self) -> PaymentSplitView {
        PaymentSplitView {
            cod: bucket_view(&self.rollups.cod_orders),
            prepaid: bucket_view(&self.rollups.prepaid_orders),
        }
    }

    pub fn diagnostics(&self) -> BatchDiagnostics {
        BatchDiagnostics {
            received: self.received,
            aggregated: self.aggregated(),
            skipped: self.skipped.clone(),
        }
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            financials: self.financial_summary(),
            orders: self.order_breakdown(),
            metrics: self.metrics.clone(),
            payments: self.payment_entries(),
            cod_split: self.cod_split(),
            high_value_customers: self.rollups.high_value_customers.clone(),
            insights: self.insights.clone(),
            health: self.health.clone(),
            top_customers: self.top_customers(DEFAULT_TOP_CUSTOMERS),
            diagnostics: self.diagnostics(),
        }
    }
}

fn bucket_view(bucket: &PaymentBucket) -> PaymentBucketView {
    PaymentBucketView {
        orders: bucket.orders,
        revenue: bucket.revenue,
        delivered: bucket.delivered,
        cancelled: bucket.cancelled,
        cancellation_rate: count_pct(bucket.cancelled, bucket.orders),
    }
}
