use super::super::derive::DerivedMetrics;
use super::super::domain::SkippedRecord;
use super::super::insights::Insight;
use super::super::score::HealthSummary;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub delivered_revenue: f64,
    pub delivered_profit: f64,
    pub cancelled_revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderBreakdown {
    pub total: usize,
    pub delivered: usize,
    pub cancelled: usize,
    pub other: usize,
    pub low_margin: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductEntry {
    pub product: String,
    pub revenue: f64,
    pub profit: f64,
    pub quantity: u64,
    pub orders: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityEntry {
    pub city: String,
    pub revenue: f64,
    pub orders: usize,
    pub unique_customers: usize,
    pub cod_ratio: f64,
    pub high_risk: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodEntry {
    pub method: String,
    pub revenue: f64,
    pub profit: f64,
    pub orders: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentBucketView {
    pub orders: usize,
    pub revenue: f64,
    pub delivered: usize,
    pub cancelled: usize,
    pub cancellation_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentSplitView {
    pub cod: PaymentBucketView,
    pub prepaid: PaymentBucketView,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerEntry {
    pub customer_id: String,
    pub orders: usize,
    pub revenue: f64,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchDiagnostics {
    pub received: usize,
    pub aggregated: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRecord>,
}

/// The full report in serializable form.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub financials: FinancialSummary,
    pub orders: OrderBreakdown,
    pub metrics: DerivedMetrics,
    pub payments: Vec<PaymentMethodEntry>,
    pub cod_split: PaymentSplitView,
    pub high_value_customers: Vec<String>,
    pub insights: Vec<Insight>,
    pub health: HealthSummary,
    pub top_customers: Vec<CustomerEntry>,
    pub diagnostics: BatchDiagnostics,
}
