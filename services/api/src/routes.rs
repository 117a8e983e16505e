use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use orderpulse::analytics::domain::{SkippedRecord, SurrogateIdPolicy};
use orderpulse::analytics::report::views::{
    CustomerEntry, FinancialSummary, OrderBreakdown, PaymentMethodEntry, PaymentSplitView,
};
use orderpulse::analytics::thresholds::DEFAULT_TOP_CUSTOMERS;
use orderpulse::analytics::{DerivedMetrics, HealthSummary, Insight, OrderAnalyticsPipeline};
use orderpulse::error::AppError;
use orderpulse::ingest;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    pub(crate) top_customers: Option<usize>,
    #[serde(default = "default_include_skipped")]
    pub(crate) include_skipped: bool,
    #[serde(default)]
    pub(crate) surrogate_ids: Option<SurrogateIdPolicy>,
}

fn default_include_skipped() -> bool {
    true
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            top_customers: None,
            include_skipped: true,
            surrogate_ids: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderReportResponse {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) received: usize,
    pub(crate) aggregated: usize,
    pub(crate) financials: FinancialSummary,
    pub(crate) orders: OrderBreakdown,
    pub(crate) metrics: DerivedMetrics,
    pub(crate) payments: Vec<PaymentMethodEntry>,
    pub(crate) cod_split: PaymentSplitView,
    pub(crate) high_value_customers: Vec<String>,
    pub(crate) insights: Vec<Insight>,
    pub(crate) health: HealthSummary,
    pub(crate) top_customers: Vec<CustomerEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) skipped: Option<Vec<SkippedRecord>>,
}

pub(crate) fn api_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/orders/report", post(order_report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn order_report_endpoint(
    Query(query): Query<ReportQuery>,
    Json(payload): Json<Value>,
) -> Result<Json<OrderReportResponse>, AppError> {
    let records = ingest::orders_from_payload(payload)?;

    let policy = query.surrogate_ids.unwrap_or_default();
    let pipeline = OrderAnalyticsPipeline::new(policy);
    let report = pipeline.run(&records);

    let limit = query.top_customers.unwrap_or(DEFAULT_TOP_CUSTOMERS);
    let skipped = query
        .include_skipped
        .then(|| report.skipped().to_vec())
        .filter(|skipped| !skipped.is_empty());

    Ok(Json(OrderReportResponse {
        generated_at: Utc::now(),
        received: report.received(),
        aggregated: report.aggregated(),
        financials: report.financial_summary(),
        orders: report.order_breakdown(),
        metrics: report.metrics().clone(),
        payments: report.payment_entries(),
        cod_split: report.cod_split(),
        high_value_customers: report.rollups().high_value_customers.clone(),
        insights: report.insights().to_vec(),
        health: report.health().clone(),
        top_customers: report.top_customers(limit),
        skipped,
    }))
}
