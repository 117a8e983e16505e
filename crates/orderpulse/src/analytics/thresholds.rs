//! Centralized detection thresholds for order-batch health classification.
//!
//! Changing a value here affects both insight emission (`insights.rs`) and
//! score deductions (`score.rs`).

/// Revenue at or above which a single order marks its customer high-value.
pub const HIGH_VALUE_ORDER_REVENUE: f64 = 100_000.0;

/// Per-order margin percentage below which an order counts as low-margin.
pub const LOW_MARGIN_PCT: f64 = 15.0;

/// Batch profit margin at or below which the scorer docks five points.
pub const HEALTHY_MARGIN_PCT: f64 = 20.0;

/// Batch profit margin below which the scorer docks ten further points.
pub const MARGIN_FLOOR_PCT: f64 = 15.0;

/// City COD share (strictly) above which the city is flagged high-risk.
pub const HIGH_RISK_COD_RATIO_PCT: f64 = 50.0;

/// COD cancellation rate above which the Critical insight fires and the
/// scorer docks twenty points.
pub const COD_CANCELLATION_CRITICAL_PCT: f64 = 50.0;

/// COD cancellation rate above which the scorer docks ten points.
pub const COD_CANCELLATION_WARNING_PCT: f64 = 30.0;

/// Repeat-purchase rate below which the Opportunity insight fires and the
/// scorer docks five points.
pub const LOW_REPEAT_RATE_PCT: f64 = 30.0;

/// Repeat-purchase rate below which the scorer docks ten further points.
pub const POOR_REPEAT_RATE_PCT: f64 = 20.0;

/// Number of cities surfaced in the revenue ranking.
pub const TOP_CITY_LIMIT: usize = 3;

/// Default size of the top-customers projection.
pub const DEFAULT_TOP_CUSTOMERS: usize = 5;

/// Share of cancelled COD revenue assumed recoverable via prepaid incentives.
pub const COD_RECOVERABLE_SHARE: f64 = 0.30;

/// Delivered-revenue uplift assumed attainable from repeat-purchase campaigns.
pub const REPEAT_UPLIFT_SHARE: f64 = 0.05;

/// Share of revenue treated as profit when an order omits its profit figure.
pub const DEFAULT_PROFIT_SHARE: f64 = 0.20;
