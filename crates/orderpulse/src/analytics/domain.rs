use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Delivered,
    Cancelled,
    Other,
}

impl DeliveryState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
    Critical,
    Warning,
    Opportunity,
}

impl InsightSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Opportunity => "Opportunity",
        }
    }
}

/// How to stand in for a missing `customer_id`.
///
/// `Derived` hashes the record's own fields plus its batch position, so the
/// same batch always produces the same surrogate while two anonymous records
/// still never share one. `Random` mints a fresh UUID per record and makes
/// repeated runs diverge; it exists for callers that want anonymous orders to
/// stay untraceable across reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurrogateIdPolicy {
    #[default]
    Derived,
    Random,
}

impl FromStr for SurrogateIdPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "derived" | "deterministic" => Ok(Self::Derived),
            "random" => Ok(Self::Random),
            other => Err(format!(
                "unknown surrogate id policy '{other}' (expected 'derived' or 'random')"
            )),
        }
    }
}

/// One order after coercion: every field present, every number finite.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOrder {
    pub revenue: f64,
    pub profit: f64,
    pub status: DeliveryState,
    pub quantity: u32,
    pub payment_method: String,
    pub city: String,
    pub product_name: String,
    pub customer_id: String,
}

impl NormalizedOrder {
    pub fn margin_pct(&self) -> f64 {
        if self.revenue > 0.0 {
            self.profit / self.revenue * 100.0
        } else {
            0.0
        }
    }

    pub fn is_cod(&self) -> bool {
        let method = self.payment_method.to_lowercase();
        method == "cod" || method.contains("cash on delivery")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotAnObject { found: &'static str },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnObject { found } => {
                write!(f, "record is {found}, not an order object")
            }
        }
    }
}

/// A record dropped during aggregation, kept so callers can audit the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: SkipReason,
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
