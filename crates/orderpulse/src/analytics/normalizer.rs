use super::domain::{json_kind, DeliveryState, NormalizedOrder, SkipReason, SurrogateIdPolicy};
use super::thresholds::DEFAULT_PROFIT_SHARE;
use serde_json::{Map, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

const UNKNOWN: &str = "Unknown";

/// Coerce one raw record into a fully-populated order. Field-level problems
/// resolve to defaults; only a record that is not an object at all is
/// rejected.
pub(crate) fn normalize(
    raw: &Value,
    index: usize,
    policy: SurrogateIdPolicy,
) -> Result<NormalizedOrder, SkipReason> {
    let fields = raw.as_object().ok_or(SkipReason::NotAnObject {
        found: json_kind(raw),
    })?;

    let revenue = numeric_field(fields, "revenue").unwrap_or(0.0);
    let profit = numeric_field(fields, "profit").unwrap_or(revenue * DEFAULT_PROFIT_SHARE);
    let quantity = numeric_field(fields, "quantity")
        .filter(|quantity| *quantity >= 1.0)
        .map(|quantity| quantity as u32)
        .unwrap_or(1);

    let status = classify_status(fields.get("status"));
    let payment_method = string_field(fields, "payment_method");
    let city = string_field(fields, "city");
    let product_name = string_field(fields, "product_name");
    let customer_id = match fields.get("customer_id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
        _ => surrogate_customer_id(fields, index, policy),
    };

    Ok(NormalizedOrder {
        revenue,
        profit,
        status,
        quantity,
        payment_method,
        city,
        product_name,
        customer_id,
    })
}

/// Case-insensitive substring classification; "delivered" wins over "cancel"
/// when an adversarial status matches both.
fn classify_status(raw: Option<&Value>) -> DeliveryState {
    let status = raw
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();

    if status.contains("delivered") {
        DeliveryState::Delivered
    } else if status.contains("cancel") {
        DeliveryState::Cancelled
    } else {
        DeliveryState::Other
    }
}

fn numeric_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    let parsed = match fields.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|number| number.is_finite() && *number >= 0.0)
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(value)) if !value.trim().is_empty() => value.trim().to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn surrogate_customer_id(
    fields: &Map<String, Value>,
    index: usize,
    policy: SurrogateIdPolicy,
) -> String {
    match policy {
        SurrogateIdPolicy::Random => format!("anon-{}", Uuid::new_v4().simple()),
        SurrogateIdPolicy::Derived => {
            // DefaultHasher::new() uses fixed keys, so the surrogate is
            // stable across runs. The batch position keeps two otherwise
            // identical anonymous records apart.
            let mut hasher = DefaultHasher::new();
            index.hash(&mut hasher);
            for key in ["product_name", "city", "payment_method", "status"] {
                if let Some(Value::String(value)) = fields.get(key) {
                    value.hash(&mut hasher);
                }
            }
            format!("anon-{:016x}", hasher.finish())
        }
    }
}
