use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::io::Read;

pub(crate) fn parse_orders<R: Read>(reader: R) -> Result<Vec<Value>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<OrderRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

/// One export row. Every column is optional; empty cells count as absent so
/// the normalizer applies the same defaults as for sparse JSON records.
#[derive(Debug, Deserialize)]
struct OrderRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    revenue: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    profit: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    quantity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    payment_method: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    product_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    customer_id: Option<String>,
}

impl OrderRow {
    fn into_record(self) -> Value {
        let columns = [
            ("revenue", self.revenue),
            ("profit", self.profit),
            ("status", self.status),
            ("quantity", self.quantity),
            ("payment_method", self.payment_method),
            ("city", self.city),
            ("product_name", self.product_name),
            ("customer_id", self.customer_id),
        ];

        let mut fields = Map::new();
        for (key, value) in columns {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::String(value));
            }
        }

        Value::Object(fields)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rows_become_loose_records_without_empty_cells() {
        let csv = "revenue,profit,status,quantity,payment_method,city,product_name,customer_id\n\
1500,,Delivered,2,COD,Mumbai,Keyboard,CUST001\n";
        let records = parse_orders(Cursor::new(csv)).expect("parse");
        assert_eq!(records.len(), 1);

        let record = records[0].as_object().expect("object record");
        assert_eq!(record["revenue"], "1500");
        assert_eq!(record["city"], "Mumbai");
        assert!(!record.contains_key("profit"));
    }

    #[test]
    fn missing_columns_are_tolerated() {
        let csv = "revenue,status\n900,Cancelled\n";
        let records = parse_orders(Cursor::new(csv)).expect("parse");
        let record = records[0].as_object().expect("object record");
        assert_eq!(record["status"], "Cancelled");
        assert!(!record.contains_key("customer_id"));
    }
}
