use orderpulse::analytics::OrderAnalyticsPipeline;
use orderpulse::ingest::{orders_from_csv_reader, orders_from_path, orders_from_payload};
use serde_json::json;
use std::io::Cursor;

const EXPORT: &str = "\
revenue,profit,status,quantity,payment_method,city,product_name,customer_id
150000,30000,Delivered,1,UPI,Mumbai,Espresso Machine,CUST001
1800,,Delivered,3,COD,Pune,Filter Pack,CUST002
950,,Cancelled,1,COD,Pune,Filter Pack,
";

#[test]
fn csv_export_flows_through_the_pipeline() {
    let records = orders_from_csv_reader(Cursor::new(EXPORT)).expect("export parses");
    assert_eq!(records.len(), 3);

    let report = OrderAnalyticsPipeline::default().run(&records);
    let rollups = report.rollups();
    let metrics = report.metrics();

    assert_eq!(report.aggregated(), 3);
    assert_eq!(rollups.financials.total_revenue, 152750.0);
    assert_eq!(rollups.financials.delivered_revenue, 151800.0);
    // the second row's profit defaults to 20% of its revenue
    assert_eq!(rollups.financials.delivered_profit, 30360.0);
    assert_eq!(rollups.orders.cancelled, 1);

    // the blank customer_id got a surrogate, so three distinct buyers
    assert_eq!(metrics.unique_customers, 3);
    assert_eq!(rollups.high_value_customers, vec!["CUST001".to_string()]);

    let pune = rollups.cities.get("Pune").expect("pune rollup");
    assert_eq!(pune.orders, 2);
    assert_eq!(pune.cod_orders, 2);
}

#[test]
fn single_record_envelope_reaches_the_pipeline() {
    let records = orders_from_payload(json!({
        "revenue": 500, "status": "Delivered", "customer_id": "ONLY",
    }))
    .expect("bare object accepted");

    let report = OrderAnalyticsPipeline::default().run(&records);
    assert_eq!(report.received(), 1);
    assert_eq!(report.rollups().orders.delivered, 1);
}

#[test]
fn json_files_load_by_extension() {
    let path = std::env::temp_dir().join("orderpulse-batch-ingest-test.json");
    std::fs::write(
        &path,
        r#"{ "orders": [ { "revenue": 100, "status": "Delivered" } ] }"#,
    )
    .expect("fixture written");

    let records = orders_from_path(&path).expect("json batch loads");
    assert_eq!(records.len(), 1);

    std::fs::remove_file(&path).ok();
}

#[test]
fn csv_files_load_by_extension() {
    let path = std::env::temp_dir().join("orderpulse-batch-ingest-test.csv");
    std::fs::write(&path, EXPORT).expect("fixture written");

    let records = orders_from_path(&path).expect("csv batch loads");
    assert_eq!(records.len(), 3);

    std::fs::remove_file(&path).ok();
}

#[test]
fn malformed_json_files_are_client_errors() {
    let path = std::env::temp_dir().join("orderpulse-batch-ingest-broken.json");
    std::fs::write(&path, "{ not json").expect("fixture written");

    let error = orders_from_path(&path).expect_err("broken json rejected");
    assert!(error.to_string().contains("invalid order JSON data"));

    std::fs::remove_file(&path).ok();
}
