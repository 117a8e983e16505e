use orderpulse::analytics::domain::SurrogateIdPolicy;
use orderpulse::analytics::{OrderAnalyticsPipeline, NO_RISK_FALLBACK};
use serde_json::{json, Value};

fn batch(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(records) => records,
        other => panic!("expected an array batch, got {other}"),
    }
}

#[test]
fn single_high_value_order_produces_expected_report() {
    let records = batch(json!([
        { "revenue": 150000, "profit": 30000, "status": "Delivered",
          "city": "Mumbai", "payment_method": "UPI", "customer_id": "CUST001" }
    ]));

    let report = OrderAnalyticsPipeline::default().run(&records);
    let rollups = report.rollups();
    let metrics = report.metrics();
    let health = report.health();

    assert_eq!(rollups.financials.delivered_revenue, 150000.0);
    assert_eq!(metrics.profit_margin, 20.0);
    assert_eq!(metrics.unique_customers, 1);
    assert_eq!(
        rollups.high_value_customers,
        vec!["CUST001".to_string()]
    );

    let ids: Vec<&str> = report.insights().iter().map(|insight| insight.id).collect();
    assert_eq!(ids, vec!["low_repeat_rate", "high_value_customers"]);

    // only the healthy-margin bracket fires: a margin of exactly 20 costs 5
    assert_eq!(health.overall_score, 95);
    assert_eq!(health.status_label, "Excellent");
    assert_eq!(health.top_opportunity, "Low repeat purchase rate");
    assert_eq!(health.critical_risk, NO_RISK_FALLBACK);
}

#[test]
fn empty_batch_yields_zeroed_finite_report() {
    let report = OrderAnalyticsPipeline::default().run(&[]);
    let rollups = report.rollups();
    let metrics = report.metrics();

    assert_eq!(report.received(), 0);
    assert_eq!(rollups.financials.total_revenue, 0.0);
    assert_eq!(rollups.orders.total, 0);
    assert_eq!(metrics.profit_margin, 0.0);
    assert_eq!(metrics.average_order_value, 0.0);
    assert_eq!(metrics.conversion_rate, 0.0);
    assert_eq!(metrics.cancellation_rate, 0.0);
    assert_eq!(metrics.repeat_rate, 0.0);
    assert_eq!(metrics.cod_cancellation_rate, 0.0);

    // the unique-customer floor keeps the repeat rule well-defined, so it is
    // the only insight an empty batch emits
    let ids: Vec<&str> = report.insights().iter().map(|insight| insight.id).collect();
    assert_eq!(ids, vec!["low_repeat_rate"]);

    // zeroed metrics trip only the margin brackets
    assert_eq!(report.health().overall_score, 85);
    assert_eq!(report.health().status_label, "Excellent");
}

#[test]
fn status_classification_accounts_for_every_record() {
    let records = batch(json!([
        { "status": "Delivered", "customer_id": "A" },
        { "status": "DELIVERED early", "customer_id": "B" },
        { "status": "Cancelled by customer", "customer_id": "C" },
        { "status": "refund requested", "customer_id": "D" },
        { "customer_id": "E" },
    ]));

    let report = OrderAnalyticsPipeline::default().run(&records);
    let orders = &report.rollups().orders;

    assert_eq!(orders.delivered, 2);
    assert_eq!(orders.cancelled, 1);
    assert_eq!(orders.other, 2);
    assert_eq!(
        orders.delivered + orders.cancelled + orders.other,
        report.aggregated()
    );
}

#[test]
fn derived_rates_stay_in_range_for_degenerate_batches() {
    let degenerate = [
        json!([{ "revenue": 0, "profit": 0, "status": "Delivered", "customer_id": "A" }]),
        json!([{ "revenue": "garbage", "quantity": "many", "customer_id": "A" }]),
        json!([
            { "revenue": -900, "profit": -100, "status": "Cancelled", "customer_id": "A" },
            { "revenue": null, "status": 7, "customer_id": "B" },
        ]),
    ];

    for payload in degenerate {
        let records = batch(payload);
        let report = OrderAnalyticsPipeline::default().run(&records);
        let metrics = report.metrics();

        for rate in [
            metrics.profit_margin,
            metrics.conversion_rate,
            metrics.cancellation_rate,
            metrics.repeat_rate,
            metrics.cod_cancellation_rate,
        ] {
            assert!(rate.is_finite(), "rate must be finite, got {rate}");
            assert!((0.0..=100.0).contains(&rate), "rate out of range: {rate}");
        }
        assert!(metrics.average_order_value.is_finite());
        assert!(report.health().overall_score <= 100);
    }
}

#[test]
fn aggregate_sums_are_order_independent() {
    let payload = json!([
        { "revenue": 1200, "profit": 300, "status": "Delivered", "city": "Pune",
          "payment_method": "COD", "customer_id": "A" },
        { "revenue": 800, "status": "Cancelled", "city": "Delhi",
          "payment_method": "UPI", "customer_id": "B" },
        { "revenue": 500, "profit": 50, "status": "Delivered", "city": "Pune",
          "payment_method": "Card", "customer_id": "A" },
    ]);

    let forward = batch(payload.clone());
    let mut reversed = batch(payload);
    reversed.reverse();

    let first = OrderAnalyticsPipeline::default().run(&forward);
    let second = OrderAnalyticsPipeline::default().run(&reversed);

    assert_eq!(
        first.rollups().financials.total_revenue,
        second.rollups().financials.total_revenue
    );
    assert_eq!(
        first.rollups().financials.delivered_profit,
        second.rollups().financials.delivered_profit
    );
    assert_eq!(first.rollups().orders.delivered, second.rollups().orders.delivered);
    assert_eq!(first.metrics().conversion_rate, second.metrics().conversion_rate);
    assert_eq!(first.metrics().repeat_rate, second.metrics().repeat_rate);
}

#[test]
fn unusable_records_are_skipped_without_poisoning_the_batch() {
    let records = batch(json!([
        { "revenue": 100, "status": "Delivered", "customer_id": "A" },
        "free-form note",
        17,
        null,
    ]));

    let report = OrderAnalyticsPipeline::default().run(&records);

    assert_eq!(report.received(), 4);
    assert_eq!(report.aggregated(), 1);
    assert_eq!(report.rollups().financials.total_revenue, 100.0);

    let indices: Vec<usize> = report.skipped().iter().map(|skip| skip.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn pipeline_is_idempotent_under_derived_surrogates() {
    let records = batch(json!([
        { "revenue": 4000, "profit": 900, "status": "Delivered", "city": "Mumbai",
          "payment_method": "COD", "product_name": "Lamp" },
        { "revenue": 2500, "status": "Cancelled", "city": "Delhi",
          "payment_method": "UPI", "product_name": "Desk" },
        { "revenue": 700, "status": "Delivered", "city": "Mumbai",
          "payment_method": "COD", "product_name": "Lamp" },
    ]));

    let pipeline = OrderAnalyticsPipeline::new(SurrogateIdPolicy::Derived);
    let first = serde_json::to_value(pipeline.run(&records).summary()).expect("serializes");
    let second = serde_json::to_value(pipeline.run(&records).summary()).expect("serializes");

    assert_eq!(first, second);
}

#[test]
fn anonymous_orders_never_merge_under_either_policy() {
    let records = batch(json!([
        { "revenue": 100, "status": "Delivered", "city": "Pune" },
        { "revenue": 100, "status": "Delivered", "city": "Pune" },
    ]));

    for policy in [SurrogateIdPolicy::Derived, SurrogateIdPolicy::Random] {
        let report = OrderAnalyticsPipeline::new(policy).run(&records);
        assert_eq!(report.metrics().unique_customers, 2, "policy {policy:?}");
    }
}

#[test]
fn top_customers_projection_ranks_and_truncates() {
    let records = batch(json!([
        { "revenue": 500, "status": "Delivered", "customer_id": "LOW" },
        { "revenue": 9000, "status": "Delivered", "customer_id": "TOP" },
        { "revenue": 2000, "status": "Delivered", "customer_id": "MID" },
        { "revenue": 1000, "status": "Delivered", "customer_id": "MID" },
    ]));

    let report = OrderAnalyticsPipeline::default().run(&records);

    let top_two = report.top_customers(2);
    assert_eq!(top_two.len(), 2);
    assert_eq!(top_two[0].customer_id, "TOP");
    assert_eq!(top_two[1].customer_id, "MID");
    assert_eq!(top_two[1].orders, 2);
    assert_eq!(top_two[1].average_order_value, 1500.0);

    let everyone = report.top_customers(10);
    assert_eq!(everyone.len(), 3);
    assert!(everyone
        .windows(2)
        .all(|pair| pair[0].revenue >= pair[1].revenue));
}

#[test]
fn rankings_break_ties_by_first_seen_order() {
    // lexical order disagrees with insertion order on purpose
    let records = batch(json!([
        { "revenue": 1000, "status": "Delivered", "product_name": "Zebra Mug", "customer_id": "A" },
        { "revenue": 1000, "status": "Delivered", "product_name": "Apple Mug", "customer_id": "B" },
    ]));

    let report = OrderAnalyticsPipeline::default().run(&records);
    let products: Vec<&str> = report
        .metrics()
        .products_by_revenue
        .iter()
        .map(|product| product.product.as_str())
        .collect();

    assert_eq!(products, vec!["Zebra Mug", "Apple Mug"]);
}
