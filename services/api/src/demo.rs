use clap::Args;
use orderpulse::analytics::domain::SurrogateIdPolicy;
use orderpulse::analytics::thresholds::DEFAULT_TOP_CUSTOMERS;
use orderpulse::analytics::{OrderAnalyticsPipeline, OrderReport};
use orderpulse::config::AppConfig;
use orderpulse::error::AppError;
use orderpulse::ingest;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Path to a JSON or CSV order batch export
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Number of customers in the top-customer listing
    #[arg(long, default_value_t = DEFAULT_TOP_CUSTOMERS)]
    pub(crate) top_customers: usize,
    /// Surrogate id policy for records missing customer_id (derived|random)
    #[arg(long)]
    pub(crate) surrogate_ids: Option<SurrogateIdPolicy>,
    /// Emit the full report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of customers in the top-customer listing
    #[arg(long, default_value_t = DEFAULT_TOP_CUSTOMERS)]
    pub(crate) top_customers: usize,
    /// Emit the full report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_orders_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        input,
        top_customers,
        surrogate_ids,
        json,
    } = args;

    let policy = match surrogate_ids {
        Some(policy) => policy,
        None => AppConfig::load()?.pipeline.surrogate_ids,
    };

    let records = ingest::orders_from_path(&input)?;
    let report = OrderAnalyticsPipeline::new(policy).run(&records);

    emit_report(&report, top_customers, json);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { top_customers, json } = args;

    println!("Order analytics demo (embedded sample batch)");
    let records = sample_batch();
    let report = OrderAnalyticsPipeline::default().run(&records);

    emit_report(&report, top_customers, json);
    Ok(())
}

fn emit_report(report: &OrderReport, top_customers: usize, json: bool) {
    if json {
        match serde_json::to_string_pretty(&report.summary()) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("report serialization unavailable: {err}"),
        }
    } else {
        render_order_report(report, top_customers);
    }
}

pub(crate) fn render_order_report(report: &OrderReport, top_customers: usize) {
    let financials = report.financial_summary();
    let orders = report.order_breakdown();
    let metrics = report.metrics();
    let health = report.health();

    println!(
        "Processed {} of {} received records",
        report.aggregated(),
        report.received()
    );

    println!("\nFinancials");
    println!("- Total revenue: {:.2}", financials.total_revenue);
    println!("- Total profit: {:.2}", financials.total_profit);
    println!(
        "- Delivered revenue: {:.2} (profit {:.2})",
        financials.delivered_revenue, financials.delivered_profit
    );
    println!("- Revenue lost to cancellations: {:.2}", financials.cancelled_revenue);

    println!("\nOrder mix");
    println!(
        "- {} delivered, {} cancelled, {} other ({} low-margin)",
        orders.delivered, orders.cancelled, orders.other, orders.low_margin
    );

    println!("\nDerived metrics");
    println!("- Profit margin: {:.1}%", metrics.profit_margin);
    println!("- Average order value: {:.2}", metrics.average_order_value);
    println!("- Conversion rate: {:.1}%", metrics.conversion_rate);
    println!("- Cancellation rate: {:.1}%", metrics.cancellation_rate);
    println!(
        "- Repeat rate: {:.1}% ({} of {} customers)",
        metrics.repeat_rate, metrics.repeat_customers, metrics.unique_customers
    );
    println!(
        "- COD cancellation rate: {:.1}%",
        metrics.cod_cancellation_rate
    );

    if metrics.products_by_revenue.is_empty() {
        println!("\nProducts: none delivered");
    } else {
        println!("\nProducts by revenue");
        for product in &metrics.products_by_revenue {
            println!(
                "- {}: {:.2} revenue, {:.2} profit, {} unit(s) across {} order(s)",
                product.product, product.revenue, product.profit, product.quantity, product.orders
            );
        }
    }

    if !metrics.top_cities.is_empty() {
        println!("\nTop cities");
        for city in &metrics.top_cities {
            let risk_note = if city.high_risk { " [high COD risk]" } else { "" };
            println!(
                "- {}: {:.2} revenue, {} order(s), {} customer(s), {:.1}% COD{}",
                city.city, city.revenue, city.orders, city.unique_customers, city.cod_ratio, risk_note
            );
        }
    }

    if !metrics.high_risk_cities.is_empty() {
        println!("\nHigh-risk cities: {}", metrics.high_risk_cities.join(", "));
    }

    let payments = report.payment_entries();
    if !payments.is_empty() {
        println!("\nPayment methods");
        for method in &payments {
            println!(
                "- {}: {:.2} revenue, {} order(s), {} delivered, {} cancelled",
                method.method, method.revenue, method.orders, method.delivered, method.cancelled
            );
        }
    }

    if report.insights().is_empty() {
        println!("\nInsights: none");
    } else {
        println!("\nInsights");
        for insight in report.insights() {
            println!("- [{}] {}: {}", insight.severity_label, insight.title, insight.description);
            println!("  Impact: {}", insight.impact);
            println!("  Recommendation: {}", insight.recommendation);
            if let Some(savings) = insight.estimated_savings {
                println!("  Estimated savings: {savings:.2}");
            }
        }
    }

    println!(
        "\nHealth score: {} ({})",
        health.overall_score, health.status_label
    );
    println!("Top opportunity: {}", health.top_opportunity);
    println!("Critical risk: {}", health.critical_risk);
    println!("Recommended action: {}", health.recommended_action);

    let ranked = report.top_customers(top_customers);
    if !ranked.is_empty() {
        println!("\nTop customers");
        for customer in &ranked {
            println!(
                "- {}: {:.2} revenue across {} order(s) (avg {:.2})",
                customer.customer_id, customer.revenue, customer.orders, customer.average_order_value
            );
        }
    }

    if !report.skipped().is_empty() {
        println!("\nSkipped records");
        for skipped in report.skipped() {
            println!("- record {}: {}", skipped.index, skipped.reason);
        }
    }
}

fn sample_batch() -> Vec<Value> {
    let records = json!([
        { "revenue": 150000, "profit": 30000, "status": "Delivered", "quantity": 1,
          "payment_method": "UPI", "city": "Mumbai", "product_name": "Espresso Machine",
          "customer_id": "CUST001" },
        { "revenue": 2400, "profit": 640, "status": "Delivered", "quantity": 2,
          "payment_method": "COD", "city": "Delhi", "product_name": "Grinder",
          "customer_id": "CUST002" },
        { "revenue": 2200, "status": "delivered", "quantity": 1,
          "payment_method": "Card", "city": "Delhi", "product_name": "Grinder",
          "customer_id": "CUST002" },
        { "revenue": 1800, "profit": 120, "status": "Delivered", "quantity": 3,
          "payment_method": "COD", "city": "Pune", "product_name": "Filter Pack",
          "customer_id": "CUST003" },
        { "revenue": 950, "status": "Cancelled", "quantity": 1,
          "payment_method": "COD", "city": "Pune", "product_name": "Filter Pack",
          "customer_id": "CUST004" },
        { "revenue": "1250.50", "status": "CANCELLED", "quantity": "2",
          "payment_method": "cash on delivery", "city": "Pune", "product_name": "Kettle",
          "customer_id": "CUST005" },
        { "revenue": 700, "profit": 210, "status": "returned to sender", "quantity": 1,
          "payment_method": "Card", "city": "Mumbai", "product_name": "Kettle",
          "customer_id": "CUST001" },
        { "revenue": 3200, "profit": 800, "status": "Delivered", "quantity": 1,
          "payment_method": "UPI", "city": "Bengaluru", "product_name": "Espresso Machine" },
        "corrupted export line",
    ]);

    match records {
        Value::Array(records) => records,
        _ => Vec::new(),
    }
}
