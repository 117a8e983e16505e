use super::report::views::{CityEntry, ProductEntry};
use super::rollup::RollupSet;
use super::thresholds::{HIGH_RISK_COD_RATIO_PCT, TOP_CITY_LIMIT};
use serde::Serialize;

/// Rates, margins, and rankings computed from final rollups. Every numeric
/// field is finite; divisions with a zero denominator resolve to 0.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedMetrics {
    pub profit_margin: f64,
    pub average_order_value: f64,
    pub conversion_rate: f64,
    pub cancellation_rate: f64,
    pub unique_customers: usize,
    pub repeat_customers: usize,
    pub repeat_rate: f64,
    pub cod_cancellation_rate: f64,
    pub products_by_revenue: Vec<ProductEntry>,
    pub top_cities: Vec<CityEntry>,
    pub high_risk_cities: Vec<String>,
}

pub(crate) fn derive(rollups: &RollupSet) -> DerivedMetrics {
    let financials = &rollups.financials;
    let orders = &rollups.orders;

    let unique_customers = rollups.customers.len();
    let repeat_customers = rollups
        .customers
        .values()
        .filter(|customer| customer.orders() > 1)
        .count();

    let mut products: Vec<_> = rollups.products.iter().collect();
    products.sort_by(|a, b| {
        b.1.revenue
            .total_cmp(&a.1.revenue)
            .then(a.1.first_seen.cmp(&b.1.first_seen))
    });
    let products_by_revenue = products
        .into_iter()
        .map(|(product, rollup)| ProductEntry {
            product: product.clone(),
            revenue: rollup.revenue,
            profit: rollup.profit,
            quantity: rollup.quantity,
            orders: rollup.orders,
        })
        .collect();

    let mut cities_by_revenue: Vec<_> = rollups.cities.iter().collect();
    cities_by_revenue.sort_by(|a, b| {
        b.1.revenue
            .total_cmp(&a.1.revenue)
            .then(a.1.first_seen.cmp(&b.1.first_seen))
    });
    let top_cities = cities_by_revenue
        .into_iter()
        .take(TOP_CITY_LIMIT)
        .map(|(city, rollup)| {
            let cod_ratio = count_pct(rollup.cod_orders, rollup.orders);
            CityEntry {
                city: city.clone(),
                revenue: rollup.revenue,
                orders: rollup.orders,
                unique_customers: rollup.customers.len(),
                cod_ratio,
                high_risk: cod_ratio > HIGH_RISK_COD_RATIO_PCT,
            }
        })
        .collect();

    let mut cities_by_first_seen: Vec<_> = rollups.cities.iter().collect();
    cities_by_first_seen.sort_by_key(|(_, rollup)| rollup.first_seen);
    let high_risk_cities = cities_by_first_seen
        .into_iter()
        .filter(|(_, rollup)| count_pct(rollup.cod_orders, rollup.orders) > HIGH_RISK_COD_RATIO_PCT)
        .map(|(city, _)| city.clone())
        .collect();

    DerivedMetrics {
        profit_margin: amount_pct(financials.delivered_profit, financials.delivered_revenue),
        average_order_value: if orders.total > 0 {
            financials.total_revenue / orders.total as f64
        } else {
            0.0
        },
        conversion_rate: count_pct(orders.delivered, orders.total),
        cancellation_rate: count_pct(orders.cancelled, orders.total),
        unique_customers,
        repeat_customers,
        // unique-customer floor of 1 keeps the empty batch at 0%, not NaN
        repeat_rate: count_pct(repeat_customers, unique_customers.max(1)),
        cod_cancellation_rate: count_pct(rollups.cod_orders.cancelled, rollups.cod_orders.orders),
        products_by_revenue,
        top_cities,
        high_risk_cities,
    }
}

pub(crate) fn count_pct(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

pub(crate) fn amount_pct(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}
