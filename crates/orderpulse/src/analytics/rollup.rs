use super::domain::{DeliveryState, NormalizedOrder, SkippedRecord, SurrogateIdPolicy};
use super::normalizer;
use super::thresholds::{HIGH_VALUE_ORDER_REVENUE, LOW_MARGIN_PCT};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Default, Clone)]
pub struct FinancialTotals {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub delivered_revenue: f64,
    pub delivered_profit: f64,
    pub cancelled_revenue: f64,
}

#[derive(Debug, Default, Clone)]
pub struct OrderCounts {
    pub total: usize,
    pub delivered: usize,
    pub cancelled: usize,
    pub other: usize,
    pub low_margin: usize,
}

#[derive(Debug, Default, Clone)]
pub struct CustomerRollup {
    pub first_seen: usize,
    pub order_revenues: Vec<f64>,
    pub revenue: f64,
}

impl CustomerRollup {
    pub fn orders(&self) -> usize {
        self.order_revenues.len()
    }

    pub fn average_order_value(&self) -> f64 {
        if self.order_revenues.is_empty() {
            0.0
        } else {
            self.revenue / self.order_revenues.len() as f64
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ProductRollup {
    pub first_seen: usize,
    pub revenue: f64,
    pub profit: f64,
    pub quantity: u64,
    pub orders: usize,
}

#[derive(Debug, Default, Clone)]
pub struct CityRollup {
    pub first_seen: usize,
    pub revenue: f64,
    pub orders: usize,
    pub cod_orders: usize,
    pub customers: HashSet<String>,
}

#[derive(Debug, Default, Clone)]
pub struct PaymentRollup {
    pub first_seen: usize,
    pub revenue: f64,
    pub profit: f64,
    pub orders: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

#[derive(Debug, Default, Clone)]
pub struct PaymentBucket {
    pub orders: usize,
    pub revenue: f64,
    pub delivered: usize,
    pub cancelled: usize,
    pub cancelled_revenue: f64,
}

/// Running sums and groupings for one batch. Owned by a single aggregation
/// pass; the derivation stage only ever borrows it.
#[derive(Debug, Default, Clone)]
pub struct RollupSet {
    pub financials: FinancialTotals,
    pub orders: OrderCounts,
    pub customers: HashMap<String, CustomerRollup>,
    pub high_value_customers: Vec<String>,
    pub products: HashMap<String, ProductRollup>,
    pub cities: HashMap<String, CityRollup>,
    pub payment_methods: HashMap<String, PaymentRollup>,
    pub cod_orders: PaymentBucket,
    pub prepaid_orders: PaymentBucket,
}

impl RollupSet {
    /// Fold one order in. Update order is fixed: financial totals, the
    /// delivered/cancelled split, customer rollup, city customer set,
    /// product rollup (delivered only), the low-margin flag, city rollup,
    /// payment-method rollup, COD split.
    pub(crate) fn absorb(&mut self, order: &NormalizedOrder) {
        let is_cod = order.is_cod();

        self.orders.total += 1;
        self.financials.total_revenue += order.revenue;
        self.financials.total_profit += order.profit;

        match order.status {
            DeliveryState::Delivered => {
                self.orders.delivered += 1;
                self.financials.delivered_revenue += order.revenue;
                self.financials.delivered_profit += order.profit;
            }
            DeliveryState::Cancelled => {
                self.orders.cancelled += 1;
                self.financials.cancelled_revenue += order.revenue;
            }
            DeliveryState::Other => self.orders.other += 1,
        }

        let next_customer = self.customers.len();
        let customer = self
            .customers
            .entry(order.customer_id.clone())
            .or_insert_with(|| CustomerRollup {
                first_seen: next_customer,
                ..CustomerRollup::default()
            });
        customer.order_revenues.push(order.revenue);
        customer.revenue += order.revenue;
        if order.revenue >= HIGH_VALUE_ORDER_REVENUE
            && !self.high_value_customers.contains(&order.customer_id)
        {
            self.high_value_customers.push(order.customer_id.clone());
        }

        let next_city = self.cities.len();
        let city = self
            .cities
            .entry(order.city.clone())
            .or_insert_with(|| CityRollup {
                first_seen: next_city,
                ..CityRollup::default()
            });
        city.customers.insert(order.customer_id.clone());

        if order.status == DeliveryState::Delivered {
            let next_product = self.products.len();
            let product = self
                .products
                .entry(order.product_name.clone())
                .or_insert_with(|| ProductRollup {
                    first_seen: next_product,
                    ..ProductRollup::default()
                });
            product.revenue += order.revenue;
            product.profit += order.profit;
            product.quantity += u64::from(order.quantity);
            product.orders += 1;
        }

        if order.margin_pct() < LOW_MARGIN_PCT {
            self.orders.low_margin += 1;
        }

        city.revenue += order.revenue;
        city.orders += 1;
        if is_cod {
            city.cod_orders += 1;
        }

        let next_method = self.payment_methods.len();
        let method = self
            .payment_methods
            .entry(order.payment_method.clone())
            .or_insert_with(|| PaymentRollup {
                first_seen: next_method,
                ..PaymentRollup::default()
            });
        method.revenue += order.revenue;
        method.profit += order.profit;
        method.orders += 1;
        match order.status {
            DeliveryState::Delivered => method.delivered += 1,
            DeliveryState::Cancelled => method.cancelled += 1,
            DeliveryState::Other => {}
        }

        let bucket = if is_cod {
            &mut self.cod_orders
        } else {
            &mut self.prepaid_orders
        };
        bucket.orders += 1;
        bucket.revenue += order.revenue;
        match order.status {
            DeliveryState::Delivered => bucket.delivered += 1,
            DeliveryState::Cancelled => {
                bucket.cancelled += 1;
                bucket.cancelled_revenue += order.revenue;
            }
            DeliveryState::Other => {}
        }
    }
}

#[derive(Debug)]
pub(crate) struct Aggregation {
    pub(crate) rollups: RollupSet,
    pub(crate) received: usize,
    pub(crate) skipped: Vec<SkippedRecord>,
}

/// Normalize and absorb every record in one pass. A record that fails
/// normalization outright contributes nothing and is kept as a diagnostic.
pub(crate) fn aggregate_batch(records: &[Value], policy: SurrogateIdPolicy) -> Aggregation {
    let mut rollups = RollupSet::default();
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match normalizer::normalize(record, index, policy) {
            Ok(order) => rollups.absorb(&order),
            Err(reason) => {
                warn!(index, %reason, "order record skipped");
                skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    Aggregation {
        rollups,
        received: records.len(),
        skipped,
    }
}
