//! Output shape of the sales report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::month::YearMonth;

/// Orders delivered in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: YearMonth,
    pub count: u64,
    pub revenue: f64,
}

/// Extrapolated volume for a month after the last observed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSale {
    pub month: YearMonth,
    pub count: u64,
    pub revenue: f64,
}

/// Order-level statistics.
///
/// `highest_order` and `lowest_order` are `0.0` when no order carries a
/// price, whereas `average_order_value` is `None` in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub total_orders: u64,
    pub orders_with_price: u64,
    pub orders_without_price: u64,
    pub average_order_value: Option<f64>,
    pub highest_order: f64,
    pub lowest_order: f64,
}

/// Totals, breakdowns, trend and projection over a set of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_records: u64,
    pub total_revenue: Option<f64>,
    pub average_order_value: Option<f64>,
    pub by_zone: BTreeMap<String, u64>,
    pub by_zone_revenue: BTreeMap<String, f64>,
    pub by_sold_by: BTreeMap<String, u64>,
    pub by_sold_by_revenue: BTreeMap<String, f64>,
    pub by_lead_source: BTreeMap<String, u64>,
    pub by_lead_source_revenue: BTreeMap<String, f64>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub projected_sales: Vec<ProjectedSale>,
    pub order_details: OrderDetails,
}
