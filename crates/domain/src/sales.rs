//! Sales analytics over delivered orders.
//!
//! The aggregator is a pure function of the orders it is handed: filtering
//! happens upstream, and nothing is cached between calls.

mod aggregate;
mod month;
mod summary;

pub use aggregate::{
    GROWTH_WINDOW, PROJECTED_MONTHS, TREND_MONTHS, UNKNOWN_LABEL, growth_rate, monthly_trends,
    project, summarize,
};
pub use month::{ParseYearMonthError, YearMonth};
pub use summary::{MonthlyTrend, OrderDetails, ProjectedSale, SalesSummary};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The slice of a record the sales report looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub delivered_on: NaiveDate,
    /// `None` while the price has not been recorded.
    pub sale_price: Option<f64>,
    pub zone: Option<String>,
    pub sold_by: Option<String>,
    pub lead_source: Option<String>,
}
