//! Sales aggregation: totals, label breakdowns, monthly trend and projection.

use std::collections::BTreeMap;

use super::month::YearMonth;
use super::summary::{MonthlyTrend, OrderDetails, ProjectedSale, SalesSummary};
use super::OrderRecord;

/// Label used when an order carries no value for a breakdown dimension.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Number of most recent populated months kept in the trend.
pub const TREND_MONTHS: usize = 12;

/// Width of the averaging windows used for growth and projection.
pub const GROWTH_WINDOW: usize = 3;

/// Number of months projected past the last observed month.
pub const PROJECTED_MONTHS: u8 = 3;

#[derive(Default)]
struct MonthBucket {
    count: u64,
    revenue: f64,
}

#[derive(Default)]
struct Breakdown {
    counts: BTreeMap<String, u64>,
    revenue: BTreeMap<String, f64>,
}

impl Breakdown {
    fn tally<F>(orders: &[OrderRecord], label: F) -> Self
    where
        F: Fn(&OrderRecord) -> Option<&str>,
    {
        let mut breakdown = Self::default();
        for order in orders {
            let key = label(order).unwrap_or(UNKNOWN_LABEL);
            *breakdown.counts.entry(key.to_owned()).or_default() += 1;
            if let Some(price) = order.sale_price {
                *breakdown.revenue.entry(key.to_owned()).or_default() += price;
            }
        }
        breakdown
    }
}

/// Summarize a set of orders the caller has already filtered.
///
/// Never fails: an empty slice yields zero counts, `None` revenue and
/// average, and empty breakdowns, trend and projection.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(orders: &[OrderRecord]) -> SalesSummary {
    let prices: Vec<f64> = orders.iter().filter_map(|order| order.sale_price).collect();
    let total_records = orders.len() as u64;
    let orders_with_price = prices.len() as u64;

    let total_revenue = (!prices.is_empty()).then(|| prices.iter().sum::<f64>());
    let average_order_value = total_revenue.map(|total| total / prices.len() as f64);

    let zone = Breakdown::tally(orders, |order| order.zone.as_deref());
    let sold_by = Breakdown::tally(orders, |order| order.sold_by.as_deref());
    let lead_source = Breakdown::tally(orders, |order| order.lead_source.as_deref());

    let monthly_trends = monthly_trends(orders);
    let projected_sales = project(&monthly_trends);

    SalesSummary {
        total_records,
        total_revenue,
        average_order_value,
        by_zone: zone.counts,
        by_zone_revenue: zone.revenue,
        by_sold_by: sold_by.counts,
        by_sold_by_revenue: sold_by.revenue,
        by_lead_source: lead_source.counts,
        by_lead_source_revenue: lead_source.revenue,
        monthly_trends,
        projected_sales,
        order_details: OrderDetails {
            total_orders: total_records,
            orders_with_price,
            orders_without_price: total_records - orders_with_price,
            average_order_value,
            highest_order: prices.iter().copied().reduce(f64::max).unwrap_or(0.0),
            lowest_order: prices.iter().copied().reduce(f64::min).unwrap_or(0.0),
        },
    }
}

/// Bucket every order by delivery month and keep the latest populated months.
#[must_use]
pub fn monthly_trends(orders: &[OrderRecord]) -> Vec<MonthlyTrend> {
    let mut buckets: BTreeMap<YearMonth, MonthBucket> = BTreeMap::new();
    for order in orders {
        let bucket = buckets.entry(YearMonth::of(order.delivered_on)).or_default();
        bucket.count += 1;
        bucket.revenue += order.sale_price.unwrap_or(0.0);
    }

    let skip = buckets.len().saturating_sub(TREND_MONTHS);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(month, bucket)| MonthlyTrend {
            month,
            count: bucket.count,
            revenue: bucket.revenue,
        })
        .collect()
}

/// Fractional change in mean monthly count between the last two windows.
///
/// Zero unless the trend covers two full windows and the older one is non-empty.
#[must_use]
pub fn growth_rate(trends: &[MonthlyTrend]) -> f64 {
    if trends.len() < 2 * GROWTH_WINDOW {
        return 0.0;
    }
    let split = trends.len() - GROWTH_WINDOW;
    let recent = mean_count(&trends[split..]);
    let older = mean_count(&trends[split - GROWTH_WINDOW..split]);
    if older > 0.0 {
        (recent - older) / older
    } else {
        0.0
    }
}

/// Project the months following the trend, compounding the growth rate.
///
/// Empty when fewer than [`GROWTH_WINDOW`] months were observed.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn project(trends: &[MonthlyTrend]) -> Vec<ProjectedSale> {
    let Some(last) = trends.last() else {
        return Vec::new();
    };
    if trends.len() < GROWTH_WINDOW {
        return Vec::new();
    }

    let window = &trends[trends.len() - GROWTH_WINDOW..];
    let avg_count = mean_count(window);
    let avg_revenue = window.iter().map(|t| t.revenue).sum::<f64>() / window.len() as f64;
    let growth = growth_rate(trends);

    (1..=PROJECTED_MONTHS)
        .map(|offset| {
            let factor = (1.0 + growth).powi(i32::from(offset));
            ProjectedSale {
                month: last.month.plus(u32::from(offset)),
                count: (avg_count * factor).trunc() as u64,
                revenue: avg_revenue * factor,
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean_count(window: &[MonthlyTrend]) -> f64 {
    let total: u64 = window.iter().map(|t| t.count).sum();
    total as f64 / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn order(delivered_on: NaiveDate, price: Option<f64>, zone: Option<&str>) -> OrderRecord {
        OrderRecord {
            delivered_on,
            sale_price: price,
            zone: zone.map(str::to_owned),
            sold_by: None,
            lead_source: None,
        }
    }

    /// `counts[i]` orders at 1000 each in consecutive months from January 2023.
    fn monthly_orders(counts: &[u64]) -> Vec<OrderRecord> {
        let mut orders = Vec::new();
        let mut month = ym(2023, 1);
        for &count in counts {
            let day = date(month.year(), month.month(), 15);
            for _ in 0..count {
                orders.push(order(day, Some(1000.0), Some("North")));
            }
            month = month.succ();
        }
        orders
    }

    #[test]
    fn should_summarize_single_month_with_one_unpriced_order() {
        let orders = vec![
            order(date(2024, 1, 15), Some(1000.0), Some("A")),
            order(date(2024, 1, 20), None, Some("B")),
        ];

        let summary = summarize(&orders);

        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.total_revenue, Some(1000.0));
        assert_eq!(summary.average_order_value, Some(1000.0));
        assert_eq!(summary.order_details.orders_with_price, 1);
        assert_eq!(summary.order_details.orders_without_price, 1);
        assert_eq!(
            summary.by_zone,
            BTreeMap::from([("A".to_string(), 1), ("B".to_string(), 1)])
        );
        assert_eq!(
            summary.by_zone_revenue,
            BTreeMap::from([("A".to_string(), 1000.0)])
        );
        assert_eq!(
            summary.monthly_trends,
            vec![MonthlyTrend {
                month: ym(2024, 1),
                count: 2,
                revenue: 1000.0,
            }]
        );
        assert!(summary.projected_sales.is_empty());
    }

    #[test]
    fn should_degrade_gracefully_on_empty_input() {
        let summary = summarize(&[]);

        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.total_revenue, None);
        assert_eq!(summary.average_order_value, None);
        assert!(summary.by_zone.is_empty());
        assert!(summary.by_sold_by_revenue.is_empty());
        assert!(summary.by_lead_source.is_empty());
        assert!(summary.monthly_trends.is_empty());
        assert!(summary.projected_sales.is_empty());
        assert_eq!(summary.order_details.total_orders, 0);
        assert_eq!(summary.order_details.average_order_value, None);
        assert!(summary.order_details.highest_order.abs() < f64::EPSILON);
        assert!(summary.order_details.lowest_order.abs() < f64::EPSILON);
    }

    #[test]
    fn should_report_zero_extremes_but_null_revenue_when_nothing_priced() {
        let orders = vec![
            order(date(2024, 2, 1), None, None),
            order(date(2024, 2, 2), None, None),
        ];

        let summary = summarize(&orders);

        assert_eq!(summary.total_revenue, None);
        assert_eq!(summary.average_order_value, None);
        assert_eq!(summary.order_details.orders_without_price, 2);
        assert!(summary.order_details.highest_order.abs() < f64::EPSILON);
        assert!(summary.order_details.lowest_order.abs() < f64::EPSILON);
        assert_eq!(summary.monthly_trends[0].count, 2);
        assert!(summary.monthly_trends[0].revenue.abs() < f64::EPSILON);
    }

    #[test]
    fn should_track_highest_lowest_and_average_of_priced_orders() {
        let orders = vec![
            order(date(2024, 3, 1), Some(250.0), None),
            order(date(2024, 3, 2), Some(1250.5), None),
            order(date(2024, 3, 3), None, None),
            order(date(2024, 4, 1), Some(499.5), None),
        ];

        let summary = summarize(&orders);
        let details = &summary.order_details;

        assert_eq!(summary.total_revenue, Some(2000.0));
        assert_eq!(details.orders_with_price, 3);
        assert!((details.highest_order - 1250.5).abs() < 1e-9);
        assert!((details.lowest_order - 250.0).abs() < 1e-9);
        let average = summary.average_order_value.unwrap();
        assert!((average - 2000.0 / 3.0).abs() < 1e-9);
        assert_eq!(details.average_order_value, summary.average_order_value);
    }

    #[test]
    fn should_count_a_zero_price_as_priced() {
        let orders = vec![order(date(2024, 3, 1), Some(0.0), None)];

        let summary = summarize(&orders);

        assert_eq!(summary.total_revenue, Some(0.0));
        assert_eq!(summary.order_details.orders_with_price, 1);
    }

    #[test]
    fn should_place_missing_labels_in_unknown_bucket() {
        let mut orders = vec![
            order(date(2024, 5, 1), Some(100.0), None),
            order(date(2024, 5, 2), None, Some("West")),
        ];
        orders[1].sold_by = Some("Kiran".to_string());
        orders[1].lead_source = Some("Walk-in".to_string());

        let summary = summarize(&orders);

        assert_eq!(summary.by_zone.get(UNKNOWN_LABEL), Some(&1));
        assert_eq!(summary.by_zone.get("West"), Some(&1));
        assert_eq!(summary.by_sold_by.get(UNKNOWN_LABEL), Some(&1));
        assert_eq!(summary.by_sold_by.get("Kiran"), Some(&1));
        assert_eq!(summary.by_lead_source.get("Walk-in"), Some(&1));
        assert_eq!(summary.by_zone_revenue.get(UNKNOWN_LABEL), Some(&100.0));
        assert!(!summary.by_zone_revenue.contains_key("West"));
        let total: u64 = summary.by_zone.values().sum();
        assert_eq!(total, summary.total_records);
    }

    #[test]
    fn should_keep_latest_twelve_months_in_ascending_order() {
        let orders = monthly_orders(&[1; 15]);

        let trends = monthly_trends(&orders);

        assert_eq!(trends.len(), 12);
        assert_eq!(trends.first().unwrap().month, ym(2023, 4));
        assert_eq!(trends.last().unwrap().month, ym(2024, 3));
        assert!(trends.windows(2).all(|pair| pair[0].month < pair[1].month));
    }

    #[test]
    fn should_leave_gaps_for_months_without_orders() {
        let orders = vec![
            order(date(2024, 1, 5), Some(10.0), None),
            order(date(2024, 4, 5), Some(20.0), None),
            order(date(2023, 12, 31), Some(5.0), None),
        ];

        let months: Vec<String> = monthly_trends(&orders)
            .iter()
            .map(|trend| trend.month.to_string())
            .collect();

        assert_eq!(months, ["2023-12", "2024-01", "2024-04"]);
    }

    #[test]
    fn should_compound_growth_over_projection() {
        let orders = monthly_orders(&[10, 10, 10, 20, 20, 20]);
        let trends = monthly_trends(&orders);

        assert!((growth_rate(&trends) - 1.0).abs() < 1e-12);

        let projection = project(&trends);
        let counts: Vec<u64> = projection.iter().map(|p| p.count).collect();
        assert_eq!(counts, [40, 80, 160]);
        assert!((projection[0].revenue - 40_000.0).abs() < 1e-6);
        assert!((projection[2].revenue - 160_000.0).abs() < 1e-6);
        assert_eq!(projection[0].month, ym(2023, 7));
        assert_eq!(projection[2].month, ym(2023, 9));
    }

    #[test]
    fn should_project_flat_when_fewer_than_six_months() {
        let orders = monthly_orders(&[2, 4, 6, 9, 3]);
        let trends = monthly_trends(&orders);

        assert!(growth_rate(&trends).abs() < f64::EPSILON);

        let projection = project(&trends);
        assert_eq!(projection.len(), 3);
        // mean of 6, 9 and 3
        assert!(projection.iter().all(|p| p.count == 6));
        assert!(projection.iter().all(|p| (p.revenue - 6000.0).abs() < 1e-9));
    }

    #[test]
    fn should_not_project_with_fewer_than_three_months() {
        let orders = monthly_orders(&[5, 5]);
        assert!(project(&monthly_trends(&orders)).is_empty());
        assert!(summarize(&orders).projected_sales.is_empty());
    }

    #[test]
    fn should_truncate_projected_counts() {
        let orders = monthly_orders(&[1, 1, 2]);
        let projection = project(&monthly_trends(&orders));
        // mean 4/3 truncates to 1
        assert!(projection.iter().all(|p| p.count == 1));
    }

    #[test]
    fn should_shrink_projection_when_volume_declines() {
        let orders = monthly_orders(&[20, 20, 20, 10, 10, 10]);
        let trends = monthly_trends(&orders);

        assert!((growth_rate(&trends) + 0.5).abs() < 1e-12);
        let counts: Vec<u64> = project(&trends).iter().map(|p| p.count).collect();
        assert_eq!(counts, [5, 2, 1]);
    }

    #[test]
    fn should_roll_projected_months_into_next_year() {
        let orders = vec![
            order(date(2024, 10, 1), Some(1.0), None),
            order(date(2024, 11, 1), Some(1.0), None),
            order(date(2024, 12, 1), Some(1.0), None),
        ];

        let months: Vec<String> = summarize(&orders)
            .projected_sales
            .iter()
            .map(|p| p.month.to_string())
            .collect();

        assert_eq!(months, ["2025-01", "2025-02", "2025-03"]);
    }

    #[test]
    fn should_base_growth_on_retained_window_only() {
        // 14 months: the two oldest fall outside the trend
        let mut counts = vec![100, 100];
        counts.extend([1; 6]);
        counts.extend([2, 2, 2, 4, 4, 4]);
        let orders = monthly_orders(&counts);

        let summary = summarize(&orders);

        assert_eq!(summary.monthly_trends.len(), 12);
        assert_eq!(summary.total_records, 224);
        let counts: Vec<u64> = summary.projected_sales.iter().map(|p| p.count).collect();
        assert_eq!(counts, [8, 16, 32]);
    }

    #[test]
    fn should_produce_identical_output_for_identical_input() {
        let mut orders = monthly_orders(&[3, 1, 4, 1, 5, 9, 2]);
        orders[0].sold_by = Some("Zed".to_string());
        orders[1].sold_by = Some("Amy".to_string());
        orders.push(order(date(2023, 2, 2), None, None));

        let first = serde_json::to_string(&summarize(&orders)).unwrap();
        let second = serde_json::to_string(&summarize(&orders)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn should_serialize_nulls_for_missing_revenue() {
        let json = serde_json::to_value(summarize(&[])).unwrap();

        assert!(json["total_revenue"].is_null());
        assert!(json["average_order_value"].is_null());
        assert_eq!(json["order_details"]["highest_order"], 0.0);
        assert_eq!(json["monthly_trends"], serde_json::json!([]));
    }
}
