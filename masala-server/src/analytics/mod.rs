//! 报表聚合
//!
//! 对窗口内取回的订单做纯聚合：营收、逐日桶、菜品排行、24 小时分布、
//! 环比增长。无缓存、无增量状态 —— 每次请求从头重算。

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::money;
use shared::order::{Order, OrderStatus, PaymentStatus};

use crate::utils::time::{date_of_millis, hour_of_millis};

// ============================================================================
// Report Types
// ============================================================================

/// Metric selector for GET /api/analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    All,
    Revenue,
    Orders,
    Items,
    Hours,
    Growth,
}

/// Revenue totals, split by payment status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueStats {
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
    /// total / order count, 2-dp half-up
    pub average: f64,
}

/// Per-day bucket (zero-filled across the window)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub orders: i32,
    pub revenue: f64,
}

/// Order counts by lifecycle status plus the daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersStats {
    pub total: i32,
    pub by_status: BTreeMap<String, i32>,
    pub daily: Vec<DailyBucket>,
}

/// Menu item ranking entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSales {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: i32,
    pub revenue: f64,
}

/// Hour-of-day bucket (always 24, zero-filled)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub orders: i32,
    pub revenue: f64,
}

/// Period-over-period growth, current window vs the equal-length
/// immediately preceding window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthStats {
    pub revenue_growth_pct: f64,
    pub orders_growth_pct: f64,
}

/// Aggregated analytics response
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub period_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<OrdersStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemSales>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<Vec<HourBucket>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth: Option<GrowthStats>,
}

// ============================================================================
// Aggregation
// ============================================================================

/// Cancelled orders are excluded from every metric
fn countable(order: &Order) -> bool {
    order.status != OrderStatus::Cancelled
}

/// Revenue totals over a window of orders
pub fn revenue_stats(orders: &[Order]) -> RevenueStats {
    let mut total = Decimal::ZERO;
    let mut paid = Decimal::ZERO;
    let mut pending = Decimal::ZERO;
    let mut count = 0i64;

    for order in orders.iter().filter(|o| countable(o)) {
        let amount = money::to_decimal(order.total_amount);
        total += amount;
        count += 1;
        match order.payment_status {
            PaymentStatus::Paid => paid += amount,
            PaymentStatus::Pending => pending += amount,
            PaymentStatus::Refunded => {}
        }
    }

    let average = if count > 0 {
        total / Decimal::from(count)
    } else {
        Decimal::ZERO
    };

    RevenueStats {
        total: money::to_f64(total),
        paid: money::to_f64(paid),
        pending: money::to_f64(pending),
        average: money::to_f64(average),
    }
}

/// Status totals + per-day buckets, zero-filled from `window_start` for
/// `days` days
pub fn orders_stats(orders: &[Order], window_start: NaiveDate, days: u32) -> OrdersStats {
    let mut by_status: BTreeMap<String, i32> = BTreeMap::new();
    let mut daily: BTreeMap<NaiveDate, (i32, Decimal)> = BTreeMap::new();

    // Zero-fill every day of the window
    for offset in 0..days {
        let date = window_start + chrono::Duration::days(offset as i64);
        daily.insert(date, (0, Decimal::ZERO));
    }

    let mut total = 0i32;
    for order in orders {
        *by_status.entry(order.status.to_string()).or_default() += 1;
        if !countable(order) {
            continue;
        }
        total += 1;
        let date = date_of_millis(order.created_at);
        if let Some(bucket) = daily.get_mut(&date) {
            bucket.0 += 1;
            bucket.1 += money::to_decimal(order.total_amount);
        }
    }

    OrdersStats {
        total,
        by_status,
        daily: daily
            .into_iter()
            .map(|(date, (orders, revenue))| DailyBucket {
                date: date.format("%Y-%m-%d").to_string(),
                orders,
                revenue: money::to_f64(revenue),
            })
            .collect(),
    }
}

/// Per-menu-item popularity and revenue, descending by quantity
pub fn item_sales(orders: &[Order]) -> Vec<ItemSales> {
    let mut by_item: BTreeMap<String, (String, i32, Decimal)> = BTreeMap::new();
    for order in orders.iter().filter(|o| countable(o)) {
        for item in &order.items {
            let entry = by_item
                .entry(item.menu_item_id.clone())
                .or_insert_with(|| (item.name.clone(), 0, Decimal::ZERO));
            entry.1 += item.quantity;
            entry.2 += money::to_decimal(item.total_price);
        }
    }

    let mut ranking: Vec<ItemSales> = by_item
        .into_iter()
        .map(|(menu_item_id, (name, quantity, revenue))| ItemSales {
            menu_item_id,
            name,
            quantity,
            revenue: money::to_f64(revenue),
        })
        .collect();
    ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
    ranking
}

/// 24 zero-filled hour-of-day buckets
pub fn hour_histogram(orders: &[Order]) -> Vec<HourBucket> {
    let mut buckets: Vec<(i32, Decimal)> = vec![(0, Decimal::ZERO); 24];
    for order in orders.iter().filter(|o| countable(o)) {
        let hour = hour_of_millis(order.created_at) as usize;
        if let Some(bucket) = buckets.get_mut(hour) {
            bucket.0 += 1;
            bucket.1 += money::to_decimal(order.total_amount);
        }
    }
    buckets
        .into_iter()
        .enumerate()
        .map(|(hour, (orders, revenue))| HourBucket {
            hour: hour as u32,
            orders,
            revenue: money::to_f64(revenue),
        })
        .collect()
}

/// Growth percentage: (current - previous) / previous × 100.
/// A zero previous value reports 100% when anything grew, else 0%.
fn growth_pct(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        if current.is_zero() { 0.0 } else { 100.0 }
    } else {
        money::to_f64((current - previous) / previous * Decimal::from(100))
    }
}

/// Period-over-period growth of revenue and order count
pub fn growth_stats(current: &[Order], previous: &[Order]) -> GrowthStats {
    let revenue = |orders: &[Order]| -> Decimal {
        orders
            .iter()
            .filter(|o| countable(o))
            .map(|o| money::to_decimal(o.total_amount))
            .sum()
    };
    let count = |orders: &[Order]| -> Decimal {
        Decimal::from(orders.iter().filter(|o| countable(o)).count() as u64)
    };

    GrowthStats {
        revenue_growth_pct: growth_pct(revenue(current), revenue(previous)),
        orders_growth_pct: growth_pct(count(current), count(previous)),
    }
}

/// Assemble the report for the requested metric
pub fn build_report(
    metric: Metric,
    period_days: u32,
    window_start: NaiveDate,
    current: &[Order],
    previous: &[Order],
) -> AnalyticsReport {
    let want = |m: Metric| metric == Metric::All || metric == m;
    AnalyticsReport {
        period_days,
        revenue: want(Metric::Revenue).then(|| revenue_stats(current)),
        orders: want(Metric::Orders).then(|| orders_stats(current, window_start, period_days)),
        items: want(Metric::Items).then(|| item_sales(current)),
        hours: want(Metric::Hours).then(|| hour_histogram(current)),
        growth: want(Metric::Growth).then(|| growth_stats(current, previous)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{ItemStatus, OrderItem};

    fn order(
        id: &str,
        total: f64,
        status: OrderStatus,
        payment: PaymentStatus,
        created_at: i64,
    ) -> Order {
        Order {
            id: format!("order:{}", id),
            customer_name: "Asha".to_string(),
            customer_phone: None,
            status,
            payment_status: payment,
            total_amount: total,
            cancellation_reason: None,
            cancelled_at: None,
            created_at,
            items: Vec::new(),
        }
    }

    fn with_items(mut order: Order, items: Vec<(&str, i32, f64)>) -> Order {
        order.items = items
            .into_iter()
            .map(|(name, quantity, total_price)| OrderItem {
                id: format!("order_item:{}", name),
                menu_item_id: format!("menu_item:{}", name),
                name: name.to_string(),
                quantity,
                completed_quantity: 0,
                unit_price: total_price / quantity as f64,
                total_price,
                item_status: ItemStatus::Pending,
            })
            .collect();
        order
    }

    fn millis(date: (i32, u32, u32), hour: u32) -> i64 {
        use chrono::{NaiveDate, TimeZone, Utc};
        let d = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        Utc.from_utc_datetime(&d.and_hms_opt(hour, 30, 0).unwrap())
            .timestamp_millis()
    }

    #[test]
    fn revenue_example_from_period_seven() {
        // 一单已付 ₹200，一单待付 ₹200，一单待付 ₹100
        let orders = vec![
            order("a", 200.0, OrderStatus::Completed, PaymentStatus::Paid, millis((2026, 7, 1), 12)),
            order("b", 200.0, OrderStatus::Ready, PaymentStatus::Pending, millis((2026, 7, 2), 13)),
            order("c", 100.0, OrderStatus::Pending, PaymentStatus::Pending, millis((2026, 7, 3), 19)),
        ];
        let stats = revenue_stats(&orders);
        assert_eq!(stats.total, 500.0);
        assert_eq!(stats.paid, 200.0);
        assert_eq!(stats.pending, 300.0);
        assert_eq!(stats.average, 166.67);
    }

    #[test]
    fn cancelled_orders_are_excluded() {
        let orders = vec![
            order("a", 200.0, OrderStatus::Completed, PaymentStatus::Paid, millis((2026, 7, 1), 12)),
            order("x", 999.0, OrderStatus::Cancelled, PaymentStatus::Pending, millis((2026, 7, 1), 12)),
        ];
        let stats = revenue_stats(&orders);
        assert_eq!(stats.total, 200.0);
        assert_eq!(stats.average, 200.0);
    }

    #[test]
    fn daily_buckets_are_zero_filled() {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let orders = vec![order(
            "a",
            150.0,
            OrderStatus::Completed,
            PaymentStatus::Paid,
            millis((2026, 7, 3), 12),
        )];
        let stats = orders_stats(&orders, start, 7);
        assert_eq!(stats.daily.len(), 7);
        assert_eq!(stats.daily[0].date, "2026-07-01");
        assert_eq!(stats.daily[0].orders, 0);
        assert_eq!(stats.daily[2].orders, 1);
        assert_eq!(stats.daily[2].revenue, 150.0);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.by_status["completed"], 1);
    }

    #[test]
    fn hour_histogram_has_24_buckets() {
        let orders = vec![
            order("a", 100.0, OrderStatus::Completed, PaymentStatus::Paid, millis((2026, 7, 1), 19)),
            order("b", 50.0, OrderStatus::Completed, PaymentStatus::Paid, millis((2026, 7, 2), 19)),
        ];
        let histogram = hour_histogram(&orders);
        assert_eq!(histogram.len(), 24);
        assert_eq!(histogram[19].orders, 2);
        assert_eq!(histogram[19].revenue, 150.0);
        assert_eq!(histogram[0].orders, 0);
    }

    #[test]
    fn item_ranking_descends_by_quantity() {
        let base = order("a", 0.0, OrderStatus::Completed, PaymentStatus::Paid, millis((2026, 7, 1), 12));
        let orders = vec![
            with_items(base.clone(), vec![("naan", 3, 240.0), ("dal", 1, 180.0)]),
            with_items(base, vec![("naan", 2, 160.0)]),
        ];
        let ranking = item_sales(&orders);
        assert_eq!(ranking[0].name, "naan");
        assert_eq!(ranking[0].quantity, 5);
        assert_eq!(ranking[0].revenue, 400.0);
        assert_eq!(ranking[1].name, "dal");
    }

    #[test]
    fn growth_against_previous_window() {
        let current = vec![
            order("a", 300.0, OrderStatus::Completed, PaymentStatus::Paid, 0),
            order("b", 300.0, OrderStatus::Completed, PaymentStatus::Paid, 0),
        ];
        let previous = vec![order(
            "p",
            400.0,
            OrderStatus::Completed,
            PaymentStatus::Paid,
            0,
        )];
        let growth = growth_stats(&current, &previous);
        assert_eq!(growth.revenue_growth_pct, 50.0);
        assert_eq!(growth.orders_growth_pct, 100.0);
    }

    #[test]
    fn growth_from_empty_previous_window() {
        let current = vec![order("a", 100.0, OrderStatus::Completed, PaymentStatus::Paid, 0)];
        let growth = growth_stats(&current, &[]);
        assert_eq!(growth.revenue_growth_pct, 100.0);
        assert_eq!(growth.orders_growth_pct, 100.0);

        let no_change = growth_stats(&[], &[]);
        assert_eq!(no_change.revenue_growth_pct, 0.0);
    }

    #[test]
    fn metric_selector_limits_sections() {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let report = build_report(Metric::Revenue, 7, start, &[], &[]);
        assert!(report.revenue.is_some());
        assert!(report.orders.is_none());
        assert!(report.growth.is_none());

        let all = build_report(Metric::All, 7, start, &[], &[]);
        assert!(all.revenue.is_some() && all.orders.is_some() && all.hours.is_some());
    }
}
