use std::collections::HashMap;

use serde::Serialize;
use time::{Date, Duration};

use crate::dates::ISO_DATE;

#[derive(Debug, Default, Serialize)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
    pub active_customers: i64,
    pub wallet_pool: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub revenue: f64,
    pub expenses: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsStats {
    pub trends: Vec<TrendPoint>,
    pub meal_types: HashMap<String, i64>,
    pub shifts: HashMap<String, i64>,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub profit_percentage: f64,
}

/// One point per day from `start` through `start + 30`, zero-filled where a
/// day had no activity, so the chart axis never has gaps.
pub fn fill_trends(
    start: Date,
    revenue_by_day: &HashMap<Date, f64>,
    expenses_by_day: &HashMap<Date, f64>,
) -> Vec<TrendPoint> {
    (0..=30)
        .filter_map(|i| {
            let day = start.checked_add(Duration::days(i))?;
            let date = day.format(ISO_DATE).ok()?;
            Some(TrendPoint {
                date,
                revenue: revenue_by_day.get(&day).copied().unwrap_or(0.0),
                expenses: expenses_by_day.get(&day).copied().unwrap_or(0.0),
            })
        })
        .collect()
}

pub fn profit_percentage(total_revenue: f64, total_expenses: f64) -> f64 {
    if total_revenue > 0.0 {
        (total_revenue - total_expenses) / total_revenue * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn trends_cover_thirty_one_days_zero_filled() {
        let start = date!(2025 - 05 - 01);
        let mut revenue = HashMap::new();
        revenue.insert(date!(2025 - 05 - 03), 105.0);
        let expenses = HashMap::new();

        let trends = fill_trends(start, &revenue, &expenses);
        assert_eq!(trends.len(), 31);
        assert_eq!(trends[0].date, "2025-05-01");
        assert_eq!(trends[0].revenue, 0.0);
        assert_eq!(trends[2].revenue, 105.0);
        assert_eq!(trends[30].date, "2025-05-31");
    }

    #[test]
    fn profit_percentage_guards_zero_revenue() {
        assert_eq!(profit_percentage(0.0, 150.0), 0.0);
        assert_eq!(profit_percentage(200.0, 50.0), 75.0);
        assert_eq!(profit_percentage(100.0, 150.0), -50.0);
    }
}
