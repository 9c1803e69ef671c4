use serde::{Deserialize, Serialize};
use time::Date;

use crate::entries::dto::DailyLog;
use crate::users::repo::UserWithBalance;

#[derive(Debug, Deserialize)]
pub struct BillParams {
    pub user_id: i64,
    #[serde(with = "crate::dates::iso_date")]
    pub start_date: Date,
    #[serde(with = "crate::dates::iso_date")]
    pub end_date: Date,
}

/// Read-only aggregation of one customer's period: logs, what they spent,
/// what they recharged, and the balance at the edges of the window.
#[derive(Debug, Serialize)]
pub struct BillReport {
    pub user: UserWithBalance,
    #[serde(with = "crate::dates::iso_date")]
    pub start_date: Date,
    #[serde(with = "crate::dates::iso_date")]
    pub end_date: Date,
    pub logs: Vec<DailyLog>,
    pub total_spent: f64,
    pub total_recharges: f64,
    pub opening_balance: f64,
    pub closing_balance: f64,
}

/// Builds the report from the period's own figures. The closing balance is
/// derived, not read live, so `closing == opening - spent + recharges`
/// holds for every report regardless of activity outside the window.
pub fn assemble(
    user: UserWithBalance,
    start_date: Date,
    end_date: Date,
    logs: Vec<DailyLog>,
    opening_balance: f64,
    total_recharges: f64,
) -> BillReport {
    let total_spent: f64 = logs.iter().map(|l| l.total_cost).sum();
    let closing_balance = opening_balance - total_spent + total_recharges;
    BillReport {
        user,
        start_date,
        end_date,
        logs,
        total_spent,
        total_recharges,
        opening_balance,
        closing_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn user() -> UserWithBalance {
        UserWithBalance {
            user_id: 3,
            name: "Test Customer".into(),
            mobile_no: "9876543210".into(),
            building_no: "B2".into(),
            room_no: "104".into(),
            role: "normal".into(),
            plan: "monthly".into(),
            balance: 500.0,
        }
    }

    fn log(cost: f64, day: Date) -> DailyLog {
        DailyLog {
            log_id: 0,
            user_id: 3,
            user_name: None,
            log_date: day,
            meal_type: "lunch".into(),
            has_main_meal: true,
            is_special: false,
            special_dish_name: String::new(),
            extra_rice_qty: 0,
            extra_roti_qty: 0,
            extra_chicken_qty: 0,
            extra_fish_qty: 0,
            extra_egg_qty: 0,
            extra_vegetable_qty: 0,
            total_cost: cost,
        }
    }

    #[test]
    fn sums_logs_and_derives_closing() {
        let start = date!(2025 - 05 - 01);
        let end = date!(2025 - 05 - 31);
        let logs = vec![log(52.5, start), log(76.5, start), log(120.0, end)];
        let report = assemble(user(), start, end, logs, 300.0, 500.0);

        assert_eq!(report.total_spent, 249.0);
        assert_eq!(report.closing_balance, 300.0 - 249.0 + 500.0);
    }

    #[test]
    fn balance_identity_holds() {
        let start = date!(2025 - 05 - 01);
        let end = date!(2025 - 05 - 31);
        let logs = vec![log(52.5, start), log(62.5, start)];
        let report = assemble(user(), start, end, logs, -40.0, 200.0);

        assert_eq!(
            report.closing_balance,
            report.opening_balance - report.total_spent + report.total_recharges
        );
    }

    #[test]
    fn empty_period_keeps_opening_plus_recharges() {
        let start = date!(2025 - 05 - 01);
        let end = date!(2025 - 05 - 31);
        let report = assemble(user(), start, end, vec![], 100.0, 0.0);

        assert_eq!(report.total_spent, 0.0);
        assert_eq!(report.closing_balance, 100.0);
    }
}
