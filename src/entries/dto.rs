use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::pricing::{self, ExtraItems, MealCategory};

/// One meal-consumption record, as stored and as returned to the admin
/// panel. `user_name` is only populated by queries that join the customer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyLog {
    pub log_id: i64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(with = "crate::dates::iso_date")]
    pub log_date: Date,
    pub meal_type: String,
    pub has_main_meal: bool,
    pub is_special: bool,
    pub special_dish_name: String,
    pub extra_rice_qty: i32,
    pub extra_roti_qty: i32,
    pub extra_chicken_qty: i32,
    pub extra_fish_qty: i32,
    pub extra_egg_qty: i32,
    pub extra_vegetable_qty: i32,
    pub total_cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub user_id: i64,
    #[serde(with = "crate::dates::iso_date")]
    pub log_date: Date,
    pub meal_type: String,
    pub has_main_meal: bool,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub special_dish_name: String,
    #[serde(default)]
    pub extra_rice_qty: u32,
    #[serde(default)]
    pub extra_roti_qty: u32,
    #[serde(default)]
    pub extra_chicken_qty: u32,
    #[serde(default)]
    pub extra_fish_qty: u32,
    #[serde(default)]
    pub extra_egg_qty: u32,
    #[serde(default)]
    pub extra_vegetable_qty: u32,
}

impl EntryRequest {
    pub fn category(&self) -> MealCategory {
        MealCategory::from_flags(self.has_main_meal, self.is_special)
    }

    pub fn extras(&self) -> ExtraItems {
        ExtraItems {
            rice: self.extra_rice_qty,
            roti: self.extra_roti_qty,
            chicken: self.extra_chicken_qty,
            fish: self.extra_fish_qty,
            egg: self.extra_egg_qty,
            vegetable: self.extra_vegetable_qty,
        }
    }

    /// Server-side cost; whatever the client previewed is ignored.
    pub fn cost(&self) -> f64 {
        pricing::total_cost(self.category(), &self.extras())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn base_request() -> EntryRequest {
        EntryRequest {
            user_id: 1,
            log_date: date!(2025 - 06 - 02),
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
        }
    }

    #[test]
    fn cost_of_standard_meal_with_extras() {
        let mut req = base_request();
        req.extra_rice_qty = 2;
        req.extra_roti_qty = 1;
        assert_eq!(req.cost(), 76.5);
    }

    #[test]
    fn cost_of_special_meal() {
        let mut req = base_request();
        req.is_special = true;
        req.special_dish_name = "Hilsa Curry".into();
        assert_eq!(req.cost(), 120.0);
    }

    #[test]
    fn cost_without_main_meal_is_extras_only() {
        let mut req = base_request();
        req.has_main_meal = false;
        req.extra_roti_qty = 3;
        req.extra_egg_qty = 1;
        assert_eq!(req.cost(), 22.0);
    }

    #[test]
    fn negative_extras_fail_deserialization() {
        let err = serde_json::from_str::<EntryRequest>(
            r#"{"user_id":1,"log_date":"2025-06-02","meal_type":"lunch",
                "has_main_meal":true,"extra_rice_qty":-1}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("extra_rice_qty") || err.is_data());
    }

    #[test]
    fn daily_log_serializes_date_as_iso() {
        let log = DailyLog {
            log_id: 5,
            user_id: 1,
            user_name: None,
            log_date: date!(2025 - 06 - 02),
            meal_type: "dinner".into(),
            has_main_meal: true,
            is_special: false,
            special_dish_name: String::new(),
            extra_rice_qty: 0,
            extra_roti_qty: 0,
            extra_chicken_qty: 0,
            extra_fish_qty: 0,
            extra_egg_qty: 0,
            extra_vegetable_qty: 0,
            total_cost: 52.5,
        };
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"2025-06-02\""));
        assert!(!json.contains("user_name"));
    }
}
