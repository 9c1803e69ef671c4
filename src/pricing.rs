use serde::{Deserialize, Serialize};

pub const STANDARD_MEAL_PRICE: f64 = 52.5;
pub const SPECIAL_MEAL_PRICE: f64 = 120.0;
pub const RICE_PRICE_PER_PLATE: f64 = 10.0;
pub const ROTI_PRICE_PER_PIECE: f64 = 4.0;
pub const CHICKEN_PRICE_PER_PIECE: f64 = 30.0;
pub const FISH_PRICE_PER_PIECE: f64 = 20.0;
pub const EGG_PRICE_PER_PIECE: f64 = 10.0;
pub const VEGETABLE_PRICE_PER_PORTION: f64 = 15.0;

/// Main-meal pricing tier. `None` is the a-la-carte case: no main meal
/// billed, only extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Standard,
    Special,
    None,
}

impl MealCategory {
    /// The wire format stores the category as two flags; `is_special` is
    /// meaningless when no main meal was taken.
    pub fn from_flags(has_main_meal: bool, is_special: bool) -> Self {
        match (has_main_meal, is_special) {
            (false, _) => MealCategory::None,
            (true, false) => MealCategory::Standard,
            (true, true) => MealCategory::Special,
        }
    }

    pub fn base_price(self) -> f64 {
        match self {
            MealCategory::Standard => STANDARD_MEAL_PRICE,
            MealCategory::Special => SPECIAL_MEAL_PRICE,
            MealCategory::None => 0.0,
        }
    }
}

/// Per-entry side-item quantities. Quantities are unsigned on purpose: the
/// clients clamp decrements at zero and the server never accepts negatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraItems {
    #[serde(default)]
    pub rice: u32,
    #[serde(default)]
    pub roti: u32,
    #[serde(default)]
    pub chicken: u32,
    #[serde(default)]
    pub fish: u32,
    #[serde(default)]
    pub egg: u32,
    #[serde(default)]
    pub vegetable: u32,
}

impl ExtraItems {
    pub fn subtotal(&self) -> f64 {
        f64::from(self.rice) * RICE_PRICE_PER_PLATE
            + f64::from(self.roti) * ROTI_PRICE_PER_PIECE
            + f64::from(self.chicken) * CHICKEN_PRICE_PER_PIECE
            + f64::from(self.fish) * FISH_PRICE_PER_PIECE
            + f64::from(self.egg) * EGG_PRICE_PER_PIECE
            + f64::from(self.vegetable) * VEGETABLE_PRICE_PER_PORTION
    }
}

/// Total cost of one daily entry: base meal price plus extras. This is the
/// authoritative calculation; values sent by clients are previews only.
pub fn total_cost(category: MealCategory, extras: &ExtraItems) -> f64 {
    category.base_price() + extras.subtotal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_meal_with_rice_and_roti() {
        let extras = ExtraItems {
            rice: 2,
            roti: 1,
            ..Default::default()
        };
        assert_eq!(total_cost(MealCategory::Standard, &extras), 76.5);
    }

    #[test]
    fn special_meal_base_only() {
        assert_eq!(
            total_cost(MealCategory::Special, &ExtraItems::default()),
            120.0
        );
    }

    #[test]
    fn a_la_carte_charges_extras_only() {
        let extras = ExtraItems {
            chicken: 1,
            egg: 2,
            vegetable: 1,
            ..Default::default()
        };
        assert_eq!(total_cost(MealCategory::None, &extras), 65.0);
    }

    #[test]
    fn zero_everything_costs_nothing() {
        assert_eq!(total_cost(MealCategory::None, &ExtraItems::default()), 0.0);
    }

    #[test]
    fn all_extra_kinds_priced_independently() {
        let extras = ExtraItems {
            rice: 1,
            roti: 1,
            chicken: 1,
            fish: 1,
            egg: 1,
            vegetable: 1,
        };
        assert_eq!(extras.subtotal(), 10.0 + 4.0 + 30.0 + 20.0 + 10.0 + 15.0);
    }

    #[test]
    fn category_from_flags() {
        assert_eq!(MealCategory::from_flags(true, false), MealCategory::Standard);
        assert_eq!(MealCategory::from_flags(true, true), MealCategory::Special);
        assert_eq!(MealCategory::from_flags(false, false), MealCategory::None);
        // is_special without a main meal still bills nothing for the meal
        assert_eq!(MealCategory::from_flags(false, true), MealCategory::None);
    }
}
