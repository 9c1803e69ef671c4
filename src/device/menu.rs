//! Weekly menu catalog and the "what is on the menu right now" decision.

use serde::{Deserialize, Serialize};
use time::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Lunch,
    Dinner,
}

impl MealSlot {
    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    #[serde(rename = "veg")]
    Veg,
    #[serde(rename = "non-veg")]
    NonVeg,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub name: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub diet: Diet,
    pub slot: MealSlot,
    pub day: &'static str,
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
        Weekday::Sunday => "Sunday",
    }
}

/// Parses a 12-hour clock string such as "12:00 PM" into minutes since
/// midnight. Returns `None` when the string is not in that shape.
pub fn parse_meal_time(raw: &str) -> Option<u16> {
    let (clock, period) = raw.trim().split_once(' ')?;
    let (hours, minutes) = clock.split_once(':')?;
    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if !(1..=12).contains(&hours) || minutes > 59 {
        return None;
    }

    let mut total = hours * 60 + minutes;
    match period {
        "PM" if hours != 12 => total += 12 * 60,
        "AM" if hours == 12 => total -= 12 * 60,
        "AM" | "PM" => {}
        _ => return None,
    }
    Some(total)
}

const DEFAULT_LUNCH_MINUTES: u16 = 12 * 60;
const DEFAULT_DINNER_MINUTES: u16 = 19 * 60;

/// Picks the slot to show for the current wall-clock minute given the user's
/// configured lunch and dinner times. Unparseable times fall back to noon and
/// 7 PM.
///
/// Note the middle branch: once lunch time has passed the dinner menu is
/// already shown, even before dinner time. That is the behavior the app has
/// always had and users may rely on it, so it is kept until product says
/// otherwise.
pub fn slot_for(now_minutes: u16, lunch_time: &str, dinner_time: &str) -> MealSlot {
    let lunch = parse_meal_time(lunch_time).unwrap_or(DEFAULT_LUNCH_MINUTES);
    let dinner = parse_meal_time(dinner_time).unwrap_or(DEFAULT_DINNER_MINUTES);

    if now_minutes >= dinner {
        MealSlot::Dinner
    } else if now_minutes >= lunch {
        MealSlot::Dinner
    } else {
        MealSlot::Lunch
    }
}

/// Catalog entries for one day, slot and diet, in catalog order.
pub fn menu_for(day: &str, slot: MealSlot, diet: Diet) -> Vec<&'static MenuItem> {
    FULL_MENU
        .iter()
        .filter(|item| item.day == day && item.slot == slot && item.diet == diet)
        .collect()
}

macro_rules! item {
    ($name:literal, $desc:literal, $price:literal, $diet:ident, $slot:ident, $day:literal) => {
        MenuItem {
            name: $name,
            description: $desc,
            price: $price,
            diet: Diet::$diet,
            slot: MealSlot::$slot,
            day: $day,
        }
    };
}

pub static FULL_MENU: &[MenuItem] = &[
    // Monday
    item!("Paneer Butter Masala", "Creamy paneer in tomato gravy", 150.0, Veg, Lunch, "Monday"),
    item!("Basmati Rice", "Fragrant basmati rice", 80.0, Veg, Lunch, "Monday"),
    item!("Butter Chicken", "Tender chicken in butter sauce", 200.0, NonVeg, Lunch, "Monday"),
    item!("Tandoori Chicken", "Grilled tandoori chicken", 220.0, NonVeg, Lunch, "Monday"),
    item!("Biryani", "Fragrant rice with meat", 250.0, NonVeg, Dinner, "Monday"),
    item!("Vegetable Biryani", "Fragrant rice with vegetables", 180.0, Veg, Dinner, "Monday"),
    item!("Dal Makhani", "Creamy black dal", 120.0, Veg, Dinner, "Monday"),
    item!("Fish Curry", "Spiced fish in coconut curry", 280.0, NonVeg, Dinner, "Monday"),
    // Tuesday
    item!("Chole Bhature", "Fried bread with chickpeas", 120.0, Veg, Lunch, "Tuesday"),
    item!("Aloo Paratha", "Potato stuffed flatbread", 100.0, Veg, Lunch, "Tuesday"),
    item!("Chicken Tikka", "Marinated and grilled chicken", 210.0, NonVeg, Lunch, "Tuesday"),
    item!("Mutton Curry", "Slow cooked mutton", 280.0, NonVeg, Lunch, "Tuesday"),
    item!("Rajma Rice", "Kidney beans with rice", 130.0, Veg, Dinner, "Tuesday"),
    item!("Prawn Biryani", "Biryani with fresh prawns", 320.0, NonVeg, Dinner, "Tuesday"),
    item!("Paneer Tikka Masala", "Paneer tikka in cream sauce", 160.0, Veg, Dinner, "Tuesday"),
    item!("Chicken Biryani", "Biryani with chicken", 260.0, NonVeg, Dinner, "Tuesday"),
    // Wednesday
    item!("Idli Sambar", "Steamed rice cake with lentil soup", 90.0, Veg, Lunch, "Wednesday"),
    item!("Dosa", "Crispy rice crepe", 110.0, Veg, Lunch, "Wednesday"),
    item!("Chicken Dosa", "Dosa with chicken filling", 180.0, NonVeg, Lunch, "Wednesday"),
    item!("Keema Dosa", "Dosa with minced meat", 200.0, NonVeg, Lunch, "Wednesday"),
    item!("Sambar Rice", "Rice with vegetable lentil soup", 100.0, Veg, Dinner, "Wednesday"),
    item!("Rasam Rice", "Rice with spicy tamarind soup", 100.0, Veg, Dinner, "Wednesday"),
    item!("Chicken Curry Rice", "Rice with chicken curry", 220.0, NonVeg, Dinner, "Wednesday"),
    item!("Egg Curry Rice", "Rice with egg curry", 150.0, NonVeg, Dinner, "Wednesday"),
    // Thursday
    item!("Chana Masala", "Spiced chickpea curry", 110.0, Veg, Lunch, "Thursday"),
    item!("Bhindi Fry", "Stir-fried okra", 100.0, Veg, Lunch, "Thursday"),
    item!("Chicken Korma", "Mild chicken in creamy sauce", 240.0, NonVeg, Lunch, "Thursday"),
    item!("Lamb Rogan Josh", "Tender lamb in aromatic sauce", 290.0, NonVeg, Lunch, "Thursday"),
    item!("Baingan Bharta", "Roasted eggplant", 120.0, Veg, Dinner, "Thursday"),
    item!("Hakka Noodles", "Chinese style noodles", 140.0, Veg, Dinner, "Thursday"),
    item!("Chicken Hakka Noodles", "Chinese noodles with chicken", 210.0, NonVeg, Dinner, "Thursday"),
    item!("Shrimp Hakka Noodles", "Chinese noodles with shrimp", 280.0, NonVeg, Dinner, "Thursday"),
    // Friday
    item!("Chikhalwali", "Sago and peanut preparation", 130.0, Veg, Lunch, "Friday"),
    item!("Falafel Wrap", "Fried chickpea fritters wrap", 140.0, Veg, Lunch, "Friday"),
    item!("Chicken Shawarma", "Marinated chicken wrap", 220.0, NonVeg, Lunch, "Friday"),
    item!("Seekh Kabab", "Minced meat kabab", 250.0, NonVeg, Lunch, "Friday"),
    item!("Vegetable Pulao", "Rice with mixed vegetables", 140.0, Veg, Dinner, "Friday"),
    item!("Malai Kofta", "Cottage cheese dumplings", 170.0, Veg, Dinner, "Friday"),
    item!("Chicken Pulao", "Rice with chicken", 230.0, NonVeg, Dinner, "Friday"),
    item!("Mutton Pulao", "Rice with mutton", 280.0, NonVeg, Dinner, "Friday"),
    // Saturday
    item!("Upma", "Semolina porridge", 80.0, Veg, Lunch, "Saturday"),
    item!("Poha", "Flattened rice breakfast", 90.0, Veg, Lunch, "Saturday"),
    item!("Chicken Lollipop", "Fried chicken drumettes", 200.0, NonVeg, Lunch, "Saturday"),
    item!("Malabar Paratha with Meat", "Layered bread with meat", 260.0, NonVeg, Lunch, "Saturday"),
    item!("Malabar Paratha", "Layered flatbread", 140.0, Veg, Dinner, "Saturday"),
    item!("Vegetable Fried Rice", "Stir-fried rice with vegetables", 150.0, Veg, Dinner, "Saturday"),
    item!("Chicken Fried Rice", "Stir-fried rice with chicken", 220.0, NonVeg, Dinner, "Saturday"),
    item!("Egg Fried Rice", "Stir-fried rice with egg", 160.0, NonVeg, Dinner, "Saturday"),
    // Sunday
    item!("Khichdi", "Rice and lentil comfort food", 100.0, Veg, Lunch, "Sunday"),
    item!("Puri Bhaji", "Fried bread with potato curry", 110.0, Veg, Lunch, "Sunday"),
    item!("Chicken Biryani", "Fragrant rice with chicken", 260.0, NonVeg, Lunch, "Sunday"),
    item!("Mutton Biryani", "Fragrant rice with mutton", 290.0, NonVeg, Lunch, "Sunday"),
    item!("Vegetable Stew", "Cooked vegetables in sauce", 120.0, Veg, Dinner, "Sunday"),
    item!("Lentil Soup", "Creamy lentil soup", 100.0, Veg, Dinner, "Sunday"),
    item!("Fish Fry", "Crispy fried fish", 280.0, NonVeg, Dinner, "Sunday"),
    item!("Crab Curry", "Fresh crab in spiced curry", 320.0, NonVeg, Dinner, "Sunday"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twelve_hour_clock() {
        assert_eq!(parse_meal_time("12:00 PM"), Some(720));
        assert_eq!(parse_meal_time("7:00 PM"), Some(1140));
        assert_eq!(parse_meal_time("12:00 AM"), Some(0));
        assert_eq!(parse_meal_time("11:59 PM"), Some(1439));
        assert_eq!(parse_meal_time("1:30 AM"), Some(90));
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(parse_meal_time("25:00 PM"), None);
        assert_eq!(parse_meal_time("7:60 PM"), None);
        assert_eq!(parse_meal_time("noonish"), None);
        assert_eq!(parse_meal_time("7:00"), None);
    }

    #[test]
    fn morning_shows_lunch() {
        // 11:00 AM with default meal times
        assert_eq!(slot_for(660, "12:00 PM", "7:00 PM"), MealSlot::Lunch);
    }

    #[test]
    fn past_lunch_time_already_shows_dinner() {
        // 1:00 PM is after lunch but well before dinner
        assert_eq!(slot_for(780, "12:00 PM", "7:00 PM"), MealSlot::Dinner);
    }

    #[test]
    fn evening_shows_dinner() {
        // 8:00 PM
        assert_eq!(slot_for(1200, "12:00 PM", "7:00 PM"), MealSlot::Dinner);
    }

    #[test]
    fn filters_by_day_slot_and_diet() {
        let items = menu_for("Monday", MealSlot::Lunch, Diet::Veg);
        let names: Vec<_> = items.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Paneer Butter Masala", "Basmati Rice"]);

        let dinner = menu_for("Sunday", MealSlot::Dinner, Diet::NonVeg);
        assert_eq!(dinner.len(), 2);
    }

    #[test]
    fn catalog_covers_every_day_slot_diet_combination() {
        for day in [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ] {
            for slot in [MealSlot::Lunch, MealSlot::Dinner] {
                for diet in [Diet::Veg, Diet::NonVeg] {
                    assert!(
                        !menu_for(day, slot, diet).is_empty(),
                        "no items for {day} {slot:?} {diet:?}"
                    );
                }
            }
        }
    }
}
