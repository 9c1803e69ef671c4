//! Per-weekday meal preferences, persisted under a single storage key in the
//! same JSON shape the app has always written, so existing installs keep
//! their settings.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::menu::Diet;
use super::store::KvStore;

pub const PREFERENCES_KEY: &str = "meal-preferences";
pub const THEME_KEY: &str = "theme";

pub const DEFAULT_LUNCH_TIME: &str = "12:00 PM";
pub const DEFAULT_DINNER_TIME: &str = "7:00 PM";

const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPreference {
    pub day: String,
    pub veg_non_veg: Diet,
    pub lunch_time: String,
    pub dinner_time: String,
}

pub fn defaults() -> Vec<DayPreference> {
    DAYS.iter()
        .map(|day| DayPreference {
            day: day.to_string(),
            veg_non_veg: Diet::NonVeg,
            lunch_time: DEFAULT_LUNCH_TIME.to_string(),
            dinner_time: DEFAULT_DINNER_TIME.to_string(),
        })
        .collect()
}

/// Loads the saved preference list, seeding the store with defaults on first
/// run. Corrupt or missing data falls back to defaults rather than erroring:
/// the settings screen must always come up.
pub async fn load(store: &dyn KvStore) -> Vec<DayPreference> {
    match store.get(PREFERENCES_KEY).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "saved preferences unreadable, using defaults");
                defaults()
            }
        },
        Ok(None) => {
            let prefs = defaults();
            if let Err(err) = save(store, &prefs).await {
                warn!(%err, "could not seed default preferences");
            }
            prefs
        }
        Err(err) => {
            warn!(%err, "preference storage unavailable, using defaults");
            defaults()
        }
    }
}

pub async fn save(store: &dyn KvStore, prefs: &[DayPreference]) -> anyhow::Result<()> {
    let raw = serde_json::to_string(prefs)?;
    store.set(PREFERENCES_KEY, &raw).await
}

pub async fn for_day(store: &dyn KvStore, day: &str) -> Option<DayPreference> {
    load(store).await.into_iter().find(|p| p.day == day)
}

/// Applies `apply` to the matching day's preference and persists the full
/// list. Returns the updated list.
pub async fn update_for_day(
    store: &dyn KvStore,
    day: &str,
    apply: impl FnOnce(&mut DayPreference),
) -> anyhow::Result<Vec<DayPreference>> {
    let mut prefs = load(store).await;
    if let Some(pref) = prefs.iter_mut().find(|p| p.day == day) {
        apply(pref);
    }
    save(store, &prefs).await?;
    Ok(prefs)
}

pub async fn load_theme(store: &dyn KvStore) -> String {
    match store.get(THEME_KEY).await {
        Ok(Some(theme)) => theme,
        Ok(None) => "system".to_string(),
        Err(err) => {
            warn!(%err, "theme storage unavailable, using system theme");
            "system".to_string()
        }
    }
}

pub async fn save_theme(store: &dyn KvStore, theme: &str) -> anyhow::Result<()> {
    store.set(THEME_KEY, theme).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::store::MemoryStore;

    #[test]
    fn defaults_cover_the_whole_week() {
        let prefs = defaults();
        assert_eq!(prefs.len(), 7);
        assert!(prefs
            .iter()
            .all(|p| p.veg_non_veg == Diet::NonVeg
                && p.lunch_time == "12:00 PM"
                && p.dinner_time == "7:00 PM"));
        assert_eq!(prefs[0].day, "Monday");
        assert_eq!(prefs[6].day, "Sunday");
    }

    #[test]
    fn preference_json_keeps_app_field_names() {
        let pref = &defaults()[0];
        let json = serde_json::to_value(pref).unwrap();
        assert_eq!(json["vegNonVeg"], "non-veg");
        assert_eq!(json["lunchTime"], "12:00 PM");
        assert_eq!(json["dinnerTime"], "7:00 PM");
    }

    #[tokio::test]
    async fn first_load_seeds_the_store() {
        let store = MemoryStore::new();
        let prefs = load(&store).await;
        assert_eq!(prefs.len(), 7);
        assert!(store.get(PREFERENCES_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_persists_and_round_trips() {
        let store = MemoryStore::new();
        let updated = update_for_day(&store, "Wednesday", |p| {
            p.veg_non_veg = Diet::Veg;
            p.lunch_time = "1:00 PM".to_string();
        })
        .await
        .unwrap();

        let wednesday = updated.iter().find(|p| p.day == "Wednesday").unwrap();
        assert_eq!(wednesday.veg_non_veg, Diet::Veg);
        assert_eq!(wednesday.lunch_time, "1:00 PM");

        let reloaded = for_day(&store, "Wednesday").await.unwrap();
        assert_eq!(reloaded, *wednesday);
        // Other days untouched
        let monday = for_day(&store, "Monday").await.unwrap();
        assert_eq!(monday.veg_non_veg, Diet::NonVeg);
    }

    #[tokio::test]
    async fn corrupt_preferences_fall_back_to_defaults() {
        let store = MemoryStore::new();
        store.set(PREFERENCES_KEY, "{broken").await.unwrap();
        let prefs = load(&store).await;
        assert_eq!(prefs, defaults());
    }

    #[tokio::test]
    async fn theme_defaults_to_system() {
        let store = MemoryStore::new();
        assert_eq!(load_theme(&store).await, "system");
        save_theme(&store, "dark").await.unwrap();
        assert_eq!(load_theme(&store).await, "dark");
    }
}
