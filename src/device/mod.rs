//! On-device domain core of the customer app: a simulated prepaid wallet,
//! per-day meal preferences and the menu-of-the-moment decision, all
//! persisted through a small key-value capability so the host platform's
//! storage can be swapped in.

pub mod menu;
pub mod prefs;
pub mod store;
pub mod wallet;
