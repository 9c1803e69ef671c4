pub mod app;
pub mod auth;
pub mod config;
pub mod dates;
pub mod device;
pub mod entries;
pub mod expenses;
pub mod pricing;
pub mod reports;
pub mod state;
pub mod stats;
pub mod users;
pub mod wallet;
