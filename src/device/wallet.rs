//! Simulated prepaid wallet held on the device: a balance, a newest-first
//! transaction feed, a delivery pause switch and the scheduled-delivery
//! processor that debits the wallet when a meal goes out.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use super::menu::MealSlot;
use super::store::KvStore;

pub const BALANCE_KEY: &str = "wallet-balance";
pub const TRANSACTIONS_KEY: &str = "wallet-transactions";
pub const DELIVERY_ACTIVE_KEY: &str = "delivery-active";
pub const SCHEDULES_KEY: &str = "delivery-schedules";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Credit,
    Debit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TxnKind,
    pub amount: f64,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySchedule {
    pub id: String,
    pub day: String,
    pub meal_type: MealSlot,
    pub item_price: f64,
    pub item_name: String,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Balance could not cover the item. The wallet is left untouched and
    /// the schedule is marked failed.
    Failed,
    /// Deliveries are paused, nothing happened.
    Skipped,
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("no schedule with id {0}")]
    UnknownSchedule(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub struct Wallet<S: KvStore> {
    store: S,
    balance: f64,
    delivery_active: bool,
    transactions: Vec<Transaction>,
    schedules: Vec<DeliverySchedule>,
}

impl<S: KvStore> Wallet<S> {
    /// Loads wallet state from the store. Missing keys get their defaults
    /// (zero balance, deliveries active, empty feeds); unreadable values are
    /// logged and treated as missing so the wallet screen always opens.
    pub async fn load(store: S) -> Result<Self, WalletError> {
        let balance = read_or_default(&store, BALANCE_KEY, 0.0, |raw| raw.parse().ok()).await?;
        let transactions = read_or_default(&store, TRANSACTIONS_KEY, Vec::new(), |raw| {
            serde_json::from_str(raw).ok()
        })
        .await?;
        let delivery_active = read_or_default(&store, DELIVERY_ACTIVE_KEY, true, |raw| {
            serde_json::from_str(raw).ok()
        })
        .await?;
        let schedules = read_or_default(&store, SCHEDULES_KEY, Vec::new(), |raw| {
            serde_json::from_str(raw).ok()
        })
        .await?;

        Ok(Self {
            store,
            balance,
            delivery_active,
            transactions,
            schedules,
        })
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn delivery_active(&self) -> bool {
        self.delivery_active
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn schedules(&self) -> &[DeliverySchedule] {
        &self.schedules
    }

    pub async fn set_schedules(
        &mut self,
        schedules: Vec<DeliverySchedule>,
    ) -> Result<(), WalletError> {
        self.schedules = schedules;
        self.save_schedules().await
    }

    pub async fn set_delivery_active(&mut self, active: bool) -> Result<(), WalletError> {
        self.delivery_active = active;
        self.store
            .set(DELIVERY_ACTIVE_KEY, if active { "true" } else { "false" })
            .await?;
        Ok(())
    }

    /// Tops up the balance and records a credit at the head of the feed.
    pub async fn add_money(&mut self, amount: f64) -> Result<(), WalletError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(WalletError::InvalidAmount);
        }

        self.balance += amount;
        self.transactions.insert(
            0,
            Transaction {
                id: Uuid::new_v4(),
                kind: TxnKind::Credit,
                amount,
                description: "Money added to wallet".to_string(),
                timestamp: OffsetDateTime::now_utc(),
            },
        );
        self.save_wallet().await
    }

    /// Settles one scheduled delivery against the wallet.
    ///
    /// Paused deliveries are skipped outright. When the balance cannot cover
    /// the item the schedule is marked failed and the balance and feed are
    /// left exactly as they were; otherwise the item price is debited, a
    /// debit lands at the head of the feed and the schedule is marked
    /// delivered.
    pub async fn process_delivery(
        &mut self,
        schedule_id: &str,
    ) -> Result<DeliveryOutcome, WalletError> {
        let schedule = self
            .schedules
            .iter()
            .find(|s| s.id == schedule_id)
            .cloned()
            .ok_or_else(|| WalletError::UnknownSchedule(schedule_id.to_string()))?;

        if !self.delivery_active {
            debug!(item = %schedule.item_name, "deliveries paused, skipping");
            return Ok(DeliveryOutcome::Skipped);
        }

        if self.balance < schedule.item_price {
            warn!(
                item = %schedule.item_name,
                required = schedule.item_price,
                available = self.balance,
                "insufficient balance, delivery failed"
            );
            self.mark_schedule(schedule_id, DeliveryStatus::Failed);
            self.save_schedules().await?;
            return Ok(DeliveryOutcome::Failed);
        }

        self.balance -= schedule.item_price;
        self.transactions.insert(
            0,
            Transaction {
                id: Uuid::new_v4(),
                kind: TxnKind::Debit,
                amount: schedule.item_price,
                description: format!(
                    "{} - {} ({})",
                    schedule.meal_type.label(),
                    schedule.item_name,
                    schedule.day
                ),
                timestamp: OffsetDateTime::now_utc(),
            },
        );
        self.mark_schedule(schedule_id, DeliveryStatus::Delivered);

        self.save_schedules().await?;
        self.save_wallet().await?;
        Ok(DeliveryOutcome::Delivered)
    }

    fn mark_schedule(&mut self, schedule_id: &str, status: DeliveryStatus) {
        if let Some(s) = self.schedules.iter_mut().find(|s| s.id == schedule_id) {
            s.status = status;
        }
    }

    async fn save_wallet(&self) -> Result<(), WalletError> {
        self.store.set(BALANCE_KEY, &self.balance.to_string()).await?;
        let feed = serde_json::to_string(&self.transactions).map_err(anyhow::Error::from)?;
        self.store.set(TRANSACTIONS_KEY, &feed).await?;
        Ok(())
    }

    async fn save_schedules(&self) -> Result<(), WalletError> {
        let raw = serde_json::to_string(&self.schedules).map_err(anyhow::Error::from)?;
        self.store.set(SCHEDULES_KEY, &raw).await?;
        Ok(())
    }
}

async fn read_or_default<S: KvStore, T>(
    store: &S,
    key: &str,
    default: T,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, WalletError> {
    match store.get(key).await? {
        Some(raw) => Ok(parse(&raw).unwrap_or_else(|| {
            warn!(key, "stored value unreadable, using default");
            default
        })),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::store::MemoryStore;

    fn schedule(id: &str, slot: MealSlot, price: f64, name: &str) -> DeliverySchedule {
        DeliverySchedule {
            id: id.to_string(),
            day: "Monday".to_string(),
            meal_type: slot,
            item_price: price,
            item_name: name.to_string(),
            status: DeliveryStatus::Pending,
        }
    }

    #[tokio::test]
    async fn fresh_wallet_has_defaults() {
        let wallet = Wallet::load(MemoryStore::new()).await.unwrap();
        assert_eq!(wallet.balance(), 0.0);
        assert!(wallet.delivery_active());
        assert!(wallet.transactions().is_empty());
        assert!(wallet.schedules().is_empty());
    }

    #[tokio::test]
    async fn add_money_credits_the_feed() {
        let mut wallet = Wallet::load(MemoryStore::new()).await.unwrap();
        wallet.add_money(250.0).await.unwrap();

        assert_eq!(wallet.balance(), 250.0);
        assert_eq!(wallet.transactions().len(), 1);
        let txn = &wallet.transactions()[0];
        assert_eq!(txn.kind, TxnKind::Credit);
        assert_eq!(txn.amount, 250.0);
        assert_eq!(txn.description, "Money added to wallet");
    }

    #[tokio::test]
    async fn add_money_rejects_bad_amounts() {
        let mut wallet = Wallet::load(MemoryStore::new()).await.unwrap();
        assert!(matches!(
            wallet.add_money(0.0).await,
            Err(WalletError::InvalidAmount)
        ));
        assert!(matches!(
            wallet.add_money(-5.0).await,
            Err(WalletError::InvalidAmount)
        ));
        assert!(matches!(
            wallet.add_money(f64::NAN).await,
            Err(WalletError::InvalidAmount)
        ));
        assert_eq!(wallet.balance(), 0.0);
    }

    #[tokio::test]
    async fn insufficient_balance_fails_and_keeps_the_wallet_untouched() {
        let mut wallet = Wallet::load(MemoryStore::new()).await.unwrap();
        wallet.add_money(100.0).await.unwrap();
        wallet
            .set_schedules(vec![schedule("1", MealSlot::Lunch, 150.0, "Paneer Butter Masala")])
            .await
            .unwrap();

        let outcome = wallet.process_delivery("1").await.unwrap();

        assert_eq!(outcome, DeliveryOutcome::Failed);
        assert_eq!(wallet.balance(), 100.0);
        assert_eq!(wallet.transactions().len(), 1); // only the credit
        assert_eq!(wallet.schedules()[0].status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn covered_delivery_debits_and_marks_delivered() {
        let mut wallet = Wallet::load(MemoryStore::new()).await.unwrap();
        wallet.add_money(200.0).await.unwrap();
        wallet
            .set_schedules(vec![schedule("1", MealSlot::Lunch, 150.0, "Paneer Butter Masala")])
            .await
            .unwrap();

        let outcome = wallet.process_delivery("1").await.unwrap();

        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(wallet.balance(), 50.0);
        assert_eq!(wallet.schedules()[0].status, DeliveryStatus::Delivered);

        let debit = &wallet.transactions()[0];
        assert_eq!(debit.kind, TxnKind::Debit);
        assert_eq!(debit.amount, 150.0);
        assert_eq!(debit.description, "Lunch - Paneer Butter Masala (Monday)");
    }

    #[tokio::test]
    async fn paused_deliveries_are_skipped() {
        let mut wallet = Wallet::load(MemoryStore::new()).await.unwrap();
        wallet.add_money(500.0).await.unwrap();
        wallet
            .set_schedules(vec![schedule("1", MealSlot::Dinner, 200.0, "Biryani")])
            .await
            .unwrap();
        wallet.set_delivery_active(false).await.unwrap();

        let outcome = wallet.process_delivery("1").await.unwrap();

        assert_eq!(outcome, DeliveryOutcome::Skipped);
        assert_eq!(wallet.balance(), 500.0);
        assert_eq!(wallet.schedules()[0].status, DeliveryStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_schedule_is_an_error() {
        let mut wallet = Wallet::load(MemoryStore::new()).await.unwrap();
        assert!(matches!(
            wallet.process_delivery("nope").await,
            Err(WalletError::UnknownSchedule(_))
        ));
    }

    #[tokio::test]
    async fn state_survives_a_reload() {
        let store = MemoryStore::new();
        {
            let mut wallet = Wallet::load(&store).await.unwrap();
            wallet.add_money(300.0).await.unwrap();
            wallet
                .set_schedules(vec![schedule("1", MealSlot::Dinner, 200.0, "Biryani")])
                .await
                .unwrap();
            wallet.process_delivery("1").await.unwrap();
        }

        let reloaded = Wallet::load(&store).await.unwrap();
        assert_eq!(reloaded.balance(), 100.0);
        assert_eq!(reloaded.transactions().len(), 2);
        assert_eq!(reloaded.schedules()[0].status, DeliveryStatus::Delivered);
    }

    #[tokio::test]
    async fn corrupt_stored_values_fall_back_to_defaults() {
        let store = MemoryStore::new();
        store.set(BALANCE_KEY, "not-a-number").await.unwrap();
        store.set(TRANSACTIONS_KEY, "{broken").await.unwrap();

        let wallet = Wallet::load(&store).await.unwrap();
        assert_eq!(wallet.balance(), 0.0);
        assert!(wallet.transactions().is_empty());
    }
}
