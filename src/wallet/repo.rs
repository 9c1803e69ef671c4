use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use tracing::debug;

/// Ledger entry kinds. Every balance mutation leaves one of these behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnType {
    Recharge,
    Delivery,
    Refund,
    AdjustmentCharge,
    AdjustmentRefund,
}

impl TxnType {
    pub fn as_str(self) -> &'static str {
        match self {
            TxnType::Recharge => "recharge",
            TxnType::Delivery => "delivery",
            TxnType::Refund => "refund",
            TxnType::AdjustmentCharge => "adjustment_charge",
            TxnType::AdjustmentRefund => "adjustment_refund",
        }
    }
}

/// Maps an entry-edit cost difference to the ledger row it produces.
/// A positive diff charges the customer more, a negative one refunds.
pub fn adjustment_kind(cost_diff: f64) -> Option<(TxnType, f64)> {
    if cost_diff == 0.0 {
        None
    } else if cost_diff > 0.0 {
        Some((TxnType::AdjustmentCharge, cost_diff))
    } else {
        Some((TxnType::AdjustmentRefund, -cost_diff))
    }
}

/// Credits a recharge. The row is written as `pending_acknowledgement`
/// first and confirmed in the same transaction once the balance moved,
/// so `balance_after` always reflects the post-credit balance.
pub async fn recharge(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    amount: f64,
    reference_id: Option<&str>,
    txn_date: OffsetDateTime,
) -> anyhow::Result<f64> {
    let txn_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO wallet_transactions (user_id, txn_type, status, amount, reference_id, created_at)
        VALUES ($1, 'recharge', 'pending_acknowledgement', $2, $3, $4)
        RETURNING txn_id
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .bind(reference_id)
    .bind(txn_date)
    .fetch_one(&mut **tx)
    .await?;

    let balance: f64 = sqlx::query_scalar(
        "UPDATE wallet SET balance = balance + $1 WHERE user_id = $2 RETURNING balance",
    )
    .bind(amount)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query(
        "UPDATE wallet_transactions SET status = 'confirmed', balance_after = $1 WHERE txn_id = $2",
    )
    .bind(balance)
    .bind(txn_id)
    .execute(&mut **tx)
    .await?;

    debug!(user_id, amount, balance, "wallet recharged");
    Ok(balance)
}

/// Debits the wallet for a delivered entry. The balance may go negative;
/// irregular customers settle up later.
pub async fn debit(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    amount: f64,
) -> anyhow::Result<f64> {
    apply(tx, user_id, -amount, TxnType::Delivery, amount).await
}

/// Credits back the full cost of a deleted entry.
pub async fn refund(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    amount: f64,
) -> anyhow::Result<f64> {
    apply(tx, user_id, amount, TxnType::Refund, amount).await
}

/// Applies an entry-edit cost difference. No ledger row when nothing changed.
pub async fn adjust(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    cost_diff: f64,
) -> anyhow::Result<Option<f64>> {
    let Some((kind, amount)) = adjustment_kind(cost_diff) else {
        return Ok(None);
    };
    let balance = apply(tx, user_id, -cost_diff, kind, amount).await?;
    Ok(Some(balance))
}

async fn apply(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    balance_delta: f64,
    kind: TxnType,
    amount: f64,
) -> anyhow::Result<f64> {
    let balance: f64 = sqlx::query_scalar(
        "UPDATE wallet SET balance = balance + $1 WHERE user_id = $2 RETURNING balance",
    )
    .bind(balance_delta)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO wallet_transactions (user_id, txn_type, status, amount, balance_after)
        VALUES ($1, $2, 'confirmed', $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(amount)
    .bind(balance)
    .execute(&mut **tx)
    .await?;

    debug!(user_id, kind = kind.as_str(), amount, balance, "wallet ledger entry");
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_kind_by_sign() {
        assert_eq!(adjustment_kind(0.0), None);
        assert_eq!(
            adjustment_kind(14.0),
            Some((TxnType::AdjustmentCharge, 14.0))
        );
        assert_eq!(
            adjustment_kind(-67.5),
            Some((TxnType::AdjustmentRefund, 67.5))
        );
    }

    #[test]
    fn txn_type_wire_names() {
        assert_eq!(TxnType::Recharge.as_str(), "recharge");
        assert_eq!(TxnType::Delivery.as_str(), "delivery");
        assert_eq!(TxnType::Refund.as_str(), "refund");
        assert_eq!(TxnType::AdjustmentCharge.as_str(), "adjustment_charge");
        assert_eq!(TxnType::AdjustmentRefund.as_str(), "adjustment_refund");
    }
}
