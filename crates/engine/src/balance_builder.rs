//! Staging object for a wallet balance change.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Wallet,
    wallet_balances::{BalanceType, ReasonType, WalletBalance},
};

/// Collects everything needed to move a wallet balance and turns it into a
/// ledger row.
///
/// `build` consumes the builder, so a pending change can be applied once.
/// Other parts of the system hand a builder to
/// [`Engine::on_wallet_balance_change`](crate::Engine::on_wallet_balance_change)
/// when they need a wallet to move as a side effect.
///
/// ```rust
/// use engine::{ReasonType, Wallet, WalletBalanceBuilder, WalletType};
///
/// let wallet = Wallet::new("Checking", WalletType::BankAccount, 0);
/// let (wallet, row) = WalletBalanceBuilder::to(wallet)
///     .value(-3_000)
///     .with_reason(ReasonType::Payment)
///     .with_observations("groceries")
///     .build()
///     .unwrap();
///
/// assert_eq!(wallet.balance, -3_000);
/// assert_eq!(row.old_balance, 0);
/// assert_eq!(row.observations.as_deref(), Some("groceries"));
/// ```
#[derive(Debug, Clone)]
#[must_use = "a balance builder does nothing until it is applied"]
pub struct WalletBalanceBuilder {
    wallet: Wallet,
    value: i64,
    reason: ReasonType,
    observations: Option<String>,
}

impl WalletBalanceBuilder {
    /// Starts a zero `Adjustment` for `wallet`.
    pub fn to(wallet: Wallet) -> Self {
        Self {
            wallet,
            value: 0,
            reason: ReasonType::Adjustment,
            observations: None,
        }
    }

    /// Signed delta in minor units.
    pub fn value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    pub fn with_reason(mut self, reason: ReasonType) -> Self {
        self.reason = reason;
        self
    }

    /// Blank observations are dropped.
    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        let observations = observations.into();
        let trimmed = observations.trim();
        self.observations = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn pending_value(&self) -> i64 {
        self.value
    }

    /// Replaces the wallet the change applies to, keeping the pending change.
    pub(crate) fn rebase(mut self, wallet: Wallet) -> Self {
        self.wallet = wallet;
        self
    }

    /// Applies the delta to the wallet and produces the matching ledger row.
    pub fn build(self) -> ResultEngine<(Wallet, WalletBalance)> {
        let mut wallet = self.wallet;
        let old_balance = wallet.balance;
        let actual_balance = old_balance.checked_add(self.value).ok_or_else(|| {
            EngineError::InvalidAmount(format!("balance overflow on wallet '{}'", wallet.name))
        })?;
        wallet.balance = actual_balance;

        let row = WalletBalance {
            id: Uuid::now_v7(),
            wallet_id: wallet.id,
            old_balance,
            actual_balance,
            movement_value: self.value,
            balance_type: BalanceType::of(self.value),
            reason: self.reason,
            observations: self.observations,
            created_at: Utc::now(),
        };

        Ok((wallet, row))
    }
}

#[cfg(test)]
mod tests {
    use crate::WalletType;

    use super::*;

    fn wallet(balance: i64) -> Wallet {
        Wallet::new("Checking", WalletType::BankAccount, balance)
    }

    #[test]
    fn build_moves_balance_and_records_row() {
        let (wallet, row) = WalletBalanceBuilder::to(wallet(10_000))
            .value(-3_000)
            .with_observations("groceries")
            .build()
            .unwrap();

        assert_eq!(wallet.balance, 7_000);
        assert_eq!(row.wallet_id, wallet.id);
        assert_eq!(row.old_balance, 10_000);
        assert_eq!(row.actual_balance, 7_000);
        assert_eq!(row.movement_value, -3_000);
        assert_eq!(row.balance_type, BalanceType::Debit);
        assert_eq!(row.reason, ReasonType::Adjustment);
    }

    #[test]
    fn defaults_to_zero_adjustment() {
        let (wallet, row) = WalletBalanceBuilder::to(wallet(500)).build().unwrap();

        assert_eq!(wallet.balance, 500);
        assert_eq!(row.movement_value, 0);
        assert_eq!(row.balance_type, BalanceType::Credit);
        assert!(row.observations.is_none());
    }

    #[test]
    fn blank_observations_are_dropped() {
        let builder = WalletBalanceBuilder::to(wallet(0)).with_observations("   ");
        let (_, row) = builder.build().unwrap();
        assert!(row.observations.is_none());
    }

    #[test]
    fn overflow_is_rejected() {
        let err = WalletBalanceBuilder::to(wallet(i64::MAX))
            .value(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}
