use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, ReasonType, ResultEngine, Wallet, WalletBalance, WalletBalanceBuilder,
    wallet_balances, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Apply a pending balance change requested by another part of the
    /// system, inside the caller's transaction.
    ///
    /// Every balance mutation goes through here, so the wallet and its ledger
    /// are always written together. Returns the wallet after the change and
    /// the new ledger row.
    pub async fn on_wallet_balance_change(
        &self,
        db_tx: &DatabaseTransaction,
        builder: WalletBalanceBuilder,
    ) -> ResultEngine<(Wallet, WalletBalance)> {
        self.update_wallet_balance(db_tx, builder).await
    }

    /// [`Engine::on_wallet_balance_change`] in a transaction of its own.
    pub async fn apply_balance_change(
        &self,
        builder: WalletBalanceBuilder,
    ) -> ResultEngine<(Wallet, WalletBalance)> {
        with_tx!(self, |db_tx| self.on_wallet_balance_change(&db_tx, builder).await)
    }

    /// Move `value` from `source_id` to `target_id`.
    ///
    /// Both wallets get a `Transference` ledger row; the sum of their balances
    /// does not change.
    pub async fn transfer_between_wallets(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        value: i64,
        observations: &str,
    ) -> ResultEngine<(WalletBalance, WalletBalance)> {
        if value <= 0 {
            return Err(EngineError::InvalidAmount(
                "transfer value must be > 0".to_string(),
            ));
        }
        if source_id == target_id {
            return Err(EngineError::Validation(
                "cannot transfer to the same wallet".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let source = self.require_wallet(&db_tx, source_id).await?;
            let target = self.require_wallet(&db_tx, target_id).await?;
            for wallet in [&source, &target] {
                if !wallet.active {
                    return Err(EngineError::Validation(format!(
                        "wallet '{}' is inactive",
                        wallet.name
                    )));
                }
            }

            let debit = WalletBalanceBuilder::to(source)
                .value(-value)
                .with_reason(ReasonType::Transference)
                .with_observations(observations);
            let credit = WalletBalanceBuilder::to(target)
                .value(value)
                .with_reason(ReasonType::Transference)
                .with_observations(observations);

            let (_, debit_row) = self.on_wallet_balance_change(&db_tx, debit).await?;
            let (_, credit_row) = self.on_wallet_balance_change(&db_tx, credit).await?;
            Ok((debit_row, credit_row))
        })
    }

    /// Ledger of a wallet, oldest row first.
    pub async fn wallet_balances(&self, wallet_id: Uuid) -> ResultEngine<Vec<WalletBalance>> {
        with_tx!(self, |db_tx| {
            wallet_balances::Entity::find()
                .filter(wallet_balances::Column::WalletId.eq(wallet_id))
                .order_by_asc(wallet_balances::Column::CreatedAt)
                .order_by_asc(wallet_balances::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(WalletBalance::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Recomputes the cached balance of a wallet from its ledger.
    ///
    /// No ledger row is written: the ledger already is the truth, only the
    /// projection is repaired. Returns the recomputed balance.
    pub async fn recompute_wallet_balance(&self, wallet_id: Uuid) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            let wallet = self.require_wallet(&db_tx, wallet_id).await?;
            let rows: Vec<wallet_balances::Model> = wallet_balances::Entity::find()
                .filter(wallet_balances::Column::WalletId.eq(wallet_id))
                .all(&db_tx)
                .await?;

            let balance = rows
                .iter()
                .try_fold(0i64, |acc, row| acc.checked_add(row.movement_value))
                .ok_or_else(|| {
                    EngineError::InvalidAmount(format!(
                        "balance overflow on wallet '{}'",
                        wallet.name
                    ))
                })?;

            if balance != wallet.balance {
                tracing::warn!(
                    %wallet_id,
                    cached = wallet.balance,
                    ledger = balance,
                    "cached wallet balance drifted from ledger"
                );
                self.write_cached_balance(&db_tx, &wallet, balance).await?;
            }
            Ok(balance)
        })
    }

    /// Turn `builder` into a ledger row and persist it with the new cached
    /// balance.
    ///
    /// Only the version and the pending change are taken from the builder:
    /// the balance always starts from the stored row.
    pub(super) async fn update_wallet_balance(
        &self,
        db_tx: &DatabaseTransaction,
        builder: WalletBalanceBuilder,
    ) -> ResultEngine<(Wallet, WalletBalance)> {
        let requested = builder.wallet();
        let snapshot = self.require_wallet(db_tx, requested.id).await?;
        if snapshot.version != requested.version {
            return Err(self.stale_version(requested));
        }
        let (mut wallet, row) = builder.rebase(snapshot.clone()).build()?;

        self.write_cached_balance(db_tx, &snapshot, wallet.balance)
            .await?;
        wallet.version = snapshot.version + 1;

        wallet_balances::ActiveModel::from(&row)
            .insert(db_tx)
            .await?;

        tracing::debug!(
            wallet_id = %wallet.id,
            movement = row.movement_value,
            balance = row.actual_balance,
            reason = row.reason.as_str(),
            "wallet balance updated"
        );
        Ok((wallet, row))
    }

    /// Compare-and-swap write of the cached balance.
    ///
    /// The row is only updated if its version still is the one `snapshot` was
    /// read with; otherwise someone else moved the balance in the meantime.
    /// `balance` must come from the ledger: either the row being written with
    /// it or the sum of the stored rows.
    async fn write_cached_balance(
        &self,
        db_tx: &DatabaseTransaction,
        snapshot: &Wallet,
        balance: i64,
    ) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(wallets::Column::Balance, Expr::value(balance))
            .col_expr(wallets::Column::Version, Expr::value(snapshot.version + 1))
            .filter(wallets::Column::Id.eq(snapshot.id))
            .filter(wallets::Column::Version.eq(snapshot.version))
            .exec(db_tx)
            .await?;

        if result.rows_affected == 0 {
            if self.find_wallet(db_tx, snapshot.id).await?.is_none() {
                return Err(EngineError::KeyNotFound("wallet not exists".to_string()));
            }
            return Err(self.stale_version(snapshot));
        }
        Ok(())
    }

    fn stale_version(&self, snapshot: &Wallet) -> EngineError {
        tracing::warn!(
            wallet_id = %snapshot.id,
            version = snapshot.version,
            "stale wallet version"
        );
        EngineError::Conflict(format!(
            "wallet '{}' was changed concurrently",
            snapshot.name
        ))
    }
}
