use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ReasonType, ResultEngine, Wallet, WalletBalance, WalletBalanceBuilder,
    repository::DefaultRepository, validators::Phase, wallet_balances, wallets,
};

use super::{Engine, normalize_wallet, with_tx};

impl Engine {
    /// Return a wallet snapshot from DB, `None` if it does not exist.
    pub async fn wallet(&self, wallet_id: Uuid) -> ResultEngine<Option<Wallet>> {
        with_tx!(self, |db_tx| self.find_wallet(&db_tx, wallet_id).await)
    }

    /// Wallets whose name, bank or description contain `filter`, ignoring
    /// case. `active` restricts the result to active or inactive wallets.
    pub async fn find_wallets(
        &self,
        filter: Option<&str>,
        active: Option<bool>,
    ) -> ResultEngine<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            let models = wallets::Entity::find_by_state(active).all(&db_tx).await?;
            wallets::Entity::find_by_filter(models, filter)
                .into_iter()
                .map(Wallet::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Persist a new wallet.
    ///
    /// `wallet.balance` is the opening balance. The wallet is stored with a 0
    /// balance and the opening balance is then applied as an `Adjustment`, so
    /// a new wallet always owns exactly one ledger row.
    pub async fn save_wallet(&self, wallet: Wallet) -> ResultEngine<Wallet> {
        let mut wallet = normalize_wallet(wallet);
        with_tx!(self, |db_tx| {
            self.rules
                .wallets
                .run(Phase::Saving, &db_tx, &wallet)
                .await?;

            let opening_balance = wallet.balance;
            wallet.balance = 0;
            wallet.version = 0;
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;

            let builder = WalletBalanceBuilder::to(wallet)
                .value(opening_balance)
                .with_reason(ReasonType::Adjustment);
            let (wallet, _) = self.update_wallet_balance(&db_tx, builder).await?;

            tracing::info!(wallet_id = %wallet.id, "created wallet '{}'", wallet.name);
            Ok(wallet)
        })
    }

    /// Update the metadata of a wallet.
    ///
    /// `balance` and `version` of the given wallet are ignored: the balance
    /// only moves through the ledger.
    pub async fn update_wallet(&self, wallet: Wallet) -> ResultEngine<Wallet> {
        let wallet = normalize_wallet(wallet);
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet.id).await?;
            self.rules
                .wallets
                .run(Phase::Updating, &db_tx, &wallet)
                .await?;

            let active = wallets::ActiveModel {
                id: ActiveValue::Set(wallet.id),
                name: ActiveValue::Set(wallet.name.clone()),
                wallet_type: ActiveValue::Set(wallet.wallet_type.as_str().to_string()),
                bank: ActiveValue::Set(wallet.bank.clone()),
                agency: ActiveValue::Set(wallet.agency.clone()),
                account: ActiveValue::Set(wallet.account.clone()),
                description: ActiveValue::Set(wallet.description.clone()),
                active: ActiveValue::Set(wallet.active),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Wallet::try_from(model)
        })
    }

    /// Delete a wallet together with its ledger.
    ///
    /// Ledger rows go first: none may outlive its wallet.
    pub async fn delete_wallet(&self, wallet_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id).await?;

            let ledger = wallet_balances::Entity::delete_many()
                .filter(wallet_balances::Column::WalletId.eq(wallet_id))
                .exec(&db_tx)
                .await?;
            wallets::Entity::delete_by_id(wallet_id)
                .exec(&db_tx)
                .await?;

            tracing::info!(%wallet_id, ledger_rows = ledger.rows_affected, "deleted wallet");
            Ok(())
        })
    }

    /// Move the balance of a wallet by `value` with an `Adjustment` ledger row.
    pub async fn adjust_balance(
        &self,
        wallet_id: Uuid,
        value: i64,
        observations: &str,
    ) -> ResultEngine<WalletBalance> {
        with_tx!(self, |db_tx| {
            let wallet = self.require_wallet(&db_tx, wallet_id).await?;
            let builder = WalletBalanceBuilder::to(wallet)
                .value(value)
                .with_reason(ReasonType::Adjustment)
                .with_observations(observations);
            let (_, row) = self.update_wallet_balance(&db_tx, builder).await?;
            Ok(row)
        })
    }

    pub(super) async fn find_wallet(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
    ) -> ResultEngine<Option<Wallet>> {
        wallets::Entity::find_by_id(wallet_id)
            .one(db_tx)
            .await?
            .map(Wallet::try_from)
            .transpose()
    }

    pub(super) async fn require_wallet(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
    ) -> ResultEngine<Wallet> {
        self.find_wallet(db_tx, wallet_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
    }
}
