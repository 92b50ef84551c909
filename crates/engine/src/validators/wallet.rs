use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, Wallet, util::normalize_key, wallets};

use super::BusinessLogic;

/// Wallet names are unique, ignoring case.
#[derive(Clone, Copy, Debug)]
pub struct UniqueWalletName;

#[async_trait]
impl BusinessLogic<Wallet> for UniqueWalletName {
    async fn run(&self, db: &DatabaseTransaction, wallet: &Wallet) -> ResultEngine<()> {
        let key = normalize_key(&wallet.name);
        let clash = wallets::Entity::find()
            .filter(wallets::Column::Id.ne(wallet.id))
            .all(db)
            .await?
            .into_iter()
            .any(|other| normalize_key(&other.name) == key);
        if clash {
            return Err(EngineError::ExistingKey(wallet.name.clone()));
        }
        Ok(())
    }
}
