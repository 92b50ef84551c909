//! The module contains `Wallet` struct and its implementation.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Kind of place where the money of a wallet is kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    #[default]
    Personal,
    BankAccount,
    Investment,
}

impl WalletType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::BankAccount => "bank_account",
            Self::Investment => "investment",
        }
    }
}

impl TryFrom<&str> for WalletType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "personal" => Ok(Self::Personal),
            "bank_account" => Ok(Self::BankAccount),
            "investment" => Ok(Self::Investment),
            other => Err(EngineError::Validation(format!(
                "invalid wallet type: {other}"
            ))),
        }
    }
}

/// A wallet.
///
/// A wallet is a representation of a real wallet, a bank account or anything
/// else where money are kept.
///
/// `balance` is a cached projection of the wallet ledger (see
/// [`WalletBalance`](crate::WalletBalance)): it only changes together with a
/// new ledger row, through [`WalletBalanceBuilder`](crate::WalletBalanceBuilder).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub name: String,
    pub wallet_type: WalletType,
    pub bank: Option<String>,
    pub agency: Option<String>,
    pub account: Option<String>,
    pub description: Option<String>,
    /// Balance in minor units.
    pub balance: i64,
    pub active: bool,
    /// Optimistic lock, bumped on every balance write.
    pub version: i64,
}

impl Wallet {
    /// Creates a new, not yet persisted, wallet.
    ///
    /// `balance` is the initial balance: saving the wallet turns it into the
    /// first ledger row.
    pub fn new(name: impl Into<String>, wallet_type: WalletType, balance: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            wallet_type,
            bank: None,
            agency: None,
            account: None,
            description: None,
            balance,
            active: true,
            version: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_bank_account(
        mut self,
        bank: impl Into<String>,
        agency: impl Into<String>,
        account: impl Into<String>,
    ) -> Self {
        self.bank = Some(bank.into());
        self.agency = Some(agency.into());
        self.account = Some(account.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub wallet_type: String,
    pub bank: Option<String>,
    pub agency: Option<String>,
    pub account: Option<String>,
    pub description: Option<String>,
    pub balance: i64,
    pub active: bool,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wallet_balances::Entity")]
    WalletBalances,
}

impl Related<super::wallet_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WalletBalances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            wallet_type: ActiveValue::Set(value.wallet_type.as_str().to_string()),
            bank: ActiveValue::Set(value.bank.clone()),
            agency: ActiveValue::Set(value.agency.clone()),
            account: ActiveValue::Set(value.account.clone()),
            description: ActiveValue::Set(value.description.clone()),
            balance: ActiveValue::Set(value.balance),
            active: ActiveValue::Set(value.active),
            version: ActiveValue::Set(value.version),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            name: model.name,
            wallet_type: WalletType::try_from(model.wallet_type.as_str())?,
            bank: model.bank,
            agency: model.agency,
            account: model.account,
            description: model.description,
            balance: model.balance,
            active: model.active,
            version: model.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wallet_is_active_and_unversioned() {
        let wallet = Wallet::new("Checking", WalletType::BankAccount, 10_000)
            .with_bank_account("Bank", "0001", "12345-6");

        assert!(wallet.active);
        assert_eq!(wallet.version, 0);
        assert_eq!(wallet.balance, 10_000);
        assert_eq!(wallet.agency.as_deref(), Some("0001"));
    }

    #[test]
    fn model_round_trip_keeps_wallet_type() {
        let wallet = Wallet::new("Savings", WalletType::Investment, 0);
        let active: ActiveModel = (&wallet).into();
        let model = Model {
            id: wallet.id,
            name: wallet.name.clone(),
            wallet_type: active.wallet_type.unwrap(),
            bank: None,
            agency: None,
            account: None,
            description: None,
            balance: 0,
            active: true,
            version: 0,
        };

        assert_eq!(Wallet::try_from(model).unwrap(), wallet);
    }

    #[test]
    fn unknown_wallet_type_is_rejected() {
        assert!(WalletType::try_from("credit_card").is_err());
    }
}
