//! Wallet ledger.
//!
//! A [`WalletBalance`] is a single, immutable change of a wallet balance. The
//! sum of the `movement_value` of every row of a wallet is its balance; the
//! `balance` stored on the wallet is only a projection of it.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Why a wallet balance changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonType {
    /// Manual correction, also used for the opening balance.
    Adjustment,
    /// Money moved between two wallets.
    Transference,
    /// Money left the wallet to pay something.
    Payment,
    /// Money entered the wallet.
    Revenue,
}

impl ReasonType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adjustment => "adjustment",
            Self::Transference => "transference",
            Self::Payment => "payment",
            Self::Revenue => "revenue",
        }
    }
}

impl TryFrom<&str> for ReasonType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "adjustment" => Ok(Self::Adjustment),
            "transference" => Ok(Self::Transference),
            "payment" => Ok(Self::Payment),
            "revenue" => Ok(Self::Revenue),
            other => Err(EngineError::Validation(format!(
                "invalid reason type: {other}"
            ))),
        }
    }
}

/// Direction of a ledger movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceType {
    Credit,
    Debit,
}

impl BalanceType {
    /// Zero movements count as credits.
    pub fn of(movement_value: i64) -> Self {
        if movement_value < 0 {
            Self::Debit
        } else {
            Self::Credit
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl TryFrom<&str> for BalanceType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(EngineError::Validation(format!(
                "invalid balance type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub old_balance: i64,
    pub actual_balance: i64,
    /// Signed delta, in minor units.
    pub movement_value: i64,
    pub balance_type: BalanceType,
    pub reason: ReasonType,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wallet_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub old_balance: i64,
    pub actual_balance: i64,
    pub movement_value: i64,
    pub balance_type: String,
    pub reason: String,
    pub observations: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&WalletBalance> for ActiveModel {
    fn from(value: &WalletBalance) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            wallet_id: ActiveValue::Set(value.wallet_id),
            old_balance: ActiveValue::Set(value.old_balance),
            actual_balance: ActiveValue::Set(value.actual_balance),
            movement_value: ActiveValue::Set(value.movement_value),
            balance_type: ActiveValue::Set(value.balance_type.as_str().to_string()),
            reason: ActiveValue::Set(value.reason.as_str().to_string()),
            observations: ActiveValue::Set(value.observations.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for WalletBalance {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            wallet_id: model.wallet_id,
            old_balance: model.old_balance,
            actual_balance: model.actual_balance,
            movement_value: model.movement_value,
            balance_type: BalanceType::try_from(model.balance_type.as_str())?,
            reason: ReasonType::try_from(model.reason.as_str())?,
            observations: model.observations,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_type_follows_sign() {
        assert_eq!(BalanceType::of(100), BalanceType::Credit);
        assert_eq!(BalanceType::of(0), BalanceType::Credit);
        assert_eq!(BalanceType::of(-1), BalanceType::Debit);
    }

    #[test]
    fn reason_type_parses_its_own_labels() {
        for reason in [
            ReasonType::Adjustment,
            ReasonType::Transference,
            ReasonType::Payment,
            ReasonType::Revenue,
        ] {
            assert_eq!(ReasonType::try_from(reason.as_str()).unwrap(), reason);
        }
        assert!(ReasonType::try_from("refund").is_err());
    }
}
