//! Movement classes: the categories incomes and expenses are filed under.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementClassType {
    Income,
    Expense,
}

impl MovementClassType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for MovementClassType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid movement class type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementClass {
    pub id: Uuid,
    pub name: String,
    pub class_type: MovementClassType,
    /// Monthly budget in minor units, if any.
    pub budget: Option<i64>,
    pub description: Option<String>,
    pub active: bool,
}

impl MovementClass {
    pub fn new(name: impl Into<String>, class_type: MovementClassType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            class_type,
            budget: None,
            description: None,
            active: true,
        }
    }

    pub fn with_budget(mut self, budget: i64) -> Self {
        self.budget = Some(budget);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movement_classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub class_type: String,
    pub budget: Option<i64>,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&MovementClass> for ActiveModel {
    fn from(value: &MovementClass) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            class_type: ActiveValue::Set(value.class_type.as_str().to_string()),
            budget: ActiveValue::Set(value.budget),
            description: ActiveValue::Set(value.description.clone()),
            active: ActiveValue::Set(value.active),
        }
    }
}

impl TryFrom<Model> for MovementClass {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            name: model.name,
            class_type: MovementClassType::try_from(model.class_type.as_str())?,
            budget: model.budget,
            description: model.description,
            active: model.active,
        })
    }
}
