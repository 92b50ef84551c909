//! Telephones owned by a contact.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelephoneType {
    #[default]
    Mobile,
    Residential,
    Commercial,
}

impl TelephoneType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Residential => "residential",
            Self::Commercial => "commercial",
        }
    }
}

impl TryFrom<&str> for TelephoneType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "mobile" => Ok(Self::Mobile),
            "residential" => Ok(Self::Residential),
            "commercial" => Ok(Self::Commercial),
            other => Err(EngineError::Validation(format!(
                "invalid telephone type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telephone {
    pub id: Uuid,
    pub number: String,
    pub telephone_type: TelephoneType,
}

impl Telephone {
    pub fn new(number: impl Into<String>, telephone_type: TelephoneType) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            telephone_type,
        }
    }

    pub(crate) fn active_model(&self, contact_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id),
            contact_id: ActiveValue::Set(contact_id),
            number: ActiveValue::Set(self.number.clone()),
            telephone_type: ActiveValue::Set(self.telephone_type.as_str().to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "telephones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contact_id: Uuid,
    pub number: String,
    pub telephone_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contacts::Entity",
        from = "Column::ContactId",
        to = "super::contacts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Contacts,
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Telephone {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            number: model.number,
            telephone_type: TelephoneType::try_from(model.telephone_type.as_str())?,
        })
    }
}
