//! Contacts and their telephones.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, telephones, telephones::Telephone};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    /// A natural person.
    #[default]
    Personal,
    /// A company.
    Legal,
}

impl ContactType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Legal => "legal",
        }
    }
}

impl TryFrom<&str> for ContactType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "personal" => Ok(Self::Personal),
            "legal" => Ok(Self::Legal),
            other => Err(EngineError::Validation(format!(
                "invalid contact type: {other}"
            ))),
        }
    }
}

/// Someone money is paid to or received from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    /// Tax document (CPF/CNPJ, VAT number, ...).
    pub document: Option<String>,
    pub contact_type: ContactType,
    pub description: Option<String>,
    pub active: bool,
    pub telephones: Vec<Telephone>,
}

impl Contact {
    pub fn new(name: impl Into<String>, contact_type: ContactType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            document: None,
            contact_type,
            description: None,
            active: true,
            telephones: Vec::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_telephone(mut self, telephone: Telephone) -> Self {
        self.telephones.push(telephone);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub document: Option<String>,
    pub contact_type: String,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::telephones::Entity")]
    Telephones,
}

impl Related<super::telephones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Telephones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Contact> for ActiveModel {
    fn from(value: &Contact) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            email: ActiveValue::Set(value.email.clone()),
            document: ActiveValue::Set(value.document.clone()),
            contact_type: ActiveValue::Set(value.contact_type.as_str().to_string()),
            description: ActiveValue::Set(value.description.clone()),
            active: ActiveValue::Set(value.active),
        }
    }
}

impl TryFrom<(Model, Vec<telephones::Model>)> for Contact {
    type Error = EngineError;

    fn try_from((model, phones): (Model, Vec<telephones::Model>)) -> ResultEngine<Self> {
        let telephones = phones
            .into_iter()
            .map(Telephone::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            document: model.document,
            contact_type: ContactType::try_from(model.contact_type.as_str())?,
            description: model.description,
            active: model.active,
            telephones,
        })
    }
}
