use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{Contact, EngineError, ResultEngine, contacts, util::normalize_key};

use super::BusinessLogic;

/// When present, the email must look like `local@domain`.
#[derive(Clone, Copy, Debug)]
pub struct ValidContactEmail;

#[async_trait]
impl BusinessLogic<Contact> for ValidContactEmail {
    async fn run(&self, _db: &DatabaseTransaction, contact: &Contact) -> ResultEngine<()> {
        let Some(email) = contact.email.as_deref() else {
            return Ok(());
        };
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(EngineError::Validation(format!(
                "invalid email for contact '{}': {email}",
                contact.name
            )));
        }
        Ok(())
    }
}

/// Two contacts cannot share the same document.
#[derive(Clone, Copy, Debug)]
pub struct UniqueContactDocument;

#[async_trait]
impl BusinessLogic<Contact> for UniqueContactDocument {
    async fn run(&self, db: &DatabaseTransaction, contact: &Contact) -> ResultEngine<()> {
        let Some(document) = contact.document.as_deref() else {
            return Ok(());
        };
        let key = normalize_key(document);
        let clash = contacts::Entity::find()
            .filter(contacts::Column::Id.ne(contact.id))
            .filter(contacts::Column::Document.is_not_null())
            .all(db)
            .await?
            .into_iter()
            .filter_map(|other| other.document)
            .any(|other| normalize_key(&other) == key);
        if clash {
            return Err(EngineError::ExistingKey(document.to_string()));
        }
        Ok(())
    }
}
