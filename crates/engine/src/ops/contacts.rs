use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Contact, EngineError, ResultEngine, contacts, repository::DefaultRepository, telephones,
    validators::Phase,
};

use super::{Engine, normalize_contact, with_tx};

impl Engine {
    /// Return a contact with its telephones, `None` if it does not exist.
    pub async fn contact(&self, contact_id: Uuid) -> ResultEngine<Option<Contact>> {
        with_tx!(self, |db_tx| self.find_contact(&db_tx, contact_id).await)
    }

    /// Contacts whose name, email or document contain `filter`, ignoring
    /// case. Telephones are not loaded.
    pub async fn find_contacts(
        &self,
        filter: Option<&str>,
        active: Option<bool>,
    ) -> ResultEngine<Vec<Contact>> {
        with_tx!(self, |db_tx| {
            let models = contacts::Entity::find_by_state(active).all(&db_tx).await?;
            contacts::Entity::find_by_filter(models, filter)
                .into_iter()
                .map(|model| Contact::try_from((model, Vec::new())))
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn save_contact(&self, contact: Contact) -> ResultEngine<Contact> {
        let contact = normalize_contact(contact);
        with_tx!(self, |db_tx| {
            self.rules
                .contacts
                .run(Phase::Saving, &db_tx, &contact)
                .await?;

            contacts::ActiveModel::from(&contact).insert(&db_tx).await?;
            self.insert_telephones(&db_tx, &contact).await?;
            Ok(contact)
        })
    }

    /// Update a contact. Its telephones are replaced by the given ones.
    pub async fn update_contact(&self, contact: Contact) -> ResultEngine<Contact> {
        let contact = normalize_contact(contact);
        with_tx!(self, |db_tx| {
            self.require_contact(&db_tx, contact.id).await?;
            self.rules
                .contacts
                .run(Phase::Updating, &db_tx, &contact)
                .await?;

            contacts::ActiveModel::from(&contact).update(&db_tx).await?;
            telephones::Entity::delete_many()
                .filter(telephones::Column::ContactId.eq(contact.id))
                .exec(&db_tx)
                .await?;
            self.insert_telephones(&db_tx, &contact).await?;
            Ok(contact)
        })
    }

    pub async fn delete_contact(&self, contact_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_contact(&db_tx, contact_id).await?;
            telephones::Entity::delete_many()
                .filter(telephones::Column::ContactId.eq(contact_id))
                .exec(&db_tx)
                .await?;
            contacts::Entity::delete_by_id(contact_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn find_contact(
        &self,
        db_tx: &DatabaseTransaction,
        contact_id: Uuid,
    ) -> ResultEngine<Option<Contact>> {
        contacts::Entity::find_by_id(contact_id)
            .find_with_related(telephones::Entity)
            .all(db_tx)
            .await?
            .into_iter()
            .next()
            .map(Contact::try_from)
            .transpose()
    }

    async fn require_contact(
        &self,
        db_tx: &DatabaseTransaction,
        contact_id: Uuid,
    ) -> ResultEngine<()> {
        contacts::Entity::find_by_id(contact_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("contact not exists".to_string()))?;
        Ok(())
    }

    async fn insert_telephones(
        &self,
        db_tx: &DatabaseTransaction,
        contact: &Contact,
    ) -> ResultEngine<()> {
        for telephone in &contact.telephones {
            telephone.active_model(contact.id).insert(db_tx).await?;
        }
        Ok(())
    }
}
