use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, MovementClass, ResultEngine, movement_classes, repository::DefaultRepository,
    validators::Phase,
};

use super::{Engine, normalize_movement_class, with_tx};

impl Engine {
    pub async fn movement_class(&self, class_id: Uuid) -> ResultEngine<Option<MovementClass>> {
        with_tx!(self, |db_tx| {
            movement_classes::Entity::find_by_id(class_id)
                .one(&db_tx)
                .await?
                .map(MovementClass::try_from)
                .transpose()
        })
    }

    /// Movement classes whose name or description contain `filter`, ignoring
    /// case.
    pub async fn find_movement_classes(
        &self,
        filter: Option<&str>,
        active: Option<bool>,
    ) -> ResultEngine<Vec<MovementClass>> {
        with_tx!(self, |db_tx| {
            let models = movement_classes::Entity::find_by_state(active).all(&db_tx).await?;
            movement_classes::Entity::find_by_filter(models, filter)
                .into_iter()
                .map(MovementClass::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn save_movement_class(&self, class: MovementClass) -> ResultEngine<MovementClass> {
        let class = normalize_movement_class(class);
        with_tx!(self, |db_tx| {
            self.rules
                .movement_classes
                .run(Phase::Saving, &db_tx, &class)
                .await?;

            let model = movement_classes::ActiveModel::from(&class)
                .insert(&db_tx)
                .await?;
            MovementClass::try_from(model)
        })
    }

    pub async fn update_movement_class(
        &self,
        class: MovementClass,
    ) -> ResultEngine<MovementClass> {
        let class = normalize_movement_class(class);
        with_tx!(self, |db_tx| {
            self.require_movement_class(&db_tx, class.id).await?;
            self.rules
                .movement_classes
                .run(Phase::Updating, &db_tx, &class)
                .await?;

            let model = movement_classes::ActiveModel::from(&class)
                .update(&db_tx)
                .await?;
            MovementClass::try_from(model)
        })
    }

    pub async fn delete_movement_class(&self, class_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_movement_class(&db_tx, class_id).await?;
            movement_classes::Entity::delete_by_id(class_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn require_movement_class(
        &self,
        db_tx: &DatabaseTransaction,
        class_id: Uuid,
    ) -> ResultEngine<()> {
        movement_classes::Entity::find_by_id(class_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("movement class not exists".to_string()))?;
        Ok(())
    }
}
