use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, MovementClass, ResultEngine, movement_classes, util::normalize_key};

use super::BusinessLogic;

/// A budget, when set, is a positive amount.
#[derive(Clone, Copy, Debug)]
pub struct PositiveBudget;

#[async_trait]
impl BusinessLogic<MovementClass> for PositiveBudget {
    async fn run(&self, _db: &DatabaseTransaction, class: &MovementClass) -> ResultEngine<()> {
        if let Some(budget) = class.budget
            && budget <= 0
        {
            return Err(EngineError::Validation(format!(
                "budget of movement class '{}' must be > 0",
                class.name
            )));
        }
        Ok(())
    }
}

/// Names are unique among classes of the same type.
#[derive(Clone, Copy, Debug)]
pub struct UniqueMovementClassName;

#[async_trait]
impl BusinessLogic<MovementClass> for UniqueMovementClassName {
    async fn run(&self, db: &DatabaseTransaction, class: &MovementClass) -> ResultEngine<()> {
        let key = normalize_key(&class.name);
        let clash = movement_classes::Entity::find()
            .filter(movement_classes::Column::Id.ne(class.id))
            .filter(movement_classes::Column::ClassType.eq(class.class_type.as_str()))
            .all(db)
            .await?
            .into_iter()
            .any(|other| normalize_key(&other.name) == key);
        if clash {
            return Err(EngineError::ExistingKey(class.name.clone()));
        }
        Ok(())
    }
}
