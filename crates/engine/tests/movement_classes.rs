use sea_orm::Database;

use engine::{Engine, EngineError, MovementClass, MovementClassType};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn save_and_load_movement_class() {
    let engine = engine().await;

    let saved = engine
        .save_movement_class(
            MovementClass::new("Groceries", MovementClassType::Expense).with_budget(40_000),
        )
        .await
        .unwrap();

    let loaded = engine.movement_class(saved.id).await.unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.budget, Some(40_000));
    assert!(engine.movement_class(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn budget_must_be_positive() {
    let engine = engine().await;

    for budget in [0, -100] {
        let err = engine
            .save_movement_class(
                MovementClass::new("Fuel", MovementClassType::Expense).with_budget(budget),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}

#[tokio::test]
async fn names_are_unique_per_class_type() {
    let engine = engine().await;
    engine
        .save_movement_class(MovementClass::new("Rent", MovementClassType::Expense))
        .await
        .unwrap();

    // Same name on the other side of the ledger is fine.
    engine
        .save_movement_class(MovementClass::new("Rent", MovementClassType::Income))
        .await
        .unwrap();

    let err = engine
        .save_movement_class(MovementClass::new("RENT", MovementClassType::Expense))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn update_and_delete_movement_class() {
    let engine = engine().await;
    let mut class = engine
        .save_movement_class(MovementClass::new("Salary", MovementClassType::Income))
        .await
        .unwrap();

    class.description = Some("  monthly  ".to_string());
    class.active = false;
    let updated = engine.update_movement_class(class.clone()).await.unwrap();
    assert_eq!(updated.description.as_deref(), Some("monthly"));
    assert!(!updated.active);

    let inactive = engine.find_movement_classes(None, Some(false)).await.unwrap();
    assert_eq!(inactive.len(), 1);
    let found = engine.find_movement_classes(Some("month"), None).await.unwrap();
    assert_eq!(found.len(), 1);

    engine.delete_movement_class(class.id).await.unwrap();
    assert!(engine.movement_class(class.id).await.unwrap().is_none());

    let err = engine.delete_movement_class(class.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.update_movement_class(class).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
