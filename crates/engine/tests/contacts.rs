use sea_orm::{Database, DatabaseConnection, EntityTrait};

use engine::{Contact, ContactType, Engine, EngineError, Telephone, TelephoneType, telephones};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn ana() -> Contact {
    Contact::new("Ana Souza", ContactType::Personal)
        .with_email("ana@example.com")
        .with_document("123.456.789-00")
        .with_telephone(Telephone::new("555-0101", TelephoneType::Mobile))
        .with_telephone(Telephone::new("555-0102", TelephoneType::Residential))
}

#[tokio::test]
async fn contact_is_loaded_with_its_telephones() {
    let (engine, _db) = engine_with_db().await;

    let saved = engine.save_contact(ana()).await.unwrap();
    let loaded = engine.contact(saved.id).await.unwrap().unwrap();

    assert_eq!(loaded.name, "Ana Souza");
    assert_eq!(loaded.email.as_deref(), Some("ana@example.com"));
    let mut numbers = loaded
        .telephones
        .iter()
        .map(|telephone| (telephone.number.as_str(), telephone.telephone_type))
        .collect::<Vec<_>>();
    numbers.sort_by_key(|(number, _)| *number);
    assert_eq!(
        numbers,
        vec![
            ("555-0101", TelephoneType::Mobile),
            ("555-0102", TelephoneType::Residential),
        ]
    );

    assert!(engine.contact(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_replaces_telephones() {
    let (engine, db) = engine_with_db().await;
    let mut contact = engine.save_contact(ana()).await.unwrap();

    contact.name = "Ana S. Lima".to_string();
    contact.telephones = vec![Telephone::new("555-0199", TelephoneType::Commercial)];
    engine.update_contact(contact.clone()).await.unwrap();

    let loaded = engine.contact(contact.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "Ana S. Lima");
    assert_eq!(loaded.telephones.len(), 1);
    assert_eq!(loaded.telephones[0].number, "555-0199");
    assert_eq!(telephones::Entity::find().all(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_contact_removes_telephones() {
    let (engine, db) = engine_with_db().await;
    let contact = engine.save_contact(ana()).await.unwrap();

    engine.delete_contact(contact.id).await.unwrap();

    assert!(engine.contact(contact.id).await.unwrap().is_none());
    assert!(telephones::Entity::find().all(&db).await.unwrap().is_empty());

    let err = engine.delete_contact(contact.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn find_contacts_matches_name_email_or_document() {
    let (engine, _db) = engine_with_db().await;
    engine.save_contact(ana()).await.unwrap();
    engine
        .save_contact(
            Contact::new("Power Company", ContactType::Legal)
                .with_email("billing@power.example")
                .with_document("11.222.333/0001-44"),
        )
        .await
        .unwrap();

    let found = engine.find_contacts(Some("POWER"), None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].contact_type, ContactType::Legal);
    assert!(found[0].telephones.is_empty());

    let found = engine.find_contacts(Some("456.789"), None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Ana Souza");

    let found = engine.find_contacts(Some("example"), Some(true)).await.unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .save_contact(Contact::new("Bob", ContactType::Personal).with_email("bob.example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.find_contacts(None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn documents_are_unique() {
    let (engine, _db) = engine_with_db().await;
    engine.save_contact(ana()).await.unwrap();

    let err = engine
        .save_contact(
            Contact::new("Someone else", ContactType::Personal).with_document("123.456.789-00"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    // Contacts without a document never clash.
    engine
        .save_contact(Contact::new("No document", ContactType::Personal))
        .await
        .unwrap();
    engine
        .save_contact(Contact::new("No document either", ContactType::Personal))
        .await
        .unwrap();
}

#[tokio::test]
async fn find_contacts_matches_accented_names() {
    let (engine, _db) = engine_with_db().await;
    engine
        .save_contact(Contact::new("JOÃO ÇARÁ", ContactType::Personal))
        .await
        .unwrap();

    let found = engine.find_contacts(Some("joão"), None).await.unwrap();
    assert_eq!(found.len(), 1);
    let found = engine.find_contacts(Some("çará"), None).await.unwrap();
    assert_eq!(found.len(), 1);
}
