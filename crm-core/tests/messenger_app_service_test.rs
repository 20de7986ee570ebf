use crm::database::entities::messenger_apps::MessengerAppKind;
use crm::database::migrations::Migrator;
use crm::services::{MessengerAppInput, MessengerAppService};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::json;

/// Create an in-memory SQLite database for testing
async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::test]
async fn test_messenger_app_lifecycle() {
    let db = setup_test_db().await.unwrap();
    let service = MessengerAppService::new(db);

    let err = service.get_app("fakeId").await.unwrap_err();
    assert_eq!(err.message(), "Messenger app not found");

    let meet = service
        .create_app(MessengerAppInput {
            kind: MessengerAppKind::GoogleMeet,
            name: "Meet".to_string(),
            credentials: json!({"token": "abc"}).as_object().cloned().unwrap(),
        })
        .await
        .unwrap();
    service
        .create_app(MessengerAppInput {
            kind: MessengerAppKind::Lead,
            name: "Lead form".to_string(),
            credentials: Default::default(),
        })
        .await
        .unwrap();

    assert_eq!(meet.kind, "googleMeet");
    assert_eq!(service.list_apps(None).await.unwrap().len(), 2);
    assert_eq!(
        service
            .list_apps(Some(MessengerAppKind::Lead))
            .await
            .unwrap()
            .len(),
        1
    );

    let renamed = service
        .update_app(&meet.id, Some("Meetings".to_string()), None)
        .await
        .unwrap();
    assert_eq!(renamed.name, "Meetings");
    assert_eq!(
        MessengerAppService::credentials(&renamed).get("token"),
        Some(&json!("abc"))
    );

    service.remove_app(&meet.id).await.unwrap();
    assert!(service.get_app(&meet.id).await.unwrap_err().is_not_found());
}
