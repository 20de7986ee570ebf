use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crm::auth::{actions, Actor, PermissionAuthorizer};
use crm::database::migrations::Migrator;
use crm::engages::{EngageCustomerChange, EngagesApi, EngagesError};
use crm::errors::CoreErrorKind;
use crm::services::{CustomerInput, NewUser, ProductInput};
use crm::AppContext;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;

/// Create an in-memory SQLite database for testing
async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

#[derive(Default)]
struct RecordingEngages {
    changes: Mutex<Vec<EngageCustomerChange>>,
    fail: bool,
}

#[async_trait]
impl EngagesApi for RecordingEngages {
    async fn list(&self) -> Result<Value, EngagesError> {
        Ok(Value::Array(Vec::new()))
    }

    async fn send(&self, params: Value) -> Result<Value, EngagesError> {
        Ok(params)
    }

    async fn change_customer(&self, change: &EngageCustomerChange) -> Result<(), EngagesError> {
        if self.fail {
            return Err(EngagesError::Status {
                status: 503,
                body: String::new(),
            });
        }
        self.changes.lock().unwrap().push(change.clone());
        Ok(())
    }
}

async fn setup_app(engages: Arc<RecordingEngages>) -> AppContext {
    let db = setup_test_db().await.unwrap();
    AppContext::with_authorizer(db, engages, Arc::new(PermissionAuthorizer::new()))
}

fn named(first: &str) -> CustomerInput {
    CustomerInput {
        first_name: Some(first.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_mutations_require_login_and_permission() {
    let app = setup_app(Arc::default()).await;

    let err = app
        .customers_add(&Actor::anonymous(), named("Ann"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::Unauthorized);
    assert_eq!(err.message(), "Login required");

    let clerk = Actor::user("clerk").with_action(actions::CUSTOMERS_EDIT);
    let err = app.customers_add(&clerk, named("Ann")).await.unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::Forbidden);
    assert_eq!(err.message(), "Permission required");

    // Nothing reached the store.
    let listed = app
        .list_customers(&Actor::system(), None, 10)
        .await
        .unwrap();
    assert!(listed.is_empty());

    let sales = Actor::user("sales").with_action(actions::CUSTOMERS_ADD);
    assert!(app.customers_add(&sales, named("Ann")).await.is_ok());
}

#[tokio::test]
async fn test_stored_user_actions_drive_permissions() {
    let app = setup_app(Arc::default()).await;
    let admin = Actor::system();

    let user = app
        .users_add(
            &admin,
            NewUser {
                username: "sales".into(),
                email: "sales@example.com".into(),
                actions: vec![actions::SHOW_PRODUCTS.to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let actor = app.actor_for_user(&user.id).await.unwrap();
    assert!(app.list_products(&actor, None).await.is_ok());
    assert_eq!(
        app.product_categories_remove(&actor, "any").await.unwrap_err().kind(),
        CoreErrorKind::Forbidden
    );

    app.users_set_actions(&admin, &user.id, vec![actions::MANAGE_PRODUCTS.to_string()])
        .await
        .unwrap();
    let actor = app.actor_for_user(&user.id).await.unwrap();
    assert!(app
        .product_categories_remove(&actor, "any")
        .await
        .unwrap_err()
        .is_not_found());

    let current = app.current_user(&actor).await.unwrap().unwrap();
    assert_eq!(current.username, "sales");
}

#[tokio::test]
async fn test_customers_remove_logs_existing_only() {
    let app = setup_app(Arc::default()).await;
    let actor = Actor::owner("boss");

    let a = app.customers_add(&actor, named("Ann")).await.unwrap();
    let b = app.customers_add(&actor, named("Bob")).await.unwrap();

    let ids = vec![a.id.clone(), "fakeId".to_string(), b.id.clone()];
    let removed = app.customers_remove(&actor, ids.clone()).await.unwrap();
    assert_eq!(removed, ids);

    for id in [&a.id, &b.id] {
        let logs = app.activity_logs(&actor, id).await.unwrap();
        let actions: Vec<&str> = logs.iter().map(|log| log.action.as_str()).collect();
        assert_eq!(actions, vec!["create", "delete"]);
        assert_eq!(logs[1].log_type, "customer");
        assert_eq!(logs[1].created_by.as_deref(), Some("boss"));
        assert!(logs[1].description.ends_with(" has been deleted"));
    }
    assert!(app.activity_logs(&actor, "fakeId").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_logs_prior_state() {
    let app = setup_app(Arc::default()).await;
    let actor = Actor::owner("boss");

    let ann = app.customers_add(&actor, named("Ann")).await.unwrap();
    app.customers_edit(&actor, &ann.id, named("Anna")).await.unwrap();

    let logs = app.activity_logs(&actor, &ann.id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].action, "update");
    assert_eq!(logs[1].description, "Ann has been updated");
    assert!(logs[1].object.contains("\"Ann\""));
    assert!(logs[1].new_data.as_deref().unwrap_or_default().contains("Anna"));
}

#[tokio::test]
async fn test_merge_forwards_change_to_engages() {
    let engages = Arc::new(RecordingEngages::default());
    let app = setup_app(engages.clone()).await;
    let actor = Actor::owner("boss");

    let a = app.customers_add(&actor, named("Ann")).await.unwrap();
    let b = app.customers_add(&actor, named("Bob")).await.unwrap();

    let merged = app
        .customers_merge(&actor, vec![a.id.clone(), b.id.clone()], named("Ann Bob"))
        .await
        .unwrap();

    let changes = engages.changes.lock().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].new_customer_id, merged.id);
    assert_eq!(changes[0].customer_ids, vec![a.id, b.id]);
}

#[tokio::test]
async fn test_merge_surfaces_engages_failure() {
    let engages = Arc::new(RecordingEngages {
        fail: true,
        ..Default::default()
    });
    let app = setup_app(engages).await;
    let actor = Actor::owner("boss");

    let a = app.customers_add(&actor, named("Ann")).await.unwrap();
    let err = app
        .customers_merge(&actor, vec![a.id], named("Ann"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::Unavailable);
}

#[tokio::test]
async fn test_products_remove_logs_existing_and_surfaces_store_errors() {
    let app = setup_app(Arc::default()).await;
    let actor = Actor::owner("boss");

    let runner = app
        .products_add(
            &actor,
            ProductInput {
                name: "Runner".to_string(),
                code: "P1".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let removed = app
        .products_remove(&actor, vec![runner.id.clone(), "fakeId".to_string()])
        .await
        .unwrap();
    assert!(removed);

    let logs = app.activity_logs(&actor, &runner.id).await.unwrap();
    let descriptions: Vec<&str> = logs.iter().map(|log| log.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Runner has been created", "Runner has been deleted"]);
    assert!(app.activity_logs(&actor, "fakeId").await.unwrap().is_empty());

    app.db()
        .execute_unprepared("DROP TABLE products")
        .await
        .unwrap();
    let err = app
        .products_remove(&actor, vec![runner.id])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::Internal);
}
