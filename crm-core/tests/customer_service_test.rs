use crm::auth::Actor;
use crm::database::migrations::Migrator;
use crm::services::{CustomerInput, CustomerService};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::json;

/// Create an in-memory SQLite database for testing
async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

fn customer(first: &str, email: &str, tags: &[&str]) -> CustomerInput {
    CustomerInput {
        first_name: Some(first.to_string()),
        primary_email: Some(email.to_string()),
        tag_ids: Some(tags.iter().map(|t| t.to_string()).collect()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_merge_unions_relations_and_deletes_sources() {
    let db = setup_test_db().await.unwrap();
    let service = CustomerService::new(db);
    let actor = Actor::user("u1");

    let a = service
        .create_customer(customer("Ann", "ann@a.io", &["t1", "t2"]), &actor)
        .await
        .unwrap();
    let b = service
        .create_customer(
            CustomerInput {
                custom_fields_data: json!({"size": "M"}).as_object().cloned(),
                ..customer("Anne", "anne@b.io", &["t2", "t3"])
            },
            &actor,
        )
        .await
        .unwrap();
    service
        .update_companies(&a.id, vec!["c1".to_string()])
        .await
        .unwrap();
    service
        .update_companies(&b.id, vec!["c1".to_string(), "c2".to_string()])
        .await
        .unwrap();

    let ids = vec![a.id.clone(), b.id.clone()];
    let outcome = service
        .merge_customers(
            &ids,
            CustomerInput {
                first_name: Some("Annie".to_string()),
                primary_email: Some("ann@a.io".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let merged = outcome.customer;
    assert_eq!(merged.first_name.as_deref(), Some("Annie"));
    assert_eq!(merged.tag_ids(), vec!["t1", "t2", "t3"]);
    assert_eq!(merged.company_ids(), vec!["c1", "c2"]);
    assert_eq!(merged.emails(), vec!["ann@a.io", "anne@b.io"]);
    assert_eq!(merged.merged_ids(), ids);
    assert_eq!(merged.owner_id.as_deref(), Some("u1"));
    assert!(merged.custom_fields_data.contains("size"));

    assert_eq!(outcome.engage_change.new_customer_id, merged.id);
    assert_eq!(outcome.engage_change.customer_ids, ids);

    assert!(service.get_customer(&a.id).await.unwrap_err().is_not_found());
    assert!(service.get_customer(&b.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_merge_rejects_conflicts_and_missing_sources() {
    let db = setup_test_db().await.unwrap();
    let service = CustomerService::new(db);
    let actor = Actor::system();

    let a = service
        .create_customer(customer("Ann", "ann@a.io", &[]), &actor)
        .await
        .unwrap();
    let b = service
        .create_customer(customer("Bob", "bob@b.io", &[]), &actor)
        .await
        .unwrap();
    service
        .create_customer(customer("Cat", "cat@c.io", &[]), &actor)
        .await
        .unwrap();

    let err = service
        .merge_customers(
            &[a.id.clone(), b.id.clone()],
            customer("Ann", "cat@c.io", &[]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Duplicated email");

    let err = service
        .merge_customers(&[a.id.clone(), "fakeId".to_string()], CustomerInput::default())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Customer not found");

    let err = service
        .merge_customers(&[], CustomerInput::default())
        .await
        .unwrap_err();
    assert!(!err.is_not_found());

    // Failed merges leave the sources in place.
    assert!(service.get_customer(&a.id).await.is_ok());
    assert!(service.get_customer(&b.id).await.is_ok());
}

#[tokio::test]
async fn test_list_customers_filters_by_name() {
    let db = setup_test_db().await.unwrap();
    let service = CustomerService::new(db);
    let actor = Actor::system();

    service
        .create_customer(customer("Ann", "ann@a.io", &[]), &actor)
        .await
        .unwrap();
    service
        .create_customer(customer("Bob", "bob@b.io", &[]), &actor)
        .await
        .unwrap();

    let all = service.list_customers(None, 50).await.unwrap();
    assert_eq!(all.len(), 2);

    let found = service.list_customers(Some("bob"), 50).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name.as_deref(), Some("Bob"));
}
