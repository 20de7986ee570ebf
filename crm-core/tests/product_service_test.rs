use crm::database::entities::product_categories;
use crm::database::migrations::Migrator;
use crm::errors::CoreErrorKind;
use crm::services::{
    DealProductLineInput, DealService, ProductCategoryInput, ProductCategoryService,
    ProductCategoryUpdate, ProductInput, ProductService, ProductUpdate,
};
use sea_orm::{Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use serde_json::json;

/// Create an in-memory SQLite database for testing
async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

fn category(name: &str, code: &str, parent_id: Option<&str>) -> ProductCategoryInput {
    ProductCategoryInput {
        name: name.to_string(),
        code: code.to_string(),
        description: None,
        parent_id: parent_id.map(str::to_string),
    }
}

fn product(name: &str, code: &str) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        code: code.to_string(),
        ..Default::default()
    }
}

fn line(product_id: &str) -> DealProductLineInput {
    DealProductLineInput {
        product_id: product_id.to_string(),
        quantity: 1,
        unit_price: Some(10.0),
    }
}

#[tokio::test]
async fn test_lookups_of_missing_records_fail() {
    let db = setup_test_db().await.unwrap();

    let err = ProductService::new(db.clone())
        .get_product("fakeId")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::NotFound);
    assert_eq!(err.message(), "Product not found");

    let err = ProductCategoryService::new(db)
        .get_product_category("fakeId")
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Product & service category not found");
}

#[tokio::test]
async fn test_create_product_resolves_category_code() {
    let db = setup_test_db().await.unwrap();
    let categories = ProductCategoryService::new(db.clone());
    let products = ProductService::new(db);

    let shoes = categories
        .create_product_category(category("Shoes", "SH", None))
        .await
        .unwrap();

    let created = products
        .create_product(ProductInput {
            category_code: Some("SH".to_string()),
            ..product("Runner", "P1")
        })
        .await
        .unwrap();
    assert_eq!(created.category_id.as_deref(), Some(shoes.id.as_str()));
    assert_eq!(products.count_products(&shoes.id).await.unwrap(), 1);
    assert_eq!(products.count_products("fakeId").await.unwrap(), 0);

    let err = products
        .create_product(ProductInput {
            category_code: Some("missing".to_string()),
            ..product("Walker", "P2")
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_product_code_must_be_unique() {
    let db = setup_test_db().await.unwrap();
    let products = ProductService::new(db);

    let first = products.create_product(product("A", "P1")).await.unwrap();
    let second = products.create_product(product("B", "P2")).await.unwrap();

    let err = products.create_product(product("C", "P1")).await.unwrap_err();
    assert_eq!(err.message(), "Code must be unique");

    let err = products
        .update_product(
            &second.id,
            ProductUpdate {
                code: Some("P1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::Validation);

    // Keeping its own code is allowed.
    products
        .update_product(
            &first.id,
            ProductUpdate {
                code: Some("P1".to_string()),
                name: Some("A2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_custom_fields_keeps_other_keys() {
    let db = setup_test_db().await.unwrap();
    let products = ProductService::new(db);

    let created = products
        .create_product(ProductInput {
            custom_fields_data: json!({"f1": "red", "f2": 5}).as_object().cloned(),
            ..product("Runner", "P1")
        })
        .await
        .unwrap();

    let updated = products
        .update_product(
            &created.id,
            ProductUpdate {
                custom_fields_data: json!({"f1": "blue"}).as_object().cloned(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored: serde_json::Value = serde_json::from_str(&updated.custom_fields_data).unwrap();
    assert_eq!(stored, json!({"f1": "blue", "f2": 5}));
    assert_eq!(updated.name, "Runner");
}

#[tokio::test]
async fn test_remove_products_blocked_by_deals() {
    let db = setup_test_db().await.unwrap();
    let products = ProductService::new(db.clone());
    let deals = DealService::new(db);

    let p1 = products.create_product(product("A", "P1")).await.unwrap();
    let p2 = products.create_product(product("B", "P2")).await.unwrap();

    let first = deals
        .create_deal("First deal", None, vec![line(&p1.id)])
        .await
        .unwrap();
    let second = deals
        .create_deal("Second deal", None, vec![line(&p1.id), line(&p2.id)])
        .await
        .unwrap();

    let ids = vec![p1.id.clone(), p2.id.clone()];
    let err = products.remove_products(&ids).await.unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::Validation);
    assert!(err
        .message()
        .starts_with("Can not remove products. Following deals are used "));
    assert!(err.message().contains("First deal"));
    assert!(err.message().contains("Second deal"));
    assert!(products.get_product(&p1.id).await.is_ok());

    deals.remove_deal(&first.id).await.unwrap();
    deals.update_products_data(&second.id, vec![]).await.unwrap();

    assert!(products.remove_products(&ids).await.unwrap());
    assert!(products.get_product(&p1.id).await.unwrap_err().is_not_found());
    assert!(products.get_product(&p2.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_category_parent_cannot_change() {
    let db = setup_test_db().await.unwrap();
    let categories = ProductCategoryService::new(db);

    let root = categories
        .create_product_category(category("Shoes", "SH", None))
        .await
        .unwrap();
    let other = categories
        .create_product_category(category("Hats", "HA", None))
        .await
        .unwrap();
    let child = categories
        .create_product_category(category("Boots", "BO", Some(&root.id)))
        .await
        .unwrap();
    assert_eq!(child.parent_id.as_deref(), Some(root.id.as_str()));
    assert_eq!(child.order, "ShoesSH/BootsBO");

    let err = categories
        .update_product_category(
            &child.id,
            ProductCategoryUpdate {
                parent_id: Some(other.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Cannot change category");

    // Repeating the current parent is not a change.
    categories
        .update_product_category(
            &child.id,
            ProductCategoryUpdate {
                parent_id: Some(root.id.clone()),
                description: Some("leather".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_blank_parent_keeps_root_category_editable() {
    let db = setup_test_db().await.unwrap();
    let categories = ProductCategoryService::new(db);

    let root = categories
        .create_product_category(category("Shoes", "SH", Some("")))
        .await
        .unwrap();
    assert!(root.parent_id.is_none());

    let renamed = categories
        .update_product_category(
            &root.id,
            ProductCategoryUpdate {
                name: Some("Footwear".to_string()),
                parent_id: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Footwear");
    assert!(renamed.parent_id.is_none());
    assert_eq!(renamed.order, "FootwearSH");

    // A blank parent on a nested category would move it to the root.
    let child = categories
        .create_product_category(category("Boots", "BO", Some(&root.id)))
        .await
        .unwrap();
    let err = categories
        .update_product_category(
            &child.id,
            ProductCategoryUpdate {
                parent_id: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Cannot change category");
}

#[tokio::test]
async fn test_renaming_category_rewrites_descendant_orders() {
    let db = setup_test_db().await.unwrap();
    let categories = ProductCategoryService::new(db);

    let root = categories
        .create_product_category(category("Shoes", "SH", None))
        .await
        .unwrap();
    let child = categories
        .create_product_category(category("Boots", "BO", Some(&root.id)))
        .await
        .unwrap();
    let grandchild = categories
        .create_product_category(category("Winter", "WI", Some(&child.id)))
        .await
        .unwrap();

    let renamed = categories
        .update_product_category(
            &root.id,
            ProductCategoryUpdate {
                name: Some("Footwear".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.order, "FootwearSH");

    let child = categories.get_product_category(&child.id).await.unwrap();
    let grandchild = categories.get_product_category(&grandchild.id).await.unwrap();
    assert_eq!(child.order, "FootwearSH/BootsBO");
    assert_eq!(grandchild.order, "FootwearSH/BootsBO/WinterWI");
}

#[tokio::test]
async fn test_remove_category_with_products_or_children() {
    let db = setup_test_db().await.unwrap();
    let categories = ProductCategoryService::new(db.clone());
    let products = ProductService::new(db.clone());

    let shoes = categories
        .create_product_category(category("Shoes", "SH", None))
        .await
        .unwrap();
    let runner = products
        .create_product(ProductInput {
            category_id: Some(shoes.id.clone()),
            ..product("Runner", "P1")
        })
        .await
        .unwrap();

    let err = categories.remove_product_category(&shoes.id).await.unwrap_err();
    assert_eq!(err.message(), "Can't remove a product category");

    products.remove_products(&[runner.id]).await.unwrap();
    let child = categories
        .create_product_category(category("Boots", "BO", Some(&shoes.id)))
        .await
        .unwrap();

    let err = categories.remove_product_category(&shoes.id).await.unwrap_err();
    assert_eq!(err.message(), "Can't remove a product category");

    categories.remove_product_category(&child.id).await.unwrap();
    categories.remove_product_category(&shoes.id).await.unwrap();

    let count = product_categories::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}
