use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductCategories::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(ProductCategories::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProductCategories::Description).text())
                    .col(ColumnDef::new(ProductCategories::ParentId).string_len(32))
                    .col(ColumnDef::new(ProductCategories::Order).text().not_null())
                    .col(
                        ColumnDef::new(ProductCategories::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Category references are checked by the services, not by foreign keys,
        // so a failed check reports the domain message instead of a constraint error.
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Code).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Products::ProductType)
                            .string_len(16)
                            .not_null()
                            .default("product"),
                    )
                    .col(ColumnDef::new(Products::Description).text())
                    .col(ColumnDef::new(Products::Sku).string())
                    .col(ColumnDef::new(Products::UnitPrice).double())
                    .col(ColumnDef::new(Products::CategoryId).string_len(32))
                    .col(
                        ColumnDef::new(Products::CustomFieldsData)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_categories_parent_id")
                    .table(ProductCategories::Table)
                    .col(ProductCategories::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_category_id")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductCategories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProductCategories {
    Table,
    Id,
    Name,
    Code,
    Description,
    ParentId,
    Order,
    CreatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    Code,
    ProductType,
    Description,
    Sku,
    UnitPrice,
    CategoryId,
    CustomFieldsData,
    CreatedAt,
}
