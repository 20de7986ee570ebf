use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::FirstName).string())
                    .col(ColumnDef::new(Customers::LastName).string())
                    .col(ColumnDef::new(Customers::PrimaryEmail).string())
                    .col(ColumnDef::new(Customers::Emails).text().not_null().default("[]"))
                    .col(ColumnDef::new(Customers::PrimaryPhone).string())
                    .col(ColumnDef::new(Customers::Phones).text().not_null().default("[]"))
                    .col(ColumnDef::new(Customers::Code).string())
                    .col(ColumnDef::new(Customers::OwnerId).string_len(32))
                    .col(ColumnDef::new(Customers::Description).text())
                    .col(
                        ColumnDef::new(Customers::DoNotDisturb)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Customers::TagIds).text().not_null().default("[]"))
                    .col(
                        ColumnDef::new(Customers::CompanyIds)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Customers::CustomFieldsData)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(Customers::MergedIds)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::ModifiedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_customers_primary_email", Customers::PrimaryEmail),
            ("idx_customers_primary_phone", Customers::PrimaryPhone),
            ("idx_customers_code", Customers::Code),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Customers::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    FirstName,
    LastName,
    PrimaryEmail,
    Emails,
    PrimaryPhone,
    Phones,
    Code,
    OwnerId,
    Description,
    DoNotDisturb,
    TagIds,
    CompanyIds,
    CustomFieldsData,
    MergedIds,
    CreatedAt,
    ModifiedAt,
}
