use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MessengerApps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MessengerApps::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MessengerApps::Kind).string_len(32).not_null())
                    .col(ColumnDef::new(MessengerApps::Name).string().not_null())
                    .col(
                        ColumnDef::new(MessengerApps::Credentials)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(MessengerApps::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MessengerApps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MessengerApps {
    Table,
    Id,
    Kind,
    Name,
    Credentials,
    CreatedAt,
}
