use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::LogType).string_len(64).not_null())
                    .col(ColumnDef::new(ActivityLogs::Action).string_len(16).not_null())
                    .col(ColumnDef::new(ActivityLogs::ObjectId).string_len(32).not_null())
                    .col(ColumnDef::new(ActivityLogs::Object).text().not_null())
                    .col(ColumnDef::new(ActivityLogs::NewData).text())
                    .col(ColumnDef::new(ActivityLogs::Description).text().not_null())
                    .col(ColumnDef::new(ActivityLogs::CreatedBy).string_len(32))
                    .col(
                        ColumnDef::new(ActivityLogs::CreatedAt)
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
                    .name("idx_activity_logs_object_id")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::ObjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActivityLogs {
    Table,
    Id,
    LogType,
    Action,
    ObjectId,
    Object,
    NewData,
    Description,
    CreatedBy,
    CreatedAt,
}
