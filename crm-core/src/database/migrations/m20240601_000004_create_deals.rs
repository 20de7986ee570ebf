use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deals::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Deals::Name).string().not_null())
                    .col(ColumnDef::new(Deals::Description).text())
                    .col(
                        ColumnDef::new(Deals::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Deals::ModifiedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DealProductLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DealProductLines::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DealProductLines::DealId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DealProductLines::ProductId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DealProductLines::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(DealProductLines::UnitPrice).double())
                    .col(
                        ColumnDef::new(DealProductLines::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deal_product_lines_deal")
                            .from(DealProductLines::Table, DealProductLines::DealId)
                            .to(Deals::Table, Deals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deal_product_lines_product_id")
                    .table(DealProductLines::Table)
                    .col(DealProductLines::ProductId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DealProductLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deals::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Deals {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    ModifiedAt,
}

#[derive(Iden)]
enum DealProductLines {
    Table,
    Id,
    DealId,
    ProductId,
    Quantity,
    UnitPrice,
    Position,
}
