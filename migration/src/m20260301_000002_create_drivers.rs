use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_users::User;

/// Ids below this value are reserved for synthetic fallback drivers.
const FIRST_DRIVER_ID: i32 = 1000;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Driver::Table)
                    .if_not_exists()
                    .col(pk_auto(Driver::Id))
                    .col(uuid(Driver::UserId).not_null().unique_key())
                    .col(string_len(Driver::Name, 100).not_null())
                    .col(string_len(Driver::Surname, 100).not_null())
                    .col(string_len(Driver::Email, 255).not_null())
                    .col(double(Driver::HomeLat).not_null())
                    .col(double(Driver::HomeLng).not_null())
                    .col(
                        timestamp_with_time_zone(Driver::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_user")
                            .from(Driver::Table, Driver::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(&format!(
                "ALTER SEQUENCE driver_id_seq RESTART WITH {FIRST_DRIVER_ID}"
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Driver::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Driver {
    Table,
    Id,
    UserId,
    Name,
    Surname,
    Email,
    HomeLat,
    HomeLng,
    CreatedAt,
}
