use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

const FK_NAME: &str = "fk_projects_assignee_id_users";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.has_column("projects", "assignee_id").await? {
            return Ok(());
        }

        manager
            .alter_table(
                Table::alter()
                    .table(Projects::Table)
                    .add_column(ColumnDef::new(Projects::AssigneeId).integer())
                    .to_owned(),
            )
            .await?;

        // SQLite cannot add a constraint to an existing table
        if supports_foreign_key_alter(manager) {
            manager
                .create_foreign_key(
                    ForeignKey::create()
                        .name(FK_NAME)
                        .from(Projects::Table, Projects::AssigneeId)
                        .to(Users::Table, Users::Id)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if supports_foreign_key_alter(manager) {
            manager
                .drop_foreign_key(
                    ForeignKey::drop()
                        .name(FK_NAME)
                        .table(Projects::Table)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .alter_table(
                Table::alter()
                    .table(Projects::Table)
                    .drop_column(Projects::AssigneeId)
                    .to_owned(),
            )
            .await
    }
}

fn supports_foreign_key_alter(manager: &SchemaManager) -> bool {
    manager.get_database_backend() != DbBackend::Sqlite
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    AssigneeId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
