use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::HashedPassword)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(32)
                            .not_null()
                            .default("student"),
                    )
                    .col(ColumnDef::new(Users::Bio).text())
                    .col(ColumnDef::new(Users::Skills).text())
                    .col(ColumnDef::new(Users::AvatarUrl).string_len(500))
                    .col(
                        ColumnDef::new(Users::RatingScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Users::CompletedProjects)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(&mut timestamp_now(Users::CreatedAt))
                    .col(&mut timestamp_now(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-users-email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Projects::Description).text().not_null())
                    .col(ColumnDef::new(Projects::Requirements).text())
                    .col(ColumnDef::new(Projects::Budget).double().not_null())
                    .col(ColumnDef::new(Projects::Deadline).timestamp_with_time_zone())
                    .col(ColumnDef::new(Projects::TechStack).text())
                    .col(
                        ColumnDef::new(Projects::Status)
                            .string_len(32)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Projects::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Projects::GeneratedSpec).text())
                    .col(&mut timestamp_now(Projects::CreatedAt))
                    .col(&mut timestamp_now(Projects::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-customer_id")
                            .from(Projects::Table, Projects::CustomerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Tasks::Description).text().not_null())
                    .col(
                        ColumnDef::new(Tasks::Complexity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Tasks::EstimatedHours).integer())
                    .col(ColumnDef::new(Tasks::Deadline).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Tasks::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Tasks::Order).integer().not_null().default(0))
                    .col(ColumnDef::new(Tasks::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Tasks::AssigneeId).integer())
                    .col(&mut timestamp_now(Tasks::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-project_id")
                            .from(Tasks::Table, Tasks::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-assignee_id")
                            .from(Tasks::Table, Tasks::AssigneeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on project_id for per-project task listings
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-tasks-project_id")
                    .table(Tasks::Table)
                    .col(Tasks::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Applications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Applications::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Applications::StudentId).integer().not_null())
                    .col(ColumnDef::new(Applications::CoverLetter).text())
                    .col(ColumnDef::new(Applications::ProposedRate).double())
                    .col(
                        ColumnDef::new(Applications::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(&mut timestamp_now(Applications::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-applications-project_id")
                            .from(Applications::Table, Applications::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-applications-student_id")
                            .from(Applications::Table, Applications::StudentId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ratings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ratings::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Ratings::ReviewerId).integer().not_null())
                    .col(ColumnDef::new(Ratings::RevieweeId).integer().not_null())
                    .col(ColumnDef::new(Ratings::Score).integer().not_null())
                    .col(ColumnDef::new(Ratings::Comment).text())
                    .col(ColumnDef::new(Ratings::QualityScore).integer())
                    .col(ColumnDef::new(Ratings::CommunicationScore).integer())
                    .col(ColumnDef::new(Ratings::DeadlineScore).integer())
                    .col(&mut timestamp_now(Ratings::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ratings-project_id")
                            .from(Ratings::Table, Ratings::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ratings-reviewer_id")
                            .from(Ratings::Table, Ratings::ReviewerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ratings-reviewee_id")
                            .from(Ratings::Table, Ratings::RevieweeId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contracts::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Contracts::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Contracts::StudentId).integer().not_null())
                    .col(ColumnDef::new(Contracts::TotalAmount).double().not_null())
                    .col(ColumnDef::new(Contracts::PlatformFee).double().not_null())
                    .col(ColumnDef::new(Contracts::StudentPayment).double().not_null())
                    .col(ColumnDef::new(Contracts::Terms).text().not_null())
                    .col(
                        ColumnDef::new(Contracts::Status)
                            .string_len(32)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Contracts::CustomerSignedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Contracts::StudentSignedAt).timestamp_with_time_zone())
                    .col(&mut timestamp_now(Contracts::CreatedAt))
                    .col(ColumnDef::new(Contracts::CompletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contracts-project_id")
                            .from(Contracts::Table, Contracts::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contracts-customer_id")
                            .from(Contracts::Table, Contracts::CustomerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contracts-student_id")
                            .from(Contracts::Table, Contracts::StudentId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ratings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

fn timestamp_now<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    HashedPassword,
    FirstName,
    LastName,
    Role,
    Bio,
    Skills,
    AvatarUrl,
    RatingScore,
    CompletedProjects,
    IsActive,
    IsVerified,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Title,
    Description,
    Requirements,
    Budget,
    Deadline,
    TechStack,
    Status,
    CustomerId,
    GeneratedSpec,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Title,
    Description,
    Complexity,
    EstimatedHours,
    Deadline,
    Status,
    Order,
    ProjectId,
    AssigneeId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
    ProjectId,
    StudentId,
    CoverLetter,
    ProposedRate,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Ratings {
    Table,
    Id,
    ProjectId,
    ReviewerId,
    RevieweeId,
    Score,
    Comment,
    QualityScore,
    CommunicationScore,
    DeadlineScore,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    ProjectId,
    CustomerId,
    StudentId,
    TotalAmount,
    PlatformFee,
    StudentPayment,
    Terms,
    Status,
    CustomerSignedAt,
    StudentSignedAt,
    CreatedAt,
    CompletedAt,
}
