pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_core_tables;
mod m20251205_000001_add_llm_estimation_to_projects;
mod m20251206_000001_add_assignee_to_projects;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_core_tables::Migration),
            Box::new(m20251205_000001_add_llm_estimation_to_projects::Migration),
            Box::new(m20251206_000001_add_assignee_to_projects::Migration),
        ]
    }
}
