//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_substations;
mod m20250301_000002_create_motor_control_centers;
mod m20250301_000003_create_nodes;
mod m20250301_000004_create_users;
mod m20250301_000005_create_user_permissions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_substations::Migration),
            Box::new(m20250301_000002_create_motor_control_centers::Migration),
            Box::new(m20250301_000003_create_nodes::Migration),
            Box::new(m20250301_000004_create_users::Migration),
            Box::new(m20250301_000005_create_user_permissions::Migration),
        ]
    }
}
