use crate::seed::Seeder;
use db::error::DomainResult;
use db::models::role::Model;
use sea_orm::DatabaseConnection;

pub struct RoleSeeder;

#[async_trait::async_trait]
impl Seeder for RoleSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> DomainResult<()> {
        Model::ensure_defaults(db).await?;
        Ok(())
    }
}
