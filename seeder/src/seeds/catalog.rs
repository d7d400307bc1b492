use crate::seed::Seeder;
use db::error::DomainResult;
use db::models::{department, program};
use sea_orm::DatabaseConnection;

pub struct CatalogSeeder;

const CATALOG: &[(&str, &[&str])] = &[
    (
        "College of Computing",
        &["BS Computer Science", "BS Information Technology"],
    ),
    ("College of Engineering", &["BS Civil Engineering", "BS Electrical Engineering"]),
    ("College of Business", &["BS Accountancy", "BS Business Administration"]),
];

#[async_trait::async_trait]
impl Seeder for CatalogSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> DomainResult<()> {
        for (dept_name, programs) in CATALOG {
            let dept = match department::Model::find_by_name(db, dept_name).await? {
                Some(d) => d,
                None => department::Model::create(db, dept_name).await?,
            };
            for name in *programs {
                if program::Model::find_by_name(db, name).await?.is_none() {
                    program::Model::create(db, name, &[dept.id]).await?;
                }
            }
        }
        Ok(())
    }
}
