use crate::seed::Seeder;
use db::error::DomainResult;
use db::models::{
    role::RoleName,
    ssg_profile,
    user::{Model, NewUser},
};
use sea_orm::DatabaseConnection;

pub struct UserSeeder;

fn staff(email: &str, password: &str, first: &str, last: &str) -> NewUser {
    NewUser {
        email: email.into(),
        password: password.into(),
        first_name: first.into(),
        middle_name: None,
        last_name: last.into(),
    }
}

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> DomainResult<()> {
        // Fixed accounts; re-running the seeder leaves existing ones alone.
        let fixed = [
            (staff("admin@example.com", "Admin123", "System", "Admin"), vec![RoleName::Admin], None),
            (
                staff("organizer@example.com", "Organizer123", "Olivia", "Reyes"),
                vec![RoleName::EventOrganizer],
                None,
            ),
            (
                staff("ssg.president@example.com", "Officer123", "Paolo", "Santos"),
                vec![RoleName::Student, RoleName::Ssg],
                Some("President"),
            ),
            (
                staff("ssg.secretary@example.com", "Officer123", "Sofia", "Cruz"),
                vec![RoleName::Student, RoleName::Ssg],
                Some("Secretary"),
            ),
        ];

        for (new, roles, position) in fixed {
            if Model::find_by_email(db, &new.email).await?.is_some() {
                continue;
            }
            let user = Model::create_with_roles(db, &new, &roles).await?;
            if let Some(position) = position {
                ssg_profile::Model::create(db, user.id, position).await?;
            }
        }
        Ok(())
    }
}
