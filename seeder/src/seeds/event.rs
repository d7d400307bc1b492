use crate::seed::Seeder;
use chrono::{Duration, Utc};
use db::error::DomainResult;
use db::models::{
    department,
    event::{self, EventStatus, NewEvent},
    ssg_profile,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

pub struct EventSeeder;

#[async_trait::async_trait]
impl Seeder for EventSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> DomainResult<()> {
        if event::Entity::find().count(db).await? > 0 {
            return Ok(());
        }

        let departments = department::Entity::find().all(db).await?;
        let officers: Vec<i64> = ssg_profile::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        let now = Utc::now();

        let plan = [
            ("Freshman Orientation", "Main Gym", -30, EventStatus::Completed),
            ("Leadership Summit", "Audit Hall", -7, EventStatus::Completed),
            ("Foundation Day", "Open Field", 0, EventStatus::Ongoing),
            ("Career Fair", "Convention Center", 14, EventStatus::Upcoming),
            ("Sports Fest", "Sports Complex", 21, EventStatus::Cancelled),
        ];

        for (i, (name, location, offset_days, status)) in plan.into_iter().enumerate() {
            let start = now + Duration::days(offset_days) - Duration::hours(1);
            // Every other event is open to all departments.
            let department_ids = if i % 2 == 0 {
                vec![]
            } else {
                departments.iter().take(1).map(|d| d.id).collect()
            };

            event::Model::create(
                db,
                NewEvent {
                    name: name.into(),
                    location: location.into(),
                    start_datetime: start,
                    end_datetime: start + Duration::hours(4),
                    status,
                    department_ids,
                    program_ids: vec![],
                    ssg_member_ids: officers.clone(),
                },
            )
            .await?;
        }
        Ok(())
    }
}
