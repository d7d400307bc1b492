use crate::seed::Seeder;
use chrono::Duration;
use db::error::DomainResult;
use db::models::{
    attendance::{self, AttendanceMethod, AttendanceStatus},
    event::{self, EventStatus},
    student_profile, user,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait};

pub struct AttendanceSeeder;

#[async_trait::async_trait]
impl Seeder for AttendanceSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> DomainResult<()> {
        if attendance::Entity::find().count(db).await? > 0 {
            return Ok(());
        }

        let verifier = user::Model::find_by_email(db, "ssg.president@example.com")
            .await?
            .map(|u| u.id);
        let students = student_profile::Entity::find().all(db).await?;
        let events = event::Entity::find().all(db).await?;

        for ev in events.iter().filter(|e| e.status != EventStatus::Upcoming) {
            if ev.status == EventStatus::Cancelled {
                continue;
            }
            for student in &students {
                let roll = fastrand::u8(..100);
                let time_in = ev.start_datetime + Duration::minutes(fastrand::i64(0..45));

                let (status, time_out) = match (ev.status, roll) {
                    (_, 0..=9) => (AttendanceStatus::Excused, None),
                    (EventStatus::Completed, 10..=19) => (AttendanceStatus::Absent, None),
                    (EventStatus::Ongoing, 10..=39) => (AttendanceStatus::Present, None),
                    (_, 40..=59) if ev.status == EventStatus::Ongoing => continue,
                    _ => (
                        AttendanceStatus::Present,
                        Some(time_in + Duration::minutes(fastrand::i64(60..200))),
                    ),
                };

                attendance::ActiveModel {
                    student_id: Set(student.id),
                    event_id: Set(ev.id),
                    time_in: Set(time_in),
                    time_out: Set(time_out),
                    method: Set(if fastrand::bool() {
                        AttendanceMethod::FaceScan
                    } else {
                        AttendanceMethod::Manual
                    }),
                    status: Set(status),
                    verified_by: Set(verifier),
                    notes: Set(None),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        }
        Ok(())
    }
}
