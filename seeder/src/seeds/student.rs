use crate::seed::Seeder;
use db::error::DomainResult;
use db::models::{
    program, program_department,
    role::RoleName,
    student_profile::{self, NewStudentProfile},
    user::{self, NewUser},
};
use fake::{
    Fake,
    faker::name::en::{FirstName, LastName},
};
use sea_orm::{DatabaseConnection, EntityTrait};

pub struct StudentSeeder;

const STUDENTS_PER_PROGRAM: usize = 8;

#[async_trait::async_trait]
impl Seeder for StudentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> DomainResult<()> {
        let links = program_department::Entity::find().all(db).await?;
        let programs = program::Entity::find().all(db).await?;

        for (p_idx, prog) in programs.iter().enumerate() {
            let Some(link) = links.iter().find(|l| l.program_id == prog.id) else {
                continue;
            };

            for n in 0..STUDENTS_PER_PROGRAM {
                let number = format!("S{:02}-2025-{:03}", p_idx + 1, n + 1);
                if student_profile::Model::find_by_student_number(db, &number)
                    .await?
                    .is_some()
                {
                    continue;
                }

                let first: String = FirstName().fake();
                let last: String = LastName().fake();
                let email = format!("{}@students.example.com", number.to_lowercase());
                let account = user::Model::create_with_roles(
                    db,
                    &NewUser {
                        email,
                        password: "Student123".into(),
                        first_name: first,
                        middle_name: None,
                        last_name: last,
                    },
                    &[RoleName::Student],
                )
                .await?;

                student_profile::Model::create(
                    db,
                    NewStudentProfile {
                        user_id: account.id,
                        student_id: number,
                        department_id: link.department_id,
                        program_id: prog.id,
                        year_level: fastrand::i32(1..=4),
                        section: Some(["A", "B", "C"][fastrand::usize(..3)].to_string()),
                        rfid_tag: None,
                    },
                )
                .await?;
            }
        }
        Ok(())
    }
}
