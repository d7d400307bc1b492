use api::auth::generate_jwt;
use chrono::{Duration, Utc};
use db::models::{
    department,
    event::{self, EventStatus, NewEvent},
    program,
    role::RoleName,
    student_profile::{self, NewStudentProfile},
    user::{self, NewUser},
};
use sea_orm::DatabaseConnection;

pub const PASSWORD: &str = "Secret123";

pub struct Account {
    pub user: user::Model,
    pub token: String,
}

pub async fn account(db: &DatabaseConnection, email: &str, roles: &[RoleName]) -> Account {
    let user = user::Model::create_with_roles(
        db,
        &NewUser {
            email: email.into(),
            password: PASSWORD.into(),
            first_name: "Test".into(),
            middle_name: None,
            last_name: email.split('@').next().unwrap().into(),
        },
        roles,
    )
    .await
    .unwrap();
    let (token, _) = generate_jwt(user.id, &user.email, roles).unwrap();
    Account { user, token }
}

pub struct Campus {
    pub department: department::Model,
    pub program: program::Model,
}

pub async fn campus(db: &DatabaseConnection) -> Campus {
    let department = department::Model::create(db, "College of Computing").await.unwrap();
    let program = program::Model::create(db, "BS Computer Science", &[department.id])
        .await
        .unwrap();
    Campus {
        department,
        program,
    }
}

/// A student account with a profile under `campus`.
pub async fn student(
    db: &DatabaseConnection,
    campus: &Campus,
    email: &str,
    number: &str,
) -> (Account, student_profile::Model) {
    let acct = account(db, email, &[RoleName::Student]).await;
    let profile = student_profile::Model::create(
        db,
        NewStudentProfile {
            user_id: acct.user.id,
            student_id: number.into(),
            department_id: campus.department.id,
            program_id: campus.program.id,
            year_level: 1,
            section: None,
            rfid_tag: None,
        },
    )
    .await
    .unwrap();
    (acct, profile)
}

pub async fn event(db: &DatabaseConnection, name: &str, status: EventStatus) -> event::Model {
    let start = Utc::now() - Duration::hours(1);
    event::Model::create(
        db,
        NewEvent {
            name: name.into(),
            location: "Main Gym".into(),
            start_datetime: start,
            end_datetime: start + Duration::hours(3),
            status,
            department_ids: vec![],
            program_ids: vec![],
            ssg_member_ids: vec![],
        },
    )
    .await
    .unwrap()
    .event
}
