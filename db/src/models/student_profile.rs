use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, QueryFilter};
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::models::{department, program, user};

/// Academic identity attached to a user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "student_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Student number, stored upper-case.
    #[sea_orm(unique)]
    pub student_id: String,
    pub department_id: i64,
    pub program_id: i64,
    pub year_level: i32,
    #[serde(skip_serializing)]
    pub face_encoding: Option<Vec<u8>>,
    pub is_face_registered: bool,
    pub registration_complete: bool,
    pub section: Option<String>,
    pub rfid_tag: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id",
        on_delete = "Restrict"
    )]
    Department,

    #[sea_orm(
        belongs_to = "super::program::Entity",
        from = "Column::ProgramId",
        to = "super::program::Column::Id",
        on_delete = "Restrict"
    )]
    Program,

    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendances,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::program::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewStudentProfile {
    pub user_id: i64,
    /// Already normalized student number.
    pub student_id: String,
    pub department_id: i64,
    pub program_id: i64,
    pub year_level: i32,
    pub section: Option<String>,
    pub rfid_tag: Option<String>,
}

impl Model {
    pub async fn create(db: &DatabaseConnection, new: NewStudentProfile) -> DomainResult<Model> {
        if !(1..=5).contains(&new.year_level) {
            return Err(DomainError::invalid("Year level must be between 1 and 5"));
        }

        user::Model::get(db, new.user_id).await?;

        if Self::find_by_user(db, new.user_id).await?.is_some() {
            return Err(DomainError::conflict("Student profile already exists for this user"));
        }
        if Self::find_by_student_number(db, &new.student_id).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Student ID {} is already registered",
                new.student_id
            )));
        }
        if department::Entity::find_by_id(new.department_id)
            .one(db)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Department not found"));
        }
        if program::Entity::find_by_id(new.program_id)
            .one(db)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Program not found"));
        }
        if let Some(tag) = new.rfid_tag.as_deref() {
            let taken = Entity::find()
                .filter(Column::RfidTag.eq(tag))
                .one(db)
                .await?
                .is_some();
            if taken {
                return Err(DomainError::conflict("RFID tag is already assigned"));
            }
        }

        let model = ActiveModel {
            user_id: Set(new.user_id),
            student_id: Set(new.student_id),
            department_id: Set(new.department_id),
            program_id: Set(new.program_id),
            year_level: Set(new.year_level),
            face_encoding: Set(None),
            is_face_registered: Set(false),
            registration_complete: Set(false),
            section: Set(new.section),
            rfid_tag: Set(new.rfid_tag),
            ..Default::default()
        }
        .insert(db)
        .await?;

        tracing::info!(profile_id = model.id, student_id = %model.student_id, "Student profile created");
        Ok(model)
    }

    pub async fn find_by_user<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn find_by_student_number<C: ConnectionTrait>(
        db: &C,
        student_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id.trim().to_ascii_uppercase()))
            .one(db)
            .await
    }

    /// Stores a face embedding and marks registration complete.
    pub async fn store_face_encoding(
        db: &DatabaseConnection,
        id: i64,
        encoding: Vec<u8>,
    ) -> DomainResult<Model> {
        let profile = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found("Student profile not found"))?;

        let mut active: ActiveModel = profile.into();
        active.face_encoding = Set(Some(encoding));
        active.is_face_registered = Set(true);
        active.registration_complete = Set(true);
        Ok(active.update(db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::NewUser;
    use crate::test_utils::setup_test_db;

    async fn fixtures(db: &DatabaseConnection) -> (user::Model, department::Model, program::Model) {
        let user = user::Model::create(
            db,
            &NewUser {
                email: "stud@example.com".into(),
                password: "Password1".into(),
                first_name: "Stu".into(),
                middle_name: None,
                last_name: "Dent".into(),
            },
        )
        .await
        .unwrap();
        let dept = department::Model::create(db, "Computing").await.unwrap();
        let prog = program::Model::create(db, "BSCS", &[dept.id]).await.unwrap();
        (user, dept, prog)
    }

    fn new_profile(user_id: i64, dept: i64, prog: i64) -> NewStudentProfile {
        NewStudentProfile {
            user_id,
            student_id: "CS-2023-001".into(),
            department_id: dept,
            program_id: prog,
            year_level: 2,
            section: None,
            rfid_tag: None,
        }
    }

    #[tokio::test]
    async fn one_profile_per_user() {
        let db = setup_test_db().await;
        let (user, dept, prog) = fixtures(&db).await;

        Model::create(&db, new_profile(user.id, dept.id, prog.id)).await.unwrap();
        let err = Model::create(&db, new_profile(user.id, dept.id, prog.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn rejects_bad_year_and_unknown_program() {
        let db = setup_test_db().await;
        let (user, dept, prog) = fixtures(&db).await;

        let mut bad_year = new_profile(user.id, dept.id, prog.id);
        bad_year.year_level = 6;
        assert!(matches!(
            Model::create(&db, bad_year).await,
            Err(DomainError::Invalid(_))
        ));

        assert!(matches!(
            Model::create(&db, new_profile(user.id, dept.id, 999)).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn lookup_by_student_number_is_case_insensitive() {
        let db = setup_test_db().await;
        let (user, dept, prog) = fixtures(&db).await;
        Model::create(&db, new_profile(user.id, dept.id, prog.id)).await.unwrap();

        let found = Model::find_by_student_number(&db, "cs-2023-001").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn storing_encoding_marks_registration() {
        let db = setup_test_db().await;
        let (user, dept, prog) = fixtures(&db).await;
        let profile = Model::create(&db, new_profile(user.id, dept.id, prog.id)).await.unwrap();

        let updated = Model::store_face_encoding(&db, profile.id, vec![1, 2, 3, 4])
            .await
            .unwrap();
        assert!(updated.is_face_registered);
        assert!(updated.registration_complete);
        assert_eq!(updated.face_encoding.as_deref(), Some(&[1u8, 2, 3, 4][..]));
    }
}
