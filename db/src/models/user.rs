use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    role::{self, RoleName},
    ssg_profile, student_profile, user_role,
};

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User's unique email address.
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 hash; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Inactive users cannot authenticate.
    pub is_active: bool,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,

    #[sea_orm(has_one = "super::student_profile::Entity")]
    StudentProfile,

    #[sea_orm(has_one = "super::ssg_profile::Entity")]
    SsgProfile,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::User.def().rev())
    }
}

impl Related<super::student_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProfile.def()
    }
}

impl Related<super::ssg_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SsgProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<RoleName>,
    pub is_active: Option<bool>,
    pub department_id: Option<i64>,
    pub program_id: Option<i64>,
    pub year_level: Option<i32>,
}

/// A user with roles and profiles resolved.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: Model,
    pub roles: Vec<RoleName>,
    pub student_profile: Option<student_profile::Model>,
    pub ssg_profile: Option<ssg_profile::Model>,
}

impl Model {
    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| DbErr::Custom(format!("Password hashing failed: {e}")))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Inserts a user without any roles.
    pub async fn create<C: ConnectionTrait>(db: &C, new: &NewUser) -> DomainResult<Model> {
        let email = new.email.trim().to_lowercase();
        if Self::find_by_email(db, &email).await?.is_some() {
            return Err(DomainError::conflict("Email already registered"));
        }

        let model = ActiveModel {
            email: Set(email),
            password_hash: Set(Self::hash_password(&new.password)?),
            first_name: Set(new.first_name.trim().to_string()),
            middle_name: Set(new.middle_name.clone().filter(|m| !m.trim().is_empty())),
            last_name: Set(new.last_name.trim().to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(model)
    }

    /// Creates a user and grants `roles` in one transaction.
    pub async fn create_with_roles(
        db: &DatabaseConnection,
        new: &NewUser,
        roles: &[RoleName],
    ) -> DomainResult<Model> {
        let txn = db.begin().await?;
        let user = Self::create(&txn, new).await?;
        user_role::Model::replace_for_user(&txn, user.id, roles).await?;
        txn.commit().await?;

        tracing::info!(user_id = user.id, ?roles, "User created");
        Ok(user)
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> DomainResult<Model> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    /// Returns the user only when the password matches and the account is active.
    pub async fn verify_credentials(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        let Some(user) = Self::find_by_email(db, email).await? else {
            return Ok(None);
        };
        if !user.is_active || !user.verify_password(password) {
            return Ok(None);
        }
        Ok(Some(user))
    }

    pub async fn roles<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<RoleName>, DbErr> {
        user_role::Model::names_for_user(db, self.id).await
    }

    /// Replaces the role set; every role is resolved before anything is written.
    pub async fn set_roles(
        db: &DatabaseConnection,
        id: i64,
        roles: &[RoleName],
    ) -> DomainResult<Vec<RoleName>> {
        let txn = db.begin().await?;
        Self::get(&txn, id).await?;
        user_role::Model::replace_for_user(&txn, id, roles).await?;
        let names = user_role::Model::names_for_user(&txn, id).await?;
        txn.commit().await?;
        Ok(names)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        changes: UserChanges,
    ) -> DomainResult<Model> {
        let existing = Self::get(db, id).await?;
        let mut active: ActiveModel = existing.clone().into();

        if let Some(email) = changes.email {
            let email = email.trim().to_lowercase();
            if email != existing.email {
                if Self::find_by_email(db, &email).await?.is_some() {
                    return Err(DomainError::conflict("Email already registered"));
                }
                active.email = Set(email);
            }
        }
        if let Some(v) = changes.first_name {
            active.first_name = Set(v.trim().to_string());
        }
        if let Some(v) = changes.middle_name {
            active.middle_name = Set(Some(v).filter(|m| !m.trim().is_empty()));
        }
        if let Some(v) = changes.last_name {
            active.last_name = Set(v.trim().to_string());
        }
        if let Some(v) = changes.is_active {
            active.is_active = Set(v);
        }

        Ok(active.update(db).await?)
    }

    pub async fn change_password(
        db: &DatabaseConnection,
        id: i64,
        current: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let user = Self::get(db, id).await?;
        if !user.verify_password(current) {
            return Err(DomainError::invalid("Current password is incorrect"));
        }
        let mut active: ActiveModel = user.into();
        active.password_hash = Set(Self::hash_password(new_password)?);
        active.update(db).await?;
        Ok(())
    }

    /// Deletes the user; roles and profiles go with it.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> DomainResult<()> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("User not found"));
        }
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    pub async fn details<C: ConnectionTrait>(self, db: &C) -> Result<UserDetails, DbErr> {
        let roles = self.roles(db).await?;
        let student_profile = student_profile::Entity::find()
            .filter(student_profile::Column::UserId.eq(self.id))
            .one(db)
            .await?;
        let ssg_profile = ssg_profile::Entity::find()
            .filter(ssg_profile::Column::UserId.eq(self.id))
            .one(db)
            .await?;

        Ok(UserDetails {
            user: self,
            roles,
            student_profile,
            ssg_profile,
        })
    }

    pub async fn list(
        db: &DatabaseConnection,
        filter: &UserFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(Column::Email.contains(search))
                    .add(Column::FirstName.contains(search))
                    .add(Column::LastName.contains(search)),
            );
        }
        if let Some(active) = filter.is_active {
            query = query.filter(Column::IsActive.eq(active));
        }
        if let Some(role) = filter.role {
            query = query
                .join(JoinType::InnerJoin, Relation::UserRoles.def())
                .join(JoinType::InnerJoin, user_role::Relation::Role.def())
                .filter(role::Column::Name.eq(role));
        }
        if filter.department_id.is_some()
            || filter.program_id.is_some()
            || filter.year_level.is_some()
        {
            query = query.join(JoinType::InnerJoin, Relation::StudentProfile.def());
            if let Some(d) = filter.department_id {
                query = query.filter(student_profile::Column::DepartmentId.eq(d));
            }
            if let Some(p) = filter.program_id {
                query = query.filter(student_profile::Column::ProgramId.eq(p));
            }
            if let Some(y) = filter.year_level {
                query = query.filter(student_profile::Column::YearLevel.eq(y));
            }
        }

        query
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password: "Password1".into(),
            first_name: "Ada".into(),
            middle_name: None,
            last_name: "Lovelace".into(),
        }
    }

    #[tokio::test]
    async fn create_hashes_password_and_normalizes_email() {
        let db = setup_test_db().await;
        let user = Model::create(&db, &new_user(" Ada@Example.com ")).await.unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_ne!(user.password_hash, "Password1");
        assert!(user.verify_password("Password1"));
        assert!(!user.verify_password("password1"));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let db = setup_test_db().await;
        Model::create(&db, &new_user("dup@example.com")).await.unwrap();
        let err = Model::create(&db, &new_user("DUP@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn inactive_user_fails_credential_check() {
        let db = setup_test_db().await;
        let user = Model::create(&db, &new_user("idle@example.com")).await.unwrap();
        assert!(
            Model::verify_credentials(&db, "idle@example.com", "Password1")
                .await
                .unwrap()
                .is_some()
        );

        Model::update(
            &db,
            user.id,
            UserChanges {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(
            Model::verify_credentials(&db, "idle@example.com", "Password1")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn set_roles_replaces_the_whole_set() {
        let db = setup_test_db().await;
        let user = Model::create_with_roles(
            &db,
            &new_user("roles@example.com"),
            &[RoleName::Student, RoleName::Ssg],
        )
        .await
        .unwrap();
        assert_eq!(
            user.roles(&db).await.unwrap(),
            vec![RoleName::Student, RoleName::Ssg]
        );

        let roles = Model::set_roles(&db, user.id, &[RoleName::Admin]).await.unwrap();
        assert_eq!(roles, vec![RoleName::Admin]);
    }

    #[tokio::test]
    async fn list_filters_by_role() {
        let db = setup_test_db().await;
        Model::create_with_roles(&db, &new_user("a@example.com"), &[RoleName::Admin])
            .await
            .unwrap();
        Model::create_with_roles(&db, &new_user("s@example.com"), &[RoleName::Student])
            .await
            .unwrap();

        let filter = UserFilter {
            role: Some(RoleName::Student),
            ..Default::default()
        };
        let found = Model::list(&db, &filter, 0, 100).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "s@example.com");
    }

    #[tokio::test]
    async fn delete_cascades_to_roles() {
        let db = setup_test_db().await;
        let user = Model::create_with_roles(&db, &new_user("gone@example.com"), &[RoleName::Ssg])
            .await
            .unwrap();
        Model::delete(&db, user.id).await.unwrap();

        let left = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user.id))
            .all(&db)
            .await
            .unwrap();
        assert!(left.is_empty());
        assert!(matches!(
            Model::delete(&db, user.id).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
