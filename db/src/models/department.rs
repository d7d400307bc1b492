use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::models::student_profile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student_profile::Entity")]
    Students,
}

impl Related<super::student_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::program::Entity> for Entity {
    fn to() -> RelationDef {
        super::program_department::Relation::Program.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::program_department::Relation::Department.def().rev())
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_department::Relation::Event.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_department::Relation::Department.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn clean_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::invalid("Department name cannot be empty"));
    }
    Ok(name.to_string())
}

impl Model {
    pub async fn create(db: &DatabaseConnection, name: &str) -> DomainResult<Model> {
        let name = clean_name(name)?;
        if Self::find_by_name(db, &name).await?.is_some() {
            return Err(DomainError::conflict("Department already exists"));
        }

        Ok(ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(db)
        .await?)
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> DomainResult<Model> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found("Department not found"))
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Name.eq(name.trim()))
            .one(db)
            .await
    }

    pub async fn list(db: &DatabaseConnection, skip: u64, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_asc(Column::Name)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
    }

    pub async fn rename(db: &DatabaseConnection, id: i64, name: &str) -> DomainResult<Model> {
        let existing = Self::get(db, id).await?;
        let name = clean_name(name)?;
        if let Some(other) = Self::find_by_name(db, &name).await? {
            if other.id != id {
                return Err(DomainError::conflict("Department already exists"));
            }
        }

        let mut active: ActiveModel = existing.into();
        active.name = Set(name);
        Ok(active.update(db).await?)
    }

    /// Refuses while any student profile still references the department.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> DomainResult<()> {
        Self::get(db, id).await?;

        let in_use = student_profile::Entity::find()
            .filter(student_profile::Column::DepartmentId.eq(id))
            .count(db)
            .await?;
        if in_use > 0 {
            return Err(DomainError::invalid(
                "Cannot delete department: it is assigned to students",
            ));
        }

        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn duplicate_and_empty_names_are_rejected() {
        let db = setup_test_db().await;
        Model::create(&db, "Engineering").await.unwrap();

        assert!(matches!(
            Model::create(&db, " Engineering ").await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            Model::create(&db, "   ").await,
            Err(DomainError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn rename_to_own_name_is_allowed() {
        let db = setup_test_db().await;
        let d = Model::create(&db, "Arts").await.unwrap();
        let other = Model::create(&db, "Science").await.unwrap();

        assert_eq!(Model::rename(&db, d.id, "Arts").await.unwrap().name, "Arts");
        assert!(matches!(
            Model::rename(&db, other.id, "Arts").await,
            Err(DomainError::Conflict(_))
        ));
    }
}
