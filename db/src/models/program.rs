use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::models::{department, program_department, resolve_ids, student_profile};

/// Academic program. Names are stored trimmed and lower-cased.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "programs")]
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

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        super::program_department::Relation::Department.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::program_department::Relation::Program.def().rev())
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_program::Relation::Event.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_program::Relation::Program.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramWithDepartments {
    #[serde(flatten)]
    pub program: Model,
    pub department_ids: Vec<i64>,
}

pub fn normalize_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(DomainError::invalid("Program name cannot be empty"));
    }
    Ok(name)
}

impl Model {
    /// Creates the program and its department links; nothing is kept if any
    /// department id is unknown.
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        department_ids: &[i64],
    ) -> DomainResult<Model> {
        let name = normalize_name(name)?;

        let txn = db.begin().await?;
        if Self::find_by_name(&txn, &name).await?.is_some() {
            return Err(DomainError::conflict("Program with this name already exists"));
        }
        let departments =
            resolve_ids::<department::Entity, _>(&txn, department::Column::Id, department_ids, "Departments")
                .await?;

        let program = ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        program_department::Model::replace(&txn, program.id, &departments).await?;
        txn.commit().await?;

        tracing::info!(program_id = program.id, departments = ?departments, "Program created");
        Ok(program)
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> DomainResult<Model> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found("Program not found"))
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Name.eq(name.trim().to_lowercase()))
            .one(db)
            .await
    }

    pub async fn with_departments<C: ConnectionTrait>(
        self,
        db: &C,
    ) -> Result<ProgramWithDepartments, DbErr> {
        let department_ids = program_department::Model::ids_for(db, self.id).await?;
        Ok(ProgramWithDepartments {
            program: self,
            department_ids,
        })
    }

    pub async fn list(
        db: &DatabaseConnection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ProgramWithDepartments>, DbErr> {
        let programs = Entity::find()
            .order_by_asc(Column::Name)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await?;

        let mut out = Vec::with_capacity(programs.len());
        for p in programs {
            out.push(p.with_departments(db).await?);
        }
        Ok(out)
    }

    /// Renames and/or replaces the department set in one transaction.
    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        name: Option<&str>,
        department_ids: Option<&[i64]>,
    ) -> DomainResult<Model> {
        let txn = db.begin().await?;
        let existing = Self::get(&txn, id).await?;
        let mut active: ActiveModel = existing.clone().into();

        if let Some(raw) = name {
            let name = normalize_name(raw)?;
            if let Some(other) = Self::find_by_name(&txn, &name).await? {
                if other.id != id {
                    return Err(DomainError::conflict("Program with this name already exists"));
                }
            }
            active.name = Set(name);
        }

        if let Some(ids) = department_ids {
            let departments =
                resolve_ids::<department::Entity, _>(&txn, department::Column::Id, ids, "Departments")
                    .await?;
            program_department::Model::replace(&txn, id, &departments).await?;
        }

        let updated = if active.is_changed() {
            active.update(&txn).await?
        } else {
            existing
        };
        txn.commit().await?;
        Ok(updated)
    }

    /// Refuses while any student profile is enrolled in the program.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> DomainResult<()> {
        Self::get(db, id).await?;

        let in_use = student_profile::Entity::find()
            .filter(student_profile::Column::ProgramId.eq(id))
            .count(db)
            .await?;
        if in_use > 0 {
            return Err(DomainError::invalid(
                "Cannot delete program: it is assigned to students",
            ));
        }

        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }
}
