use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{DomainError, DomainResult};
use crate::models::{
    attendance, department, event_department, event_program, event_ssg_member, program,
    resolve_ids, ssg_profile,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub location: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub status: EventStatus,
}

/// Only ever changed by an explicit call; nothing advances it on a clock.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,

    #[sea_orm(string_value = "ongoing")]
    Ongoing,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendances,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_department::Relation::Department.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_department::Relation::Event.def().rev())
    }
}

impl Related<super::program::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_program::Relation::Program.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_program::Relation::Event.def().rev())
    }
}

impl Related<super::ssg_profile::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_ssg_member::Relation::SsgProfile.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_ssg_member::Relation::Event.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub location: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub status: EventStatus,
    pub department_ids: Vec<i64>,
    pub program_ids: Vec<i64>,
    pub ssg_member_ids: Vec<i64>,
}

/// Partial update. A `Some` id list replaces that whole membership set.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub name: Option<String>,
    pub location: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,
    pub department_ids: Option<Vec<i64>>,
    pub program_ids: Option<Vec<i64>>,
    pub ssg_member_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub start_from: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub department_id: Option<i64>,
    pub program_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Memberships {
    pub department_ids: Vec<i64>,
    pub program_ids: Vec<i64>,
    pub ssg_member_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventWithMemberships {
    #[serde(flatten)]
    pub event: Model,
    #[serde(flatten)]
    pub memberships: Memberships,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRelations {
    pub departments: Vec<department::Model>,
    pub programs: Vec<program::Model>,
    pub ssg_members: Vec<ssg_profile::Model>,
}

pub fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
    if end <= start {
        return Err(DomainError::invalid("End datetime must be after start datetime"));
    }
    Ok(())
}

/// Resolves the three id sets, failing on the first set with an unknown id.
async fn resolve_memberships<C: ConnectionTrait>(
    db: &C,
    department_ids: Option<&[i64]>,
    program_ids: Option<&[i64]>,
    ssg_member_ids: Option<&[i64]>,
) -> DomainResult<(Option<Vec<i64>>, Option<Vec<i64>>, Option<Vec<i64>>)> {
    let departments = match department_ids {
        Some(ids) => Some(
            resolve_ids::<department::Entity, _>(db, department::Column::Id, ids, "Departments")
                .await?,
        ),
        None => None,
    };
    let programs = match program_ids {
        Some(ids) => Some(
            resolve_ids::<program::Entity, _>(db, program::Column::Id, ids, "Programs").await?,
        ),
        None => None,
    };
    let ssg_members = match ssg_member_ids {
        Some(ids) => Some(
            resolve_ids::<ssg_profile::Entity, _>(db, ssg_profile::Column::Id, ids, "SSG members")
                .await?,
        ),
        None => None,
    };
    Ok((departments, programs, ssg_members))
}

impl Model {
    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> DomainResult<Model> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found("Event not found"))
    }

    /// Inserts the event and all three membership sets atomically.
    pub async fn create(db: &DatabaseConnection, new: NewEvent) -> DomainResult<EventWithMemberships> {
        check_window(new.start_datetime, new.end_datetime)?;

        let txn = db.begin().await?;
        let (departments, programs, ssg_members) = resolve_memberships(
            &txn,
            Some(&new.department_ids),
            Some(&new.program_ids),
            Some(&new.ssg_member_ids),
        )
        .await?;

        let event = ActiveModel {
            name: Set(new.name.trim().to_string()),
            location: Set(new.location.trim().to_string()),
            start_datetime: Set(new.start_datetime),
            end_datetime: Set(new.end_datetime),
            status: Set(new.status),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let memberships = Memberships {
            department_ids: departments.unwrap_or_default(),
            program_ids: programs.unwrap_or_default(),
            ssg_member_ids: ssg_members.unwrap_or_default(),
        };
        event_department::Model::replace(&txn, event.id, &memberships.department_ids).await?;
        event_program::Model::replace(&txn, event.id, &memberships.program_ids).await?;
        event_ssg_member::Model::replace(&txn, event.id, &memberships.ssg_member_ids).await?;
        txn.commit().await?;

        tracing::info!(event_id = event.id, name = %event.name, "Event created");
        Ok(EventWithMemberships { event, memberships })
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        changes: EventChanges,
    ) -> DomainResult<EventWithMemberships> {
        let txn = db.begin().await?;
        let existing = Self::get(&txn, id).await?;

        let start = changes.start_datetime.unwrap_or(existing.start_datetime);
        let end = changes.end_datetime.unwrap_or(existing.end_datetime);
        check_window(start, end)?;

        let (departments, programs, ssg_members) = resolve_memberships(
            &txn,
            changes.department_ids.as_deref(),
            changes.program_ids.as_deref(),
            changes.ssg_member_ids.as_deref(),
        )
        .await?;

        let mut active: ActiveModel = existing.clone().into();
        if let Some(name) = changes.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(location) = changes.location {
            active.location = Set(location.trim().to_string());
        }
        if changes.start_datetime.is_some() {
            active.start_datetime = Set(start);
        }
        if changes.end_datetime.is_some() {
            active.end_datetime = Set(end);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        let event = if active.is_changed() {
            active.update(&txn).await?
        } else {
            existing
        };

        if let Some(ids) = departments {
            event_department::Model::replace(&txn, id, &ids).await?;
        }
        if let Some(ids) = programs {
            event_program::Model::replace(&txn, id, &ids).await?;
        }
        if let Some(ids) = ssg_members {
            event_ssg_member::Model::replace(&txn, id, &ids).await?;
        }

        let memberships = Self::memberships(&txn, id).await?;
        txn.commit().await?;
        Ok(EventWithMemberships { event, memberships })
    }

    pub async fn set_status(
        db: &DatabaseConnection,
        id: i64,
        status: EventStatus,
    ) -> DomainResult<Model> {
        let existing = Self::get(db, id).await?;
        let previous = existing.status;
        let mut active: ActiveModel = existing.into();
        active.status = Set(status);
        let updated = active.update(db).await?;

        tracing::info!(event_id = id, from = %previous, to = %status, "Event status changed");
        Ok(updated)
    }

    /// Clears memberships and attendance explicitly, then removes the event.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> DomainResult<()> {
        let txn = db.begin().await?;
        Self::get(&txn, id).await?;

        event_department::Model::replace(&txn, id, &[]).await?;
        event_program::Model::replace(&txn, id, &[]).await?;
        event_ssg_member::Model::replace(&txn, id, &[]).await?;
        let removed = attendance::Entity::delete_many()
            .filter(attendance::Column::EventId.eq(id))
            .exec(&txn)
            .await?;
        Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(event_id = id, attendances = removed.rows_affected, "Event deleted");
        Ok(())
    }

    pub async fn memberships<C: ConnectionTrait>(db: &C, id: i64) -> Result<Memberships, DbErr> {
        Ok(Memberships {
            department_ids: event_department::Model::ids_for(db, id).await?,
            program_ids: event_program::Model::ids_for(db, id).await?,
            ssg_member_ids: event_ssg_member::Model::ids_for(db, id).await?,
        })
    }

    pub async fn relations<C: ConnectionTrait>(&self, db: &C) -> Result<EventRelations, DbErr> {
        Ok(EventRelations {
            departments: self.find_related(department::Entity).all(db).await?,
            programs: self.find_related(program::Entity).all(db).await?,
            ssg_members: self.find_related(ssg_profile::Entity).all(db).await?,
        })
    }

    /// Filtered page of events plus the total matching count.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &EventFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(u64, Vec<EventWithMemberships>), DbErr> {
        let mut query = Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(Column::Status.eq(status));
        }
        if let Some(from) = filter.start_from {
            query = query.filter(Column::StartDatetime.gte(from));
        }
        if let Some(until) = filter.end_at {
            query = query.filter(Column::EndDatetime.lte(until));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(Column::Name.contains(search))
                    .add(Column::Location.contains(search)),
            );
        }
        if let Some(department_id) = filter.department_id {
            query = query.filter(
                Column::Id.in_subquery(
                    Query::select()
                        .column(event_department::Column::EventId)
                        .from(event_department::Entity)
                        .and_where(event_department::Column::DepartmentId.eq(department_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(program_id) = filter.program_id {
            query = query.filter(
                Column::Id.in_subquery(
                    Query::select()
                        .column(event_program::Column::EventId)
                        .from(event_program::Entity)
                        .and_where(event_program::Column::ProgramId.eq(program_id))
                        .to_owned(),
                ),
            );
        }

        let total = query.clone().count(db).await?;
        let events = query
            .order_by_asc(Column::StartDatetime)
            .order_by_asc(Column::Id)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await?;

        let mut items = Vec::with_capacity(events.len());
        for event in events {
            let memberships = Self::memberships(db, event.id).await?;
            items.push(EventWithMemberships { event, memberships });
        }
        Ok((total, items))
    }
}
