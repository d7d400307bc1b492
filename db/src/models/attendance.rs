//! Attendance records and their lifecycle.
//!
//! A record moves `present (open) -> present (closed)` through check-in and
//! check-out. `absent` and `excused` are reached directly (excuse marking,
//! absentee sweep) or through an administrative override.

use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect,
    SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{DomainError, DomainResult};
use crate::models::{event, student_profile, user};

pub const SWEEP_NOTE: &str = "Marked absent: no time-out recorded after event completion";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student profile id (not the student number).
    pub student_id: i64,
    pub event_id: i64,
    pub time_in: DateTime<Utc>,
    pub time_out: Option<DateTime<Utc>>,
    pub method: AttendanceMethod,
    pub status: AttendanceStatus,
    pub verified_by: Option<i64>,
    pub notes: Option<String>,
}

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
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_method")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttendanceMethod {
    #[sea_orm(string_value = "face_scan")]
    FaceScan,

    #[sea_orm(string_value = "manual")]
    Manual,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "excused")]
    Excused,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_profile::Entity",
        from = "Column::StudentId",
        to = "super::student_profile::Column::Id",
        on_delete = "Cascade"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::VerifiedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Verifier,
}

impl Related<super::student_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One line of a bulk marking request.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItem {
    pub event_id: i64,
    pub student_id: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOutcome {
    Recorded,
    Exists,
    NotFound,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkResult {
    pub student_id: String,
    pub event_id: i64,
    pub status: BulkOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub processed: usize,
    pub results: Vec<BulkResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcuseOutcome {
    /// An existing record was switched to excused.
    Excused,
    /// No record existed; an excused one was created.
    Created,
    NotFound,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExcuseResult {
    pub student_id: String,
    pub status: ExcuseOutcome,
    pub attendance_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExcuseReport {
    pub event_id: i64,
    pub results: Vec<ExcuseResult>,
}

/// A record joined with the student's number and display name.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceWithStudent {
    #[serde(flatten)]
    pub attendance: Model,
    pub student_number: String,
    pub student_name: String,
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == AttendanceStatus::Present && self.time_out.is_none()
    }

    /// Whole minutes between time-in and time-out, rounded down.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.time_out.map(|out| (out - self.time_in).num_minutes())
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i64) -> DomainResult<Model> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DomainError::not_found("Attendance record not found"))
    }

    pub async fn latest_for<C: ConnectionTrait>(
        db: &C,
        student_profile_id: i64,
        event_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_profile_id))
            .filter(Column::EventId.eq(event_id))
            .order_by_desc(Column::TimeIn)
            .order_by_desc(Column::Id)
            .one(db)
            .await
    }

    pub async fn active_for<C: ConnectionTrait>(
        db: &C,
        student_profile_id: i64,
        event_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_profile_id))
            .filter(Column::EventId.eq(event_id))
            .filter(Column::Status.eq(AttendanceStatus::Present))
            .filter(Column::TimeOut.is_null())
            .one(db)
            .await
    }

    async fn insert_present<C: ConnectionTrait>(
        db: &C,
        student: &student_profile::Model,
        event_id: i64,
        method: AttendanceMethod,
        verifier: Option<i64>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Model> {
        let inserted = ActiveModel {
            student_id: Set(student.id),
            event_id: Set(event_id),
            time_in: Set(now),
            time_out: Set(None),
            method: Set(method),
            status: Set(AttendanceStatus::Present),
            verified_by: Set(verifier),
            notes: Set(notes),
            ..Default::default()
        }
        .insert(db)
        .await;

        match inserted {
            Ok(model) => Ok(model),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                DomainError::conflict(format!("Student {} is already checked in", student.student_id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Manual check-in: a student gets at most one record per event.
    pub async fn check_in_manual(
        db: &DatabaseConnection,
        event_id: i64,
        student_number: &str,
        verifier: i64,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Model> {
        let event = open_event(db, event_id).await?;
        let student = student_by_number(db, student_number).await?;

        if Self::latest_for(db, student.id, event.id).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Attendance already exists for student {}",
                student.student_id
            )));
        }

        let record = Self::insert_present(
            db,
            &student,
            event.id,
            AttendanceMethod::Manual,
            Some(verifier),
            notes,
            now,
        )
        .await?;
        tracing::info!(attendance_id = record.id, event_id, student = %student.student_id, "Manual check-in");
        Ok(record)
    }

    /// Face-scan check-in.
    ///
    /// A scan within `cooldown` of the latest time-in is rejected. After the
    /// cooldown a new record is only opened when no record is still active.
    pub async fn check_in_face(
        db: &DatabaseConnection,
        event_id: i64,
        student_number: &str,
        verifier: Option<i64>,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> DomainResult<Model> {
        let event = open_event(db, event_id).await?;
        let student = student_by_number(db, student_number).await?;

        if let Some(last) = Self::latest_for(db, student.id, event.id).await? {
            let elapsed = now - last.time_in;
            if elapsed < cooldown {
                return Err(DomainError::invalid(format!(
                    "Duplicate scan detected. Last scan was {} minutes ago.",
                    elapsed.num_minutes().max(0)
                )));
            }
        }
        if Self::active_for(db, student.id, event.id).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Student {} is already checked in",
                student.student_id
            )));
        }

        let record = Self::insert_present(
            db,
            &student,
            event.id,
            AttendanceMethod::FaceScan,
            verifier,
            None,
            now,
        )
        .await?;
        tracing::info!(attendance_id = record.id, event_id, student = %student.student_id, "Face-scan check-in");
        Ok(record)
    }

    fn close(self, now: DateTime<Utc>) -> DomainResult<ActiveModel> {
        if self.time_out.is_some() {
            return Err(DomainError::conflict("Time-out already recorded"));
        }
        if self.status != AttendanceStatus::Present {
            return Err(DomainError::invalid(format!(
                "Cannot record time-out for an attendance marked {}",
                self.status
            )));
        }
        // Guard against a clock that moved backwards.
        let out = if now < self.time_in { self.time_in } else { now };
        let mut active: ActiveModel = self.into();
        active.time_out = Set(Some(out));
        Ok(active)
    }

    /// Check-out by record id.
    pub async fn check_out(db: &DatabaseConnection, id: i64, now: DateTime<Utc>) -> DomainResult<Model> {
        let record = Self::get(db, id).await?;
        let closed = record.close(now)?.update(db).await?;
        tracing::info!(attendance_id = id, minutes = ?closed.duration_minutes(), "Check-out");
        Ok(closed)
    }

    /// Check-out of the open record for a (student, event) pair.
    pub async fn check_out_active(
        db: &DatabaseConnection,
        event_id: i64,
        student_number: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Model> {
        event::Model::get(db, event_id).await?;
        let student = student_by_number(db, student_number).await?;

        let record = Self::active_for(db, student.id, event_id)
            .await?
            .ok_or_else(|| DomainError::not_found("No active attendance record found"))?;
        let closed = record.close(now)?.update(db).await?;
        tracing::info!(attendance_id = closed.id, minutes = ?closed.duration_minutes(), "Face-scan check-out");
        Ok(closed)
    }

    /// Records each item independently; one bad item never fails the batch.
    pub async fn mark_bulk(
        db: &DatabaseConnection,
        items: &[BulkItem],
        verifier: i64,
        now: DateTime<Utc>,
    ) -> Result<BulkReport, DbErr> {
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            let status = match Self::mark_one(db, item, verifier, now).await {
                Ok(outcome) => outcome,
                Err(DomainError::Db(e)) => return Err(e),
                Err(DomainError::Conflict(_)) => BulkOutcome::Exists,
                Err(_) => BulkOutcome::NotFound,
            };
            results.push(BulkResult {
                student_id: item.student_id.trim().to_ascii_uppercase(),
                event_id: item.event_id,
                status,
            });
        }

        Ok(BulkReport {
            processed: results.len(),
            results,
        })
    }

    async fn mark_one(
        db: &DatabaseConnection,
        item: &BulkItem,
        verifier: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<BulkOutcome> {
        let Some(student) = student_profile::Model::find_by_student_number(db, &item.student_id).await? else {
            return Ok(BulkOutcome::NotFound);
        };
        if event::Entity::find_by_id(item.event_id).one(db).await?.is_none() {
            return Ok(BulkOutcome::NotFound);
        }
        if Self::latest_for(db, student.id, item.event_id).await?.is_some() {
            return Ok(BulkOutcome::Exists);
        }

        Self::insert_present(
            db,
            &student,
            item.event_id,
            AttendanceMethod::Manual,
            Some(verifier),
            item.notes.clone(),
            now,
        )
        .await?;
        Ok(BulkOutcome::Recorded)
    }

    /// Upserts an excused record per student: the latest record is switched
    /// to excused, or a new excused record is created.
    pub async fn mark_excused(
        db: &DatabaseConnection,
        event_id: i64,
        student_numbers: &[String],
        reason: &str,
        verifier: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<ExcuseReport> {
        event::Model::get(db, event_id).await?;
        let mut results = Vec::with_capacity(student_numbers.len());

        for number in student_numbers {
            let normalized = number.trim().to_ascii_uppercase();
            let Some(student) = student_profile::Model::find_by_student_number(db, &normalized).await? else {
                results.push(ExcuseResult {
                    student_id: normalized,
                    status: ExcuseOutcome::NotFound,
                    attendance_id: None,
                });
                continue;
            };

            let (status, record) = match Self::latest_for(db, student.id, event_id).await? {
                Some(existing) => {
                    let mut active: ActiveModel = existing.into();
                    active.status = Set(AttendanceStatus::Excused);
                    active.notes = Set(Some(reason.to_string()));
                    active.verified_by = Set(Some(verifier));
                    (ExcuseOutcome::Excused, active.update(db).await?)
                }
                None => {
                    let created = ActiveModel {
                        student_id: Set(student.id),
                        event_id: Set(event_id),
                        time_in: Set(now),
                        time_out: Set(None),
                        method: Set(AttendanceMethod::Manual),
                        status: Set(AttendanceStatus::Excused),
                        verified_by: Set(Some(verifier)),
                        notes: Set(Some(reason.to_string())),
                        ..Default::default()
                    }
                    .insert(db)
                    .await?;
                    (ExcuseOutcome::Created, created)
                }
            };

            results.push(ExcuseResult {
                student_id: student.student_id,
                status,
                attendance_id: Some(record.id),
            });
        }

        Ok(ExcuseReport { event_id, results })
    }

    /// Marks every still-open present record of a completed event absent.
    pub async fn sweep_absent(db: &DatabaseConnection, event_id: i64) -> DomainResult<Vec<i64>> {
        let txn = db.begin().await?;
        let event = event::Model::get(&txn, event_id).await?;
        if event.status != event::EventStatus::Completed {
            return Err(DomainError::invalid(format!(
                "Absentees can only be marked for completed events (event is {})",
                event.status
            )));
        }

        let open = Entity::find()
            .filter(Column::EventId.eq(event_id))
            .filter(Column::Status.eq(AttendanceStatus::Present))
            .filter(Column::TimeOut.is_null())
            .all(&txn)
            .await?;

        let mut ids = Vec::with_capacity(open.len());
        for record in open {
            let notes = match record.notes.as_deref() {
                Some(existing) if !existing.is_empty() => format!("{existing}\n{SWEEP_NOTE}"),
                _ => SWEEP_NOTE.to_string(),
            };
            ids.push(record.id);
            let mut active: ActiveModel = record.into();
            active.status = Set(AttendanceStatus::Absent);
            active.notes = Set(Some(notes));
            active.update(&txn).await?;
        }
        txn.commit().await?;

        tracing::info!(event_id, updated = ids.len(), "Absentee sweep");
        Ok(ids)
    }

    /// Administrative status override from any state.
    pub async fn override_status(
        db: &DatabaseConnection,
        id: i64,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> DomainResult<Model> {
        let record = Self::get(db, id).await?;
        let student_id = record.student_id;
        let mut active: ActiveModel = record.into();
        active.status = Set(status);
        if let Some(n) = notes {
            active.notes = Set(Some(n));
        }

        match active.update(db).await {
            Ok(m) => Ok(m),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(DomainError::conflict(format!(
                    "Student profile {student_id} already has an open attendance for this event"
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn verify(db: &DatabaseConnection, id: i64, verifier: i64) -> DomainResult<Model> {
        let record = Self::get(db, id).await?;
        let mut active: ActiveModel = record.into();
        active.verified_by = Set(Some(verifier));
        Ok(active.update(db).await?)
    }

    pub async fn for_student(
        db: &DatabaseConnection,
        student_profile_id: i64,
        event_id: Option<i64>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().filter(Column::StudentId.eq(student_profile_id));
        if let Some(e) = event_id {
            query = query.filter(Column::EventId.eq(e));
        }
        query.order_by_desc(Column::TimeIn).all(db).await
    }

    pub async fn for_event(
        db: &DatabaseConnection,
        event_id: i64,
        status: Option<AttendanceStatus>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().filter(Column::EventId.eq(event_id));
        if let Some(s) = status {
            query = query.filter(Column::Status.eq(s));
        }
        query
            .order_by_desc(Column::TimeIn)
            .order_by_desc(Column::Id)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await
    }

    /// Attendees grouped by status, then time-in.
    pub async fn attendees(
        db: &DatabaseConnection,
        event_id: i64,
        status: Option<AttendanceStatus>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<AttendanceWithStudent>, DbErr> {
        let mut query = Entity::find().filter(Column::EventId.eq(event_id));
        if let Some(s) = status {
            query = query.filter(Column::Status.eq(s));
        }
        let rows = query
            .order_by_asc(Column::Status)
            .order_by_asc(Column::TimeIn)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await?;
        with_students(db, rows).await
    }

    pub async fn with_students_for_event(
        db: &DatabaseConnection,
        event_id: i64,
    ) -> Result<Vec<AttendanceWithStudent>, DbErr> {
        let rows = Entity::find()
            .filter(Column::EventId.eq(event_id))
            .order_by_desc(Column::TimeIn)
            .all(db)
            .await?;
        with_students(db, rows).await
    }
}

async fn with_students(
    db: &DatabaseConnection,
    rows: Vec<Model>,
) -> Result<Vec<AttendanceWithStudent>, DbErr> {
    let mut out = Vec::with_capacity(rows.len());
    for attendance in rows {
        let found = student_profile::Entity::find_by_id(attendance.student_id)
            .find_also_related(user::Entity)
            .one(db)
            .await?;
        let (student_number, student_name) = match found {
            Some((profile, Some(u))) => (profile.student_id, u.full_name()),
            Some((profile, None)) => (profile.student_id, String::new()),
            None => (String::new(), String::new()),
        };
        out.push(AttendanceWithStudent {
            attendance,
            student_number,
            student_name,
        });
    }
    Ok(out)
}

async fn open_event<C: ConnectionTrait>(db: &C, event_id: i64) -> DomainResult<event::Model> {
    let event = event::Model::get(db, event_id).await?;
    if event.status == event::EventStatus::Cancelled {
        return Err(DomainError::invalid(
            "Cannot record attendance for a cancelled event",
        ));
    }
    Ok(event)
}

async fn student_by_number<C: ConnectionTrait>(
    db: &C,
    student_number: &str,
) -> DomainResult<student_profile::Model> {
    student_profile::Model::find_by_student_number(db, student_number)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(format!(
                "Student {} not found",
                student_number.trim().to_ascii_uppercase()
            ))
        })
}
