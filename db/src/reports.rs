//! Attendance aggregation computed at query time.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{DomainError, DomainResult};
use crate::models::attendance::{self, AttendanceStatus};
use crate::models::{department, event, program, student_profile};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusShare {
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub event_id: i64,
    pub total: u64,
    pub statuses: BTreeMap<AttendanceStatus, StatusShare>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub present: u64,
    pub absent: u64,
    pub excused: u64,
    pub total: u64,
}

impl StatusCounts {
    fn add(&mut self, status: AttendanceStatus, n: u64) {
        match status {
            AttendanceStatus::Present => self.present += n,
            AttendanceStatus::Absent => self.absent += n,
            AttendanceStatus::Excused => self.excused += n,
        }
        self.total += n;
    }
}

/// Counts for one program or department.
#[derive(Debug, Clone, Serialize)]
pub struct GroupCounts {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Bucket {
    #[default]
    Day,
    Week,
    Month,
}

impl Bucket {
    /// First day of the bucket containing `date`. Weeks start on Monday.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Bucket::Day => date,
            Bucket::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            Bucket::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub period_start: NaiveDate,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trend {
    pub bucket: Bucket,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub points: Vec<TrendPoint>,
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 10_000.0).round() / 100.0
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, DbErr> {
    AttendanceStatus::from_str(raw)
        .map_err(|_| DbErr::Custom(format!("Unknown attendance status in storage: {raw}")))
}

/// Totals per status for one event. Every status is present in the map,
/// zero-filled.
pub async fn event_summary(db: &DatabaseConnection, event_id: i64) -> DomainResult<EventSummary> {
    event::Model::get(db, event_id).await?;

    let rows: Vec<(String, i64)> = attendance::Entity::find()
        .select_only()
        .column(attendance::Column::Status)
        .column_as(Expr::col(attendance::Column::Id).count(), "count")
        .filter(attendance::Column::EventId.eq(event_id))
        .group_by(attendance::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    let mut counts = StatusCounts::default();
    for (status, n) in rows {
        counts.add(parse_status(&status)?, n as u64);
    }

    let total = counts.total;
    let statuses = [
        (AttendanceStatus::Present, counts.present),
        (AttendanceStatus::Absent, counts.absent),
        (AttendanceStatus::Excused, counts.excused),
    ]
    .into_iter()
    .map(|(s, count)| {
        (
            s,
            StatusShare {
                count,
                percentage: percentage(count, total),
            },
        )
    })
    .collect();

    Ok(EventSummary {
        event_id,
        total,
        statuses,
    })
}

fn fold_groups(rows: Vec<(i64, String, String, i64)>) -> Result<Vec<GroupCounts>, DbErr> {
    let mut groups: BTreeMap<i64, GroupCounts> = BTreeMap::new();
    for (id, name, status, n) in rows {
        let status = parse_status(&status)?;
        groups
            .entry(id)
            .or_insert_with(|| GroupCounts {
                id,
                name,
                counts: StatusCounts::default(),
            })
            .counts
            .add(status, n as u64);
    }

    let mut out: Vec<GroupCounts> = groups.into_values().collect();
    out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(out)
}

/// Attendance of one event broken down by the students' program.
pub async fn by_program(db: &DatabaseConnection, event_id: i64) -> DomainResult<Vec<GroupCounts>> {
    event::Model::get(db, event_id).await?;

    let rows: Vec<(i64, String, String, i64)> = attendance::Entity::find()
        .select_only()
        .column(program::Column::Id)
        .column(program::Column::Name)
        .column(attendance::Column::Status)
        .column_as(Expr::col((attendance::Entity, attendance::Column::Id)).count(), "count")
        .join(JoinType::InnerJoin, attendance::Relation::Student.def())
        .join(JoinType::InnerJoin, student_profile::Relation::Program.def())
        .filter(attendance::Column::EventId.eq(event_id))
        .group_by(program::Column::Id)
        .group_by(program::Column::Name)
        .group_by(attendance::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    Ok(fold_groups(rows)?)
}

/// Attendance of one event broken down by the students' department.
pub async fn by_department(
    db: &DatabaseConnection,
    event_id: i64,
) -> DomainResult<Vec<GroupCounts>> {
    event::Model::get(db, event_id).await?;

    let rows: Vec<(i64, String, String, i64)> = attendance::Entity::find()
        .select_only()
        .column(department::Column::Id)
        .column(department::Column::Name)
        .column(attendance::Column::Status)
        .column_as(Expr::col((attendance::Entity, attendance::Column::Id)).count(), "count")
        .join(JoinType::InnerJoin, attendance::Relation::Student.def())
        .join(JoinType::InnerJoin, student_profile::Relation::Department.def())
        .filter(attendance::Column::EventId.eq(event_id))
        .group_by(department::Column::Id)
        .group_by(department::Column::Name)
        .group_by(attendance::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    Ok(fold_groups(rows)?)
}

/// Counts by status over `time_in`, grouped into day, week or month buckets.
/// Only buckets with at least one record are returned, oldest first.
pub async fn trend(
    db: &DatabaseConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bucket: Bucket,
    event_id: Option<i64>,
) -> DomainResult<Trend> {
    if end < start {
        return Err(DomainError::invalid("Report end must not be before start"));
    }

    let mut query = attendance::Entity::find()
        .select_only()
        .column(attendance::Column::TimeIn)
        .column(attendance::Column::Status)
        .filter(attendance::Column::TimeIn.gte(start))
        .filter(attendance::Column::TimeIn.lte(end));
    if let Some(id) = event_id {
        query = query.filter(attendance::Column::EventId.eq(id));
    }
    let rows: Vec<(DateTime<Utc>, String)> = query
        .order_by_asc(attendance::Column::TimeIn)
        .into_tuple()
        .all(db)
        .await?;

    let mut buckets: BTreeMap<NaiveDate, StatusCounts> = BTreeMap::new();
    for (time_in, status) in rows {
        let key = bucket.start_of(time_in.date_naive());
        buckets.entry(key).or_default().add(parse_status(&status)?, 1);
    }

    Ok(Trend {
        bucket,
        start,
        end,
        points: buckets
            .into_iter()
            .map(|(period_start, counts)| TrendPoint {
                period_start,
                counts,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::Model as Attendance;
    use crate::models::event::{EventStatus, NewEvent};
    use crate::models::student_profile::NewStudentProfile;
    use crate::models::user::{self, NewUser};
    use crate::test_utils::setup_test_db;
    use chrono::TimeZone;

    async fn student(
        db: &DatabaseConnection,
        number: &str,
        department_id: i64,
        program_id: i64,
    ) -> student_profile::Model {
        let u = user::Model::create(
            db,
            &NewUser {
                email: format!("{}@example.com", number.to_lowercase()),
                password: "Password1".into(),
                first_name: "S".into(),
                middle_name: None,
                last_name: number.into(),
            },
        )
        .await
        .unwrap();
        student_profile::Model::create(
            db,
            NewStudentProfile {
                user_id: u.id,
                student_id: number.into(),
                department_id,
                program_id,
                year_level: 2,
                section: None,
                rfid_tag: None,
            },
        )
        .await
        .unwrap()
    }

    #[test]
    fn percentages_round_to_two_places() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn week_buckets_start_on_monday() {
        let thursday = NaiveDate::from_ymd_opt(2025, 8, 7).unwrap();
        assert_eq!(
            Bucket::Week.start_of(thursday),
            NaiveDate::from_ymd_opt(2025, 8, 4).unwrap()
        );
        assert_eq!(
            Bucket::Month.start_of(thursday),
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
        );
        assert_eq!(Bucket::from_str("MONTH").unwrap(), Bucket::Month);
    }

    #[tokio::test]
    async fn summary_and_breakdowns() {
        let db = setup_test_db().await;
        let cs = department::Model::create(&db, "Computing").await.unwrap();
        let eng = department::Model::create(&db, "Engineering").await.unwrap();
        let bscs = program::Model::create(&db, "bscs", &[cs.id]).await.unwrap();
        let bsce = program::Model::create(&db, "bsce", &[eng.id]).await.unwrap();
        student(&db, "CS-1", cs.id, bscs.id).await;
        student(&db, "CS-2", cs.id, bscs.id).await;
        student(&db, "CE-1", eng.id, bsce.id).await;

        let start = Utc.with_ymd_and_hms(2025, 8, 4, 8, 0, 0).unwrap();
        let ev = event::Model::create(
            &db,
            NewEvent {
                name: "Assembly".into(),
                location: "Hall".into(),
                start_datetime: start,
                end_datetime: start + Duration::hours(1),
                status: EventStatus::Ongoing,
                department_ids: vec![],
                program_ids: vec![],
                ssg_member_ids: vec![],
            },
        )
        .await
        .unwrap()
        .event;
        let officer = user::Model::create(
            &db,
            &NewUser {
                email: "o@example.com".into(),
                password: "Password1".into(),
                first_name: "O".into(),
                middle_name: None,
                last_name: "O".into(),
            },
        )
        .await
        .unwrap();

        Attendance::check_in_manual(&db, ev.id, "CS-1", officer.id, None, start).await.unwrap();
        Attendance::check_in_manual(&db, ev.id, "CE-1", officer.id, None, start + Duration::days(3))
            .await
            .unwrap();
        Attendance::mark_excused(&db, ev.id, &["CS-2".into()], "Sick", officer.id, start)
            .await
            .unwrap();

        let summary = event_summary(&db, ev.id).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.statuses[&AttendanceStatus::Present].count, 2);
        assert_eq!(summary.statuses[&AttendanceStatus::Present].percentage, 66.67);
        assert_eq!(summary.statuses[&AttendanceStatus::Absent].count, 0);

        let programs = by_program(&db, ev.id).await.unwrap();
        assert_eq!(programs.len(), 2);
        let cs_row = programs.iter().find(|g| g.id == bscs.id).unwrap();
        assert_eq!((cs_row.counts.present, cs_row.counts.excused), (1, 1));

        let departments = by_department(&db, ev.id).await.unwrap();
        assert_eq!(departments[0].name, "Computing");
        assert_eq!(departments[1].counts.total, 1);

        let daily = trend(&db, start, start + Duration::days(7), Bucket::Day, None)
            .await
            .unwrap();
        assert_eq!(daily.points.len(), 2);
        let weekly = trend(&db, start, start + Duration::days(7), Bucket::Week, Some(ev.id))
            .await
            .unwrap();
        assert_eq!(weekly.points.len(), 1);
        assert_eq!(weekly.points[0].counts.total, 3);
    }

    #[tokio::test]
    async fn summary_of_unknown_event_is_not_found() {
        let db = setup_test_db().await;
        assert!(matches!(
            event_summary(&db, 42).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
