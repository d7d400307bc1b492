pub mod attendance;
pub mod department;
pub mod event;
pub mod event_department;
pub mod event_program;
pub mod event_ssg_member;
pub mod program;
pub mod program_department;
pub mod role;
pub mod ssg_profile;
pub mod student_profile;
pub mod user;
pub mod user_role;

pub use attendance::Entity as Attendance;
pub use department::Entity as Department;
pub use event::Entity as Event;
pub use program::Entity as Program;
pub use role::Entity as Role;
pub use ssg_profile::Entity as SsgProfile;
pub use student_profile::Entity as StudentProfile;
pub use user::Entity as User;

use std::collections::BTreeSet;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

use crate::error::{DomainError, DomainResult, format_ids};

/// Resolves every id in `ids` against `id_col` of `E`.
///
/// Returns the de-duplicated ids, or `NotFound` naming the ones that are missing
/// (`"{label} not found: {3, 9}"`).
pub(crate) async fn resolve_ids<E, C>(
    db: &C,
    id_col: E::Column,
    ids: &[i64],
    label: &str,
) -> DomainResult<Vec<i64>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let found: BTreeSet<i64> = E::find()
        .select_only()
        .column(id_col)
        .filter(id_col.is_in(wanted.iter().copied()))
        .into_tuple::<i64>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let missing: Vec<i64> = wanted.difference(&found).copied().collect();
    if !missing.is_empty() {
        return Err(DomainError::not_found(format!(
            "{label} not found: {}",
            format_ids(missing)
        )));
    }

    Ok(wanted.into_iter().collect())
}
