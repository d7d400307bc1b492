use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder};

/// Departments an event is open to.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "event_departments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub event_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub department_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,

    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id",
        on_delete = "Cascade"
    )]
    Department,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Replaces every member of `event_id` with `ids`. Callers resolve the ids first.
    pub async fn replace<C: ConnectionTrait>(db: &C, event_id: i64, ids: &[i64]) -> Result<(), DbErr> {
        Entity::delete_many()
            .filter(Column::EventId.eq(event_id))
            .exec(db)
            .await?;

        if ids.is_empty() {
            return Ok(());
        }

        let rows = ids.iter().map(|id| ActiveModel {
            event_id: Set(event_id),
            department_id: Set(*id),
        });
        Entity::insert_many(rows).exec_without_returning(db).await?;
        Ok(())
    }

    pub async fn ids_for<C: ConnectionTrait>(db: &C, event_id: i64) -> Result<Vec<i64>, DbErr> {
        Ok(Entity::find()
            .filter(Column::EventId.eq(event_id))
            .order_by_asc(Column::DepartmentId)
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.department_id)
            .collect())
    }
}
