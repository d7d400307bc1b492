use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, QueryFilter};
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::models::user;

/// Student-government position held by a user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ssg_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub position: String,
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

    #[sea_orm(has_many = "super::event_ssg_member::Entity")]
    EventMemberships,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_ssg_member::Relation::Event.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_ssg_member::Relation::SsgProfile.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `position` must already be normalized by the caller.
    pub async fn create(db: &DatabaseConnection, user_id: i64, position: &str) -> DomainResult<Model> {
        user::Model::get(db, user_id).await?;

        if Self::find_by_user(db, user_id).await?.is_some() {
            return Err(DomainError::conflict("SSG profile already exists for this user"));
        }

        let model = ActiveModel {
            user_id: Set(user_id),
            position: Set(position.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;

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
}
