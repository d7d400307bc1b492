use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, QueryFilter};

use super::role::{self, RoleName};

/// Assignment of a role to a user. Unique per (user, role).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
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
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id",
        on_delete = "Cascade"
    )]
    Role,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Grants `name` to the user. Granting a role twice is a no-op.
    pub async fn assign<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        name: RoleName,
    ) -> Result<(), DbErr> {
        let role = role::Model::find_or_create(db, name).await?;

        let exists = Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::RoleId.eq(role.id))
            .one(db)
            .await?
            .is_some();

        if !exists {
            ActiveModel {
                user_id: Set(user_id),
                role_id: Set(role.id),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// Replaces the user's whole role set.
    pub async fn replace_for_user<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        names: &[RoleName],
    ) -> Result<(), DbErr> {
        Entity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(db)
            .await?;

        for name in names {
            Self::assign(db, user_id, *name).await?;
        }
        Ok(())
    }

    pub async fn names_for_user<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
    ) -> Result<Vec<RoleName>, DbErr> {
        let mut names: Vec<RoleName> = role::Entity::find()
            .inner_join(Entity)
            .filter(Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
