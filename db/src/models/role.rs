use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Iterable, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Named permission group. One row per [`RoleName`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: RoleName,
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
#[serde(rename_all = "kebab-case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_name")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RoleName {
    #[sea_orm(string_value = "student")]
    Student,

    #[sea_orm(string_value = "ssg")]
    Ssg,

    #[sea_orm(string_value = "event-organizer")]
    EventOrganizer,

    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::Role.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns the role row for `name`, inserting it on first use.
    pub async fn find_or_create<C: ConnectionTrait>(db: &C, name: RoleName) -> Result<Model, DbErr> {
        if let Some(existing) = Entity::find()
            .filter(Column::Name.eq(name))
            .one(db)
            .await?
        {
            return Ok(existing);
        }

        ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Makes sure every role exists. Used by the seeder and at startup.
    pub async fn ensure_defaults<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        let mut out = Vec::new();
        for name in RoleName::iter() {
            out.push(Self::find_or_create(db, name).await?);
        }
        Ok(out)
    }
}
