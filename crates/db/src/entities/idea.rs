//! Idea entity (short posts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Idea visibility.
///
/// Stored and returned as-is; only the public listing filters on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Visibility {
    #[sea_orm(string_value = "Private")]
    Private,
    #[default]
    #[sea_orm(string_value = "Public")]
    Public,
    #[sea_orm(string_value = "Friends")]
    Friends,
    #[sea_orm(string_value = "Followers")]
    Followers,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "idea")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Short external identifier
    #[sea_orm(unique)]
    pub idea_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub author_id: String,

    pub visibility: Visibility,

    #[sea_orm(default_value = true)]
    pub active: bool,

    #[sea_orm(unique)]
    pub slug: String,

    #[sea_orm(default_value = 0)]
    pub views: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(has_many = "super::idea_vote::Entity")]
    Vote,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::idea_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
