use common::StudentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student who joined a classroom session under a nickname.
///
/// `(session_id, username)` is unique (enforced by an index created at
/// startup), and a `Removed` row blocks the nickname from rejoining.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub username: String,
    pub session_id: Uuid,
    pub status: StudentStatus,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classroom_session::Entity",
        from = "Column::SessionId",
        to = "super::classroom_session::Column::Id"
    )]
    Session,
    #[sea_orm(has_many = "super::video_submission::Entity")]
    Submissions,
}

impl Related<super::classroom_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::video_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
