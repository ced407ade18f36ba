use common::SubmissionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A generation request accepted by the provider.
///
/// The provider-issued `task_id` is the only key used to reconcile
/// asynchronous status back into this record. Once the status is terminal the
/// row never changes again, and `Success` always carries a video URL.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video_submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub session_id: Uuid,
    pub student_id: Uuid,

    #[sea_orm(unique)]
    pub task_id: String,

    pub prompt: String,
    pub status: SubmissionStatus,
    pub video_url: Option<String>,

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
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::classroom_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
