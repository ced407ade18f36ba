use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::entity::{classroom_session, student, teacher, video_submission};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    sync_schema(&db).await?;

    Ok(db)
}

/// Create the tables and indexes if they do not exist yet.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut teacher_table = schema.create_table_from_entity(teacher::Entity);
    db.execute(backend.build(teacher_table.if_not_exists()))
        .await?;

    let mut session_table = schema.create_table_from_entity(classroom_session::Entity);
    db.execute(backend.build(session_table.if_not_exists()))
        .await?;

    let mut student_table = schema.create_table_from_entity(student::Entity);
    db.execute(backend.build(student_table.if_not_exists()))
        .await?;

    let mut submission_table = schema.create_table_from_entity(video_submission::Entity);
    db.execute(backend.build(submission_table.if_not_exists()))
        .await?;

    // One nickname per session, removed students included.
    let session_username = Index::create()
        .name("idx_student_session_username")
        .table(student::Entity)
        .col(student::Column::SessionId)
        .col(student::Column::Username)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&session_username)).await?;

    info!("Database schema synchronized");
    Ok(())
}
