use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::defect;

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for the due-notification predicate:
    // WHERE notification_due_at <= now AND NOT is_notified AND status != 'Finish'
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_defect_due_pending")
        .table(defect::Entity)
        .col(defect::Column::IsNotified)
        .col(defect::Column::NotificationDueAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_defect_due_pending exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_defect_due_pending: {}", e);
        }
    }

    // Index for the newest-first defect listing.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_defect_created_at")
        .table(defect::Entity)
        .col(defect::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_defect_created_at exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_defect_created_at: {}", e);
        }
    }

    Ok(())
}
