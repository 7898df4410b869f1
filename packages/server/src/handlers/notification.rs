use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{defect, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::handlers::defect::find_defect;
use crate::models::defect::DefectResponse;
use crate::scheduler;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/defects/notifications/pending",
    tag = "Notifications",
    operation_id = "listPendingNotifications",
    summary = "List defects whose reminder is currently due",
    description = "Due-ness is derived on demand from the stored due time and the server clock; nothing fires in the background. Results are ordered earliest-due first, which clients rely on for prioritized display. Acknowledged and finished defects never appear.",
    responses(
        (status = 200, description = "Due, unacknowledged defects", body = Vec<DefectResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn pending_notifications(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DefectResponse>>, AppError> {
    let now = chrono::Utc::now();
    let due = scheduler::find_due(&state.db, now).await?;

    // Batch-resolve creator usernames for display.
    let creator_ids: Vec<i32> = due.iter().map(|d| d.created_by).collect();
    let creators: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(creator_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let items = due
        .into_iter()
        .map(|m| {
            let creator = creators.get(&m.created_by).cloned();
            DefectResponse::from_model(m, creator)
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    patch,
    path = "/api/v1/defects/{id}/mark-notified",
    tag = "Notifications",
    operation_id = "markNotified",
    summary = "Acknowledge a reminder",
    description = "Idempotent: acknowledging an already-acknowledged or finished defect succeeds without changing anything, because the dismissing client and the poller may race. Does not alter defect status.",
    params(("id" = i32, Path, description = "Defect ID")),
    responses(
        (status = 200, description = "Reminder acknowledged", body = DefectResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Defect not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn mark_notified(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DefectResponse>, AppError> {
    let existing = find_defect(&state.db, id).await?;

    // is_notified only ever moves false -> true; a repeat call has nothing
    // left to write.
    if existing.is_notified {
        return Ok(Json(existing.into()));
    }

    let mut active: defect::ActiveModel = existing.into();
    active.is_notified = Set(true);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}
