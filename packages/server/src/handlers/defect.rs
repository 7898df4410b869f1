use axum::Json;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::DefectStatus;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{defect, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::defect::*;
use crate::scheduler;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/defects",
    tag = "Defects",
    operation_id = "createDefect",
    summary = "Log a new defect",
    description = "Creates a defect in `OnProgress` with a mandatory before-photo. When `notification_delay` is given, the reminder due time is derived once as creation time plus the delay.",
    request_body = CreateDefectRequest,
    responses(
        (status = 201, description = "Defect created", body = DefectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name, user_id = auth_user.user_id))]
pub async fn create_defect(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDefectRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_defect(&payload)?;

    let now = chrono::Utc::now();
    let due_at = scheduler::schedule_on_create(payload.notification_delay, now);

    let new_defect = defect::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        defect_type: Set(payload.defect_type.trim().to_string()),
        floor: Set(payload.floor.trim().to_string()),
        axis_location: Set(payload.axis_location.trim().to_string()),
        status: Set(DefectStatus::OnProgress),
        before_photo: Set(payload.before_photo),
        after_photo: Set(None),
        notification_delay: Set(payload.notification_delay),
        notification_due_at: Set(due_at),
        is_notified: Set(false),
        created_by: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_defect.insert(&state.db).await?;

    let mut resp = DefectResponse::from(model);
    resp.created_by_username = Some(auth_user.username);

    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/v1/defects",
    tag = "Defects",
    operation_id = "listDefects",
    summary = "List all defects, newest first",
    responses(
        (status = 200, description = "Defects ordered by creation time descending", body = Vec<DefectResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_defects(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DefectResponse>>, AppError> {
    let rows = defect::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(defect::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .map(|(m, creator)| DefectResponse::from_model(m, creator))
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/defects/{id}",
    tag = "Defects",
    operation_id = "getDefect",
    summary = "Get a defect by ID",
    params(("id" = i32, Path, description = "Defect ID")),
    responses(
        (status = 200, description = "Defect details", body = DefectResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Defect not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_defect(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DefectResponse>, AppError> {
    let (model, creator) = defect::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Defect not found".into()))?;

    Ok(Json(DefectResponse::from_model(model, creator)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/defects/{id}",
    tag = "Defects",
    operation_id = "updateDefect",
    summary = "Partially update a defect's descriptive fields",
    description = "Coalesce-merge semantics: omitted fields are left unchanged. Status cannot be changed here; use the status route.",
    params(("id" = i32, Path, description = "Defect ID")),
    request_body = UpdateDefectRequest,
    responses(
        (status = 200, description = "Defect updated", body = DefectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Defect not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id))]
pub async fn update_defect(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateDefectRequest>,
) -> Result<Json<DefectResponse>, AppError> {
    validate_update_defect(&payload)?;

    if payload == UpdateDefectRequest::default() {
        let existing = find_defect(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_defect(&txn, id).await?;
    let mut active: defect::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref defect_type) = payload.defect_type {
        active.defect_type = Set(defect_type.trim().to_string());
    }
    if let Some(ref floor) = payload.floor {
        active.floor = Set(floor.trim().to_string());
    }
    if let Some(ref axis_location) = payload.axis_location {
        active.axis_location = Set(axis_location.trim().to_string());
    }
    if let Some(before_photo) = payload.before_photo {
        active.before_photo = Set(before_photo);
    }
    if let Some(after_photo) = payload.after_photo {
        active.after_photo = Set(Some(after_photo));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/defects/{id}/status",
    tag = "Defects",
    operation_id = "setDefectStatus",
    summary = "Move a defect through its lifecycle",
    description = "The only legal transition is `OnProgress` to `Finish`, and finishing requires an after-photo. Re-finishing an already finished defect is an idempotent no-op. Reopening is rejected.",
    params(("id" = i32, Path, description = "Defect ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = DefectResponse),
        (status = 400, description = "After-photo missing (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Defect not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Illegal transition (INVALID_TRANSITION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id, status = %payload.status))]
pub async fn set_defect_status(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SetStatusRequest>,
) -> Result<Json<DefectResponse>, AppError> {
    let existing = find_defect(&state.db, id).await?;

    if !existing.status.can_transition_to(payload.status) {
        return Err(AppError::InvalidTransition {
            from: existing.status,
            to: payload.status,
        });
    }

    if payload.status == DefectStatus::Finish && existing.after_photo.is_none() {
        return Err(AppError::Validation(
            "An after-photo is required before a defect can be finished".into(),
        ));
    }

    // Self-transition (e.g. two racing finish requests): nothing to write.
    if existing.status == payload.status {
        return Ok(Json(existing.into()));
    }

    let mut active: defect::ActiveModel = existing.into();
    active.status = Set(payload.status);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/defects/{id}/after-photo",
    tag = "Defects",
    operation_id = "attachAfterPhoto",
    summary = "Attach the repair evidence photo",
    description = "Allowed in any status; does not itself change status.",
    params(("id" = i32, Path, description = "Defect ID")),
    request_body = AfterPhotoRequest,
    responses(
        (status = 200, description = "Photo attached", body = DefectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Defect not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id))]
pub async fn attach_after_photo(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<AfterPhotoRequest>,
) -> Result<Json<DefectResponse>, AppError> {
    if payload.after_photo.trim().is_empty() {
        return Err(AppError::Validation("After photo is required".into()));
    }

    let existing = find_defect(&state.db, id).await?;

    let mut active: defect::ActiveModel = existing.into();
    active.after_photo = Set(Some(payload.after_photo));
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/defects/{id}",
    tag = "Defects",
    operation_id = "deleteDefect",
    summary = "Delete a defect",
    description = "Unconditional hard delete, allowed in any status.",
    params(("id" = i32, Path, description = "Defect ID")),
    responses(
        (status = 204, description = "Defect deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Defect not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn delete_defect(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let result = defect::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Defect not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Body limit layer for defect routes carrying base64 photos (50MB).
pub fn photo_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(50 * 1024 * 1024)
}

pub(crate) async fn find_defect<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<defect::Model, AppError> {
    defect::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Defect not found".into()))
}
