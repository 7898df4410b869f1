use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{member, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::member::{InviteMemberRequest, MemberResponse, validate_invite_member};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/members",
    tag = "Members",
    operation_id = "listMembers",
    summary = "List team members, newest first",
    responses(
        (status = 200, description = "Members with user and inviter info", body = Vec<MemberResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_members(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let rows = member::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(member::Column::CreatedAt)
        .all(&state.db)
        .await?;

    // Inviters resolved in one batch rather than per row.
    let inviter_ids: Vec<i32> = rows.iter().filter_map(|(m, _)| m.invited_by).collect();
    let inviters: std::collections::HashMap<i32, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(inviter_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    let items = rows
        .into_iter()
        .filter_map(|(m, u)| {
            let u = u?;
            Some(MemberResponse {
                id: m.id,
                user_id: m.user_id,
                username: u.username,
                role: u.role,
                invited_by_username: m.invited_by.and_then(|id| inviters.get(&id).cloned()),
                created_at: m.created_at,
            })
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/v1/members/invite",
    tag = "Members",
    operation_id = "inviteMember",
    summary = "Add an existing account to the team (Manager only)",
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "Member added", body = MemberResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No such account (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already a member (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %payload.username))]
pub async fn invite_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<InviteMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_manager()?;
    validate_invite_member(&payload)?;

    let username = payload.username.trim();

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No account named '{username}'")))?;

    let new_member = member::ActiveModel {
        user_id: Set(user.id),
        invited_by: Set(Some(auth_user.user_id)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_member
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict(format!("'{username}' is already a member"))
            }
            _ => AppError::from(e),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MemberResponse {
            id: model.id,
            user_id: model.user_id,
            username: user.username,
            role: user.role,
            invited_by_username: Some(auth_user.username),
            created_at: model.created_at,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/members/{id}",
    tag = "Members",
    operation_id = "removeMember",
    summary = "Remove a team member (Manager only)",
    params(("id" = i32, Path, description = "Membership ID")),
    responses(
        (status = 204, description = "Member removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn remove_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_manager()?;

    let result = member::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Member not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}
