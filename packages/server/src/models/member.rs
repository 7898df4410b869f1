use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct InviteMemberRequest {
    /// Username of an existing account to add to the team.
    pub username: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MemberResponse {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub role: String,
    /// Username of the inviting manager; null for seeded members or when the
    /// inviter's account was deleted.
    pub invited_by_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub fn validate_invite_member(req: &InviteMemberRequest) -> Result<(), AppError> {
    if req.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    Ok(())
}
