use chrono::{DateTime, Utc};
use common::DefectStatus;
use serde::{Deserialize, Serialize};

use crate::entity::{defect, user};
use crate::error::AppError;

use super::shared::{validate_photo, validate_required_text};

/// Upper bound on a reminder delay (30 days). A longer delay is almost
/// certainly a unit mistake on the client side.
pub const MAX_NOTIFICATION_DELAY_SECS: i32 = 30 * 24 * 60 * 60;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateDefectRequest {
    pub name: String,
    pub defect_type: String,
    pub floor: String,
    pub axis_location: String,
    /// Base64 data-URL of the photo taken at logging time. Mandatory.
    pub before_photo: String,
    /// Reminder delay in seconds. Omit for no reminder.
    pub notification_delay: Option<i32>,
}

/// Partial update of descriptive fields and photos. Omitted fields are left
/// unchanged (coalesce merge). Status is not updatable here; it belongs to
/// the status route.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateDefectRequest {
    pub name: Option<String>,
    pub defect_type: Option<String>,
    pub floor: Option<String>,
    pub axis_location: Option<String>,
    pub before_photo: Option<String>,
    pub after_photo: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetStatusRequest {
    pub status: DefectStatus,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AfterPhotoRequest {
    pub after_photo: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DefectResponse {
    pub id: i32,
    pub name: String,
    pub defect_type: String,
    pub floor: String,
    pub axis_location: String,
    pub status: DefectStatus,
    pub before_photo: String,
    pub after_photo: Option<String>,
    pub notification_delay: Option<i32>,
    pub notification_due_at: Option<DateTime<Utc>>,
    pub is_notified: bool,
    pub created_by: i32,
    /// Username of the logging user; null if the account was since deleted.
    pub created_by_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DefectResponse {
    pub fn from_model(m: defect::Model, creator: Option<user::Model>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            defect_type: m.defect_type,
            floor: m.floor,
            axis_location: m.axis_location,
            status: m.status,
            before_photo: m.before_photo,
            after_photo: m.after_photo,
            notification_delay: m.notification_delay,
            notification_due_at: m.notification_due_at,
            is_notified: m.is_notified,
            created_by: m.created_by,
            created_by_username: creator.map(|u| u.username),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<defect::Model> for DefectResponse {
    fn from(m: defect::Model) -> Self {
        Self::from_model(m, None)
    }
}

pub fn validate_create_defect(req: &CreateDefectRequest) -> Result<(), AppError> {
    validate_required_text(&req.name, "Name")?;
    validate_required_text(&req.defect_type, "Defect type")?;
    validate_required_text(&req.floor, "Floor")?;
    validate_required_text(&req.axis_location, "Axis location")?;
    validate_photo(&req.before_photo, "Before photo")?;
    if let Some(delay) = req.notification_delay
        && !(1..=MAX_NOTIFICATION_DELAY_SECS).contains(&delay)
    {
        return Err(AppError::Validation(format!(
            "Notification delay must be 1-{MAX_NOTIFICATION_DELAY_SECS} seconds"
        )));
    }
    Ok(())
}

pub fn validate_update_defect(req: &UpdateDefectRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required_text(name, "Name")?;
    }
    if let Some(ref defect_type) = req.defect_type {
        validate_required_text(defect_type, "Defect type")?;
    }
    if let Some(ref floor) = req.floor {
        validate_required_text(floor, "Floor")?;
    }
    if let Some(ref axis_location) = req.axis_location {
        validate_required_text(axis_location, "Axis location")?;
    }
    if let Some(ref photo) = req.before_photo {
        validate_photo(photo, "Before photo")?;
    }
    if let Some(ref photo) = req.after_photo {
        validate_photo(photo, "After photo")?;
    }
    Ok(())
}
