use common::DefectStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "defect")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub defect_type: String,
    /// Floor of the building the defect is on.
    pub floor: String,
    /// Structural axis grid coordinate (e.g. "A-3").
    pub axis_location: String,

    pub status: DefectStatus,

    /// Mandatory photo taken when the defect is logged.
    /// Opaque base64 data-URL blob; never inspected server-side.
    #[sea_orm(column_type = "Text")]
    pub before_photo: String,
    /// Repair evidence photo. NULL until an after capture is accepted.
    #[sea_orm(column_type = "Text", nullable)]
    pub after_photo: Option<String>,

    /// Reminder delay in seconds chosen at creation. NULL means no reminder
    /// was requested.
    pub notification_delay: Option<i32>,
    /// Absolute reminder trigger time, derived once at creation as
    /// `created_at + notification_delay`. Never recomputed.
    pub notification_due_at: Option<DateTimeUtc>,
    /// Set true exactly once when a client acknowledges the reminder.
    pub is_notified: bool,

    pub created_by: i32,
    #[sea_orm(belongs_to, from = "created_by", to = "id")]
    pub creator: HasOne<super::user::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
