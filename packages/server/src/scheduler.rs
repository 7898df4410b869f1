//! Reminder scheduling for defect records.
//!
//! Reminders are derived, not scheduled: no timer fires at due time. The due
//! moment is computed once at creation (`schedule_on_create`) and due-ness is
//! a predicate over stored timestamps plus "now" (`due_condition`), evaluated
//! on demand by polling clients. This survives server restarts for free and
//! costs at most one polling interval of latency, which is fine for a
//! human-paced reminder.

use chrono::{DateTime, Duration, Utc};
use common::DefectStatus;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::defect;

/// Derive the absolute reminder time for a new defect.
///
/// Returns `None` when no delay was requested or the delay is non-positive,
/// otherwise `now + delay_seconds`. Called exactly once, at record creation;
/// the result is never recomputed.
pub fn schedule_on_create(
    delay_seconds: Option<i32>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let delay = delay_seconds?;
    if delay <= 0 {
        return None;
    }
    Some(now + Duration::seconds(i64::from(delay)))
}

/// The due-ness predicate: a reminder time exists, has passed, has not been
/// acknowledged, and the defect is not already finished.
///
/// Finishing a defect before its reminder fires permanently suppresses the
/// reminder; finished work needs no reminder.
pub fn due_condition(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(defect::Column::NotificationDueAt.is_not_null())
        .add(defect::Column::NotificationDueAt.lte(now))
        .add(defect::Column::IsNotified.eq(false))
        .add(defect::Column::Status.ne(DefectStatus::Finish))
}

/// All defects currently due a reminder, earliest-due first.
///
/// The ascending order is contractual: clients display a prioritized list.
pub async fn find_due<C: ConnectionTrait>(
    db: &C,
    now: DateTime<Utc>,
) -> Result<Vec<defect::Model>, DbErr> {
    defect::Entity::find()
        .filter(due_condition(now))
        .order_by_asc(defect::Column::NotificationDueAt)
        .all(db)
        .await
}
